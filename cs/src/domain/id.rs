//! Outfit item ID generation
//!
//! Item IDs are 9 lowercase hex characters, e.g. `3f9a0c1be`.
//! They only need to be unique within one day's item list.

use std::collections::HashSet;

/// Generate an item ID that does not collide with any of `taken`
pub fn generate_item_id<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    loop {
        let id = new_item_id();
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}

fn new_item_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    uuid[..9].to_string()
}
