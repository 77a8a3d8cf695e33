//! Weekly outfit plan and its local edit rules

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::id::generate_item_id;
use super::preferences::Weekday;

/// Number of days in a plan
pub const DAYS_PER_PLAN: usize = 7;

/// Garment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Top,
    Bottom,
    Outerwear,
    Shoes,
    Accessory,
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Top,
        ItemType::Bottom,
        ItemType::Outerwear,
        ItemType::Shoes,
        ItemType::Accessory,
        ItemType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Outerwear => "outerwear",
            Self::Shoes => "shoes",
            Self::Accessory => "accessory",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single piece of clothing or accessory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitItem {
    /// Opaque ID, unique within its day
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The outfit for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: Weekday,
    pub has_college: bool,
    pub outfit_items: Vec<OutfitItem>,
    /// Why this outfit was picked
    pub reasoning: String,
    pub weather_tip: String,
}

/// Why a list of days does not form a weekly plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanShapeError {
    #[error("expected 7 days, got {0}")]
    WrongDayCount(usize),

    #[error("{0} appears more than once")]
    DuplicateDay(Weekday),

    #[error("{day} has an item with an empty id")]
    EmptyItemId { day: Weekday },

    #[error("{day} item {id} has an empty name")]
    EmptyItemName { day: Weekday, id: String },

    #[error("{day} has more than one item with id {id}")]
    DuplicateItemId { day: Weekday, id: String },
}

/// Rejected plan edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Item name must not be empty")]
    EmptyName,

    #[error("Day index {index} is out of range (plan has {len} days)")]
    DayOutOfRange { index: usize, len: usize },
}

/// Seven daily plans, one per distinct weekday, in the order the model returned them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    days: Vec<DailyPlan>,
}

impl WeeklyPlan {
    /// Validate and wrap a list of days
    ///
    /// Day order is kept as given; nothing is repaired or re-sorted.
    pub fn new(days: Vec<DailyPlan>) -> Result<Self, PlanShapeError> {
        debug!(day_count = days.len(), "WeeklyPlan::new: called");
        if days.len() != DAYS_PER_PLAN {
            debug!("WeeklyPlan::new: wrong day count");
            return Err(PlanShapeError::WrongDayCount(days.len()));
        }

        let mut seen_days = HashSet::new();
        for daily in &days {
            if !seen_days.insert(daily.day) {
                debug!(day = %daily.day, "WeeklyPlan::new: duplicate day");
                return Err(PlanShapeError::DuplicateDay(daily.day));
            }

            let mut seen_ids = HashSet::new();
            for item in &daily.outfit_items {
                if item.id.trim().is_empty() {
                    return Err(PlanShapeError::EmptyItemId { day: daily.day });
                }
                if item.name.trim().is_empty() {
                    return Err(PlanShapeError::EmptyItemName {
                        day: daily.day,
                        id: item.id.clone(),
                    });
                }
                if !seen_ids.insert(item.id.as_str()) {
                    return Err(PlanShapeError::DuplicateItemId {
                        day: daily.day,
                        id: item.id.clone(),
                    });
                }
            }
        }

        Ok(Self { days })
    }

    pub fn days(&self) -> &[DailyPlan] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&DailyPlan> {
        self.days.get(index)
    }

    /// Index of the entry for `day`
    pub fn position_of(&self, day: Weekday) -> Option<usize> {
        self.days.iter().position(|d| d.day == day)
    }

    pub fn find_item(&self, day_index: usize, item_id: &str) -> Option<&OutfitItem> {
        self.days
            .get(day_index)
            .and_then(|d| d.outfit_items.iter().find(|item| item.id == item_id))
    }

    /// Append a manually named item of type `other` to a day
    ///
    /// The name is trimmed; an empty name leaves the plan unchanged.
    pub fn add_item(&mut self, day_index: usize, name: &str) -> Result<OutfitItem, EditError> {
        debug!(%day_index, %name, "WeeklyPlan::add_item: called");
        let name = name.trim();
        if name.is_empty() {
            debug!("WeeklyPlan::add_item: empty name rejected");
            return Err(EditError::EmptyName);
        }

        let len = self.days.len();
        let daily = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::DayOutOfRange { index: day_index, len })?;

        let id = generate_item_id(daily.outfit_items.iter().map(|item| item.id.as_str()));
        let item = OutfitItem {
            id,
            name: name.to_string(),
            item_type: ItemType::Other,
            color: None,
        };
        debug!(id = %item.id, day = %daily.day, "WeeklyPlan::add_item: appended");
        daily.outfit_items.push(item.clone());
        Ok(item)
    }

    /// Remove an item by id, returning it if it was there
    pub fn remove_item(&mut self, day_index: usize, item_id: &str) -> Result<Option<OutfitItem>, EditError> {
        debug!(%day_index, %item_id, "WeeklyPlan::remove_item: called");
        let len = self.days.len();
        let daily = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::DayOutOfRange { index: day_index, len })?;

        match daily.outfit_items.iter().position(|item| item.id == item_id) {
            Some(pos) => {
                debug!(%pos, "WeeklyPlan::remove_item: removed");
                Ok(Some(daily.outfit_items.remove(pos)))
            }
            None => {
                debug!("WeeklyPlan::remove_item: no such item");
                Ok(None)
            }
        }
    }

    pub fn into_days(self) -> Vec<DailyPlan> {
        self.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, item_type: ItemType) -> OutfitItem {
        OutfitItem {
            id: id.to_string(),
            name: name.to_string(),
            item_type,
            color: None,
        }
    }

    fn week() -> Vec<DailyPlan> {
        Weekday::ALL
            .into_iter()
            .map(|day| DailyPlan {
                day,
                has_college: !matches!(day, Weekday::Saturday | Weekday::Sunday),
                outfit_items: vec![
                    item("a1", "Oversized Beige Hoodie", ItemType::Top),
                    item("a2", "Navy Pleated Skirt", ItemType::Bottom),
                    item("a3", "White Sneakers", ItemType::Shoes),
                ],
                reasoning: "Comfortable for long lectures".to_string(),
                weather_tip: "Mild with a chance of rain".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_new_accepts_full_week_in_given_order() {
        let mut days = week();
        days.swap(0, 6);
        let plan = WeeklyPlan::new(days).unwrap();
        assert_eq!(plan.days()[0].day, Weekday::Sunday);
        assert_eq!(plan.days()[6].day, Weekday::Monday);
        assert_eq!(plan.position_of(Weekday::Sunday), Some(0));
    }

    #[test]
    fn test_new_rejects_wrong_day_count() {
        let mut days = week();
        days.pop();
        assert_eq!(WeeklyPlan::new(days), Err(PlanShapeError::WrongDayCount(6)));

        let mut days = week();
        days.push(days[0].clone());
        assert_eq!(WeeklyPlan::new(days), Err(PlanShapeError::WrongDayCount(8)));
    }

    #[test]
    fn test_new_rejects_duplicate_day() {
        let mut days = week();
        days[6].day = Weekday::Monday;
        assert_eq!(WeeklyPlan::new(days), Err(PlanShapeError::DuplicateDay(Weekday::Monday)));
    }

    #[test]
    fn test_new_rejects_bad_items() {
        let mut days = week();
        days[2].outfit_items[0].id = " ".to_string();
        assert!(matches!(WeeklyPlan::new(days), Err(PlanShapeError::EmptyItemId { .. })));

        let mut days = week();
        days[2].outfit_items[1].name = String::new();
        assert!(matches!(WeeklyPlan::new(days), Err(PlanShapeError::EmptyItemName { .. })));

        let mut days = week();
        days[3].outfit_items[1].id = "a1".to_string();
        assert!(matches!(
            WeeklyPlan::new(days),
            Err(PlanShapeError::DuplicateItemId { day: Weekday::Thursday, .. })
        ));
    }

    #[test]
    fn test_same_item_id_on_different_days_is_fine() {
        // every day in week() reuses a1..a3
        assert!(WeeklyPlan::new(week()).is_ok());
    }

    #[test]
    fn test_add_item() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        let before: Vec<String> = plan.days()[1].outfit_items.iter().map(|i| i.id.clone()).collect();

        let added = plan.add_item(1, "Red Scarf").unwrap();

        let items = &plan.days()[1].outfit_items;
        assert_eq!(items.len(), before.len() + 1);
        let last = items.last().unwrap();
        assert_eq!(last, &added);
        assert_eq!(last.name, "Red Scarf");
        assert_eq!(last.item_type, ItemType::Other);
        assert!(last.color.is_none());
        assert!(!before.contains(&last.id));
        // other days untouched
        assert_eq!(plan.days()[0].outfit_items.len(), 3);
    }

    #[test]
    fn test_add_item_trims_name() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        let added = plan.add_item(0, "  Tote Bag ").unwrap();
        assert_eq!(added.name, "Tote Bag");
    }

    #[test]
    fn test_add_item_rejects_empty_name() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        let original = plan.clone();

        assert_eq!(plan.add_item(2, ""), Err(EditError::EmptyName));
        assert_eq!(plan.add_item(2, "   "), Err(EditError::EmptyName));
        assert_eq!(plan, original);
    }

    #[test]
    fn test_add_item_rejects_bad_day() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        assert_eq!(
            plan.add_item(7, "Hat"),
            Err(EditError::DayOutOfRange { index: 7, len: 7 })
        );
    }

    #[test]
    fn test_remove_item_preserves_order() {
        let mut plan = WeeklyPlan::new(week()).unwrap();

        let removed = plan.remove_item(4, "a2").unwrap();
        assert_eq!(removed.map(|i| i.name), Some("Navy Pleated Skirt".to_string()));

        let ids: Vec<&str> = plan.days()[4].outfit_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
        assert_eq!(plan.days()[3].outfit_items.len(), 3);
    }

    #[test]
    fn test_remove_item_missing_is_noop() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        let original = plan.clone();

        assert_eq!(plan.remove_item(4, "nonexistent"), Ok(None));
        assert_eq!(plan, original);
        assert!(plan.remove_item(9, "a1").is_err());
    }

    #[test]
    fn test_remove_all_items_from_college_day() {
        let mut plan = WeeklyPlan::new(week()).unwrap();
        for id in ["a1", "a2", "a3"] {
            plan.remove_item(0, id).unwrap();
        }
        assert!(plan.days()[0].outfit_items.is_empty());
        assert!(plan.days()[0].has_college);
    }

    #[test]
    fn test_serializes_as_camel_case_array() {
        let plan = WeeklyPlan::new(week()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(7));
        assert_eq!(json[0]["day"], "Monday");
        assert_eq!(json[0]["hasCollege"], true);
        assert_eq!(json[0]["weatherTip"], "Mild with a chance of rain");
        assert_eq!(json[0]["outfitItems"][0]["type"], "top");
        assert!(json[0]["outfitItems"][0].get("color").is_none());
    }
}
