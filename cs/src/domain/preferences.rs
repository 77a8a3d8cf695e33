//! Student preferences collected before a plan request
//!
//! Everything the style profile form captures: gender, college schedule,
//! season, style, free-text notes and an optional photo.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::InputError;

/// Day of the week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in calendar order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full English name, as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Three letter abbreviation
    pub fn short(&self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Weekday {
    type Err = InputError;

    /// Accepts full names and three letter abbreviations, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Weekday::from_str: called");
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.name().to_lowercase() == needle || day.short().to_lowercase() == needle)
            .ok_or_else(|| {
                debug!(%s, "Weekday::from_str: no match");
                InputError::UnknownWeekday(s.to_string())
            })
    }
}

/// Gender the outfits are styled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    Male,
    #[default]
    Female,
    #[serde(rename = "Non-binary")]
    NonBinary,
    #[serde(rename = "Unisex / No Preference")]
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::NonBinary, Gender::Unisex];

    /// Human readable label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "Non-binary",
            Self::Unisex => "Unisex / No Preference",
        }
    }

    /// Short command-line keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non-binary",
            Self::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Gender::from_str: called");
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.keyword() == needle || g.label().to_lowercase() == needle)
            .ok_or_else(|| InputError::UnknownGender(s.to_string()))
    }
}

/// Season the week falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Season {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Season::from_str: called");
        let needle = s.trim().to_lowercase();
        if needle == "fall" {
            debug!("Season::from_str: fall maps to Autumn");
            return Ok(Self::Autumn);
        }
        Self::ALL
            .into_iter()
            .find(|season| season.label().to_lowercase() == needle)
            .ok_or_else(|| InputError::UnknownSeason(s.to_string()))
    }
}

/// Overall style direction for the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StylePreference {
    #[default]
    #[serde(rename = "Casual & Comfy")]
    Casual,
    #[serde(rename = "Chic & Trendy")]
    Chic,
    #[serde(rename = "Academic Formal")]
    Formal,
    Streetwear,
    Minimalist,
    #[serde(rename = "Vintage / Retro")]
    Vintage,
}

impl StylePreference {
    pub const ALL: [StylePreference; 6] = [
        StylePreference::Casual,
        StylePreference::Chic,
        StylePreference::Formal,
        StylePreference::Streetwear,
        StylePreference::Minimalist,
        StylePreference::Vintage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Casual => "Casual & Comfy",
            Self::Chic => "Chic & Trendy",
            Self::Formal => "Academic Formal",
            Self::Streetwear => "Streetwear",
            Self::Minimalist => "Minimalist",
            Self::Vintage => "Vintage / Retro",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Chic => "chic",
            Self::Formal => "formal",
            Self::Streetwear => "streetwear",
            Self::Minimalist => "minimalist",
            Self::Vintage => "vintage",
        }
    }
}

impl fmt::Display for StylePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StylePreference {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "StylePreference::from_str: called");
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.keyword() == needle || style.label().to_lowercase() == needle)
            .ok_or_else(|| InputError::UnknownStyle(s.to_string()))
    }
}

/// Wall-clock time of day in `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build from hour and minute, `None` when out of range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "ClockTime::from_str: called");
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| InputError::InvalidTime(s.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A photo of the student, attached to the plan request as inline image data
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    mime_type: String,
    data: Vec<u8>,
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Photo {
    /// Wrap raw image bytes with an explicit mime type
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read a photo from disk; the mime type comes from the file extension
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        debug!(?path, "Photo::load: called");
        let mime_type = mime_for_path(path)?;
        let data = tokio::fs::read(path).await.map_err(|source| InputError::PhotoRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(%mime_type, bytes = data.len(), "Photo::load: read photo");
        Ok(Self::new(mime_type, data))
    }

    /// Decode a `data:image/...;base64,` URL
    pub fn from_data_url(url: &str) -> Result<Self, InputError> {
        debug!(len = url.len(), "Photo::from_data_url: called");
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| InputError::InvalidDataUrl("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| InputError::InvalidDataUrl("missing payload".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| InputError::InvalidDataUrl("payload is not base64".to_string()))?;
        let mime_type = match mime_type {
            "image/jpg" => "image/jpeg",
            other if SUPPORTED_IMAGE_TYPES.contains(&other) => other,
            other => {
                debug!(mime_type = %other, "Photo::from_data_url: unsupported mime type");
                return Err(InputError::UnsupportedImage(other.to_string()));
            }
        };
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| InputError::InvalidDataUrl(e.to_string()))?;
        Ok(Self::new(mime_type, data))
    }

    /// Open a photo given either a file path or a data URL
    pub async fn open(source: &str) -> Result<Self, InputError> {
        if source.starts_with("data:") {
            Self::from_data_url(source)
        } else {
            Self::load(source).await
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Standard base64 payload without any data-URL header
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

fn mime_for_path(path: &Path) -> Result<&'static str, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        _ => {
            debug!(%ext, "mime_for_path: unsupported extension");
            Err(InputError::UnsupportedImage(path.display().to_string()))
        }
    }
}

/// Everything the student told us about their week
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub gender: Gender,
    /// College days; iteration order is calendar order
    pub college_days: BTreeSet<Weekday>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub season: Season,
    pub style: StylePreference,
    pub additional_instructions: String,
    pub photo: Option<Photo>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            gender: Gender::default(),
            college_days: Weekday::ALL[..5].iter().copied().collect(),
            start_time: ClockTime(NaiveTime::MIN + chrono::Duration::hours(9)),
            end_time: ClockTime(NaiveTime::MIN + chrono::Duration::hours(16)),
            season: Season::default(),
            style: StylePreference::default(),
            additional_instructions: String::new(),
            photo: None,
        }
    }
}

impl Preferences {
    pub fn has_college(&self, day: Weekday) -> bool {
        self.college_days.contains(&day)
    }

    /// Weekdays not in the college schedule, in calendar order
    pub fn off_days(&self) -> Vec<Weekday> {
        Weekday::ALL.into_iter().filter(|d| !self.has_college(*d)).collect()
    }

    /// Flip a day in or out of the college schedule
    pub fn toggle_day(&mut self, day: Weekday) {
        debug!(%day, "Preferences::toggle_day: called");
        if !self.college_days.remove(&day) {
            self.college_days.insert(day);
        }
    }
}
