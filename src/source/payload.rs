//! Wire model for the Markaz content API.
//!
//! The API is backed by a spreadsheet, so cells arrive loosely typed: an ID
//! may be `7` or `"7"`, an empty counter cell is `""`, and any column can be
//! missing.  Everything is normalised here, at the boundary, so the rest of
//! the application sees plain Rust types:
//!
//! * integer cells → `Option<u64>` (absent when empty or non-numeric), except
//!   `ID` which defaults to `0`;
//! * text cells → `String` (empty when absent or null);
//! * `Difficulty_Level` → [`Difficulty`] (absent when unrecognised);
//! * missing collections → empty.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The JSON envelope wrapping every read response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Payload>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Everything the API returns for one `getAllData` read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Payload {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub featured_content: Vec<FeaturedItem>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub learning_videos: Vec<LearningVideo>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub learning_resources: Vec<LearningResource>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub site_settings: HashMap<String, SiteSetting>,
}

impl Payload {
    /// Look up a site setting, falling back to `default` when the key is
    /// missing or its value is blank.
    pub fn setting<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.site_settings
            .get(key)
            .map(|s| s.value.as_str())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    }

    /// Description of the category named `name`, if one is listed.
    pub fn category_description(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.description.as_str())
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeaturedItem {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Badge label such as "Hot", "New" or "Top".
    #[serde(rename = "Type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(rename = "Link_URL", default, deserialize_with = "lenient_string")]
    pub link_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LearningVideo {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "Lesson_Number", default, deserialize_with = "lenient_u64")]
    pub lesson_number: Option<u64>,
    #[serde(rename = "Duration", default, deserialize_with = "lenient_opt_string")]
    pub duration: Option<String>,
    #[serde(rename = "Difficulty_Level", default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(rename = "Video_URL", default, deserialize_with = "lenient_string")]
    pub video_url: String,
    #[serde(rename = "Views", default, deserialize_with = "lenient_u64")]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LearningResource {
    #[serde(rename = "ID", default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(rename = "Title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Format badge such as "PDF" or "Course".
    #[serde(rename = "Resource_Type", default, deserialize_with = "lenient_opt_string")]
    pub resource_type: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(rename = "Link_URL", default, deserialize_with = "lenient_string")]
    pub link_url: String,
    #[serde(rename = "Download_URL", default, deserialize_with = "lenient_string")]
    pub download_url: String,
    #[serde(rename = "File_Size", default, deserialize_with = "lenient_opt_string")]
    pub file_size: Option<String>,
    #[serde(rename = "Downloads", default, deserialize_with = "lenient_u64")]
    pub downloads: Option<u64>,
}

impl LearningResource {
    /// The URL opened on selection: the link, or the download when there is
    /// no link.
    pub fn target_url(&self) -> &str {
        if self.link_url.trim().is_empty() {
            &self.download_url
        } else {
            &self.link_url
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Category {
    #[serde(rename = "Category_Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SiteSetting {
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

/// Video difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Basic => "Basic",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Case-insensitive parse; `None` for anything unrecognised.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Lenient cell decoding
// ---------------------------------------------------------------------------

fn cell_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cell_to_u64(value: Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(cell_to_string).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .and_then(cell_to_string)
        .filter(|s| !s.trim().is_empty()))
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(cell_to_u64))
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(lenient_u64(d)?.unwrap_or_default())
}

fn lenient_difficulty<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Difficulty>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .and_then(cell_to_string)
        .and_then(|s| Difficulty::parse(&s)))
}

/// A collection that is `null` decodes as empty instead of failing the read.
fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

fn lenient_map<'de, D, T>(d: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<HashMap<String, T>>::deserialize(d)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
