use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FolioError;

/// Open-ended field bag carried by every record next to its `id`.
pub type Fields = Map<String, Value>;

/// The named collections a portfolio document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Projects,
    Internships,
    Hackathons,
    Papers,
    Certificates,
    Settings,
    HomeProfile,
    HomeAbout,
    HomeSkills,
    HomeLinks,
    HomeCollege,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Projects,
        Collection::Internships,
        Collection::Hackathons,
        Collection::Papers,
        Collection::Certificates,
        Collection::Settings,
        Collection::HomeProfile,
        Collection::HomeAbout,
        Collection::HomeSkills,
        Collection::HomeLinks,
        Collection::HomeCollege,
    ];

    /// Key used for this collection inside the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Internships => "internships",
            Collection::Hackathons => "hackathons",
            Collection::Papers => "papers",
            Collection::Certificates => "certificates",
            Collection::Settings => "settings",
            Collection::HomeProfile => "homeProfile",
            Collection::HomeAbout => "homeAbout",
            Collection::HomeSkills => "homeSkills",
            Collection::HomeLinks => "homeLinks",
            Collection::HomeCollege => "homeCollege",
        }
    }

    pub fn is_known(name: &str) -> bool {
        Collection::ALL.iter().any(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the document key (`homeLinks`) as well as `home-links` and
/// `home_links`, case-insensitively.
impl FromStr for Collection {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| FolioError::UnknownCollection(s.to_string()))
    }
}

/// A stored record: the immutable `id` plus whatever fields the collection
/// uses. Serializes flat, as `{"id": "...", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Builds a record with `id`, dropping any `id` entry in `fields`.
    pub fn new(id: impl Into<String>, mut fields: Fields) -> Self {
        fields.shift_remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Shallow merge: supplied fields overwrite, the rest are kept, and `id`
    /// never changes.
    pub fn merge(&mut self, partial: Fields) {
        merge_fields(&mut self.fields, partial);
    }

    /// Parses one array element of a stored collection. Anything that is not
    /// an object with a string `id` yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id")?.as_str()?.to_string();
        Some(Record::new(id, obj.clone()))
    }

    /// `id` first, then the fields in their stored order.
    pub fn to_value(&self) -> Value {
        let mut obj = Fields::with_capacity(self.fields.len() + 1);
        obj.insert("id".to_string(), Value::String(self.id.clone()));
        obj.extend(self.fields.clone());
        Value::Object(obj)
    }
}

/// Overwrites keys of `target` in place with those of `partial`, skipping
/// `id`. Existing keys keep their position; new keys go at the end.
pub fn merge_fields(target: &mut Fields, partial: Fields) {
    for (key, value) in partial {
        if key != "id" {
            target.insert(key, value);
        }
    }
}
