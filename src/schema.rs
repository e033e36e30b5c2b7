//! Typed views over the known collections.
//!
//! Each struct names the fields the site reads for that collection. Fields
//! the struct does not know about land in `extra`, so a record survives a
//! typed round trip unchanged.

use serde::{Deserialize, Serialize};

use crate::record::Fields;

/// Settings key whose value holds the downloadable resume.
pub const RESUME_SETTING: &str = "resumePdf";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub image: String,
    pub github: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Internship {
    pub id: String,
    pub company: String,
    pub role: String,
    pub period: String,
    pub description: String,
    pub image: String,
    pub website: String,
    pub github: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hackathon {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub github: String,
    #[serde(flatten)]
    pub extra: Fields,
}

/// `pdf` is either empty or a data URL (see [`crate::embed`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pdf: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub valid: String,
    pub image: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeProfile {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub image: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeAbout {
    pub id: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Fields,
}

/// `skills` holds a JSON array encoded as a string, e.g. `["C","Rust"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeSkills {
    pub id: String,
    pub category: String,
    pub skills: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl HomeSkills {
    /// Decoded `skills`; empty when the string is not a JSON string array.
    pub fn skill_list(&self) -> Vec<String> {
        serde_json::from_str(&self.skills).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeLink {
    pub id: String,
    pub label: String,
    pub url: String,
    pub icon: String,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeCollege {
    pub id: String,
    pub year: String,
    pub slide_index: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(flatten)]
    pub extra: Fields,
}

/// The resume setting, if one has been uploaded. The first non-empty
/// `resumePdf` entry wins.
pub fn active_resume(settings: &[Setting]) -> Option<&Setting> {
    settings
        .iter()
        .find(|s| s.key == RESUME_SETTING && !s.value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Collection;
    use crate::store::RecordStore;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn test_every_seed_collection_reads_typed() {
        let store = RecordStore::new(MemoryStorage::new());
        assert_eq!(store.get_all_as::<Internship>(Collection::Internships).unwrap().len(), 2);
        assert_eq!(store.get_all_as::<Hackathon>(Collection::Hackathons).unwrap().len(), 3);
        assert_eq!(store.get_all_as::<Paper>(Collection::Papers).unwrap().len(), 2);
        assert_eq!(store.get_all_as::<Certificate>(Collection::Certificates).unwrap()[1].issuer, "AWS");
        assert_eq!(store.get_all_as::<HomeProfile>(Collection::HomeProfile).unwrap().len(), 1);
        assert_eq!(store.get_all_as::<HomeAbout>(Collection::HomeAbout).unwrap().len(), 1);
        assert_eq!(store.get_all_as::<HomeLink>(Collection::HomeLinks).unwrap()[0].icon, "github");

        let college = store.get_all_as::<HomeCollege>(Collection::HomeCollege).unwrap();
        assert_eq!(college[5].year, "2nd Year");
        assert_eq!(college[5].slide_index, "0");
        assert!(college.iter().all(|c| c.extra.is_empty()));
    }

    #[test]
    fn test_skill_list() {
        let store = RecordStore::new(MemoryStorage::new());
        let skills = store.get_all_as::<HomeSkills>(Collection::HomeSkills).unwrap();
        assert_eq!(skills[2].skill_list(), vec!["MySQL"]);

        let broken = HomeSkills {
            skills: "C, Rust".to_string(),
            ..Default::default()
        };
        assert!(broken.skill_list().is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_in_extra() {
        let value = json!({"id": "p9", "title": "T", "stars": 12});
        let project: Project = serde_json::from_value(value).unwrap();
        assert_eq!(project.extra.get("stars"), Some(&json!(12)));
        assert!(project.tech.is_empty());

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["stars"], json!(12));
        assert_eq!(back["id"], json!("p9"));
    }

    #[test]
    fn test_active_resume() {
        let store = RecordStore::new(MemoryStorage::new());
        let settings = store.get_all_as::<Setting>(Collection::Settings).unwrap();
        assert!(active_resume(&settings).is_none());

        let mut settings = settings;
        settings.push(Setting {
            id: "s2".to_string(),
            key: RESUME_SETTING.to_string(),
            value: "data:application/pdf;base64,JVBERi0=".to_string(),
            ..Default::default()
        });
        assert_eq!(active_resume(&settings).map(|s| s.id.as_str()), Some("s2"));
    }
}
