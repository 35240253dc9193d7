//! Character records as served by a repository and their indexed form.

use crate::error::{Result, SekaiError};
use crate::config::RepositoryConfig;
use serde::{Deserialize, Serialize};

/// Raw character entry from a repository's `characters.json`.
///
/// Unknown fields in the source document (for example `defaultText`) are
/// dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Identifier, unique within its repository.
    pub id: String,
    /// Display name shown in the picker.
    pub name: String,
    /// In-universe character name.
    pub character: String,
    /// Sticker image path relative to the repository's `stickers/` directory.
    pub img: String,
    /// Text color used when composing the sticker.
    pub color: String,
}

impl CharacterRecord {
    /// Check the record is usable as an index entry.
    pub fn validate(&self, position: usize) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SekaiError::invalid_document(
                RepositoryConfig::CHARACTERS_DOCUMENT,
                format!("entry {} has an empty id", position),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(SekaiError::invalid_document(
                RepositoryConfig::CHARACTERS_DOCUMENT,
                format!("entry {} ({}) has an empty name", position, self.id),
            ));
        }
        if self.img.trim().is_empty() {
            return Err(SekaiError::invalid_document(
                RepositoryConfig::CHARACTERS_DOCUMENT,
                format!("entry {} ({}) has no image path", position, self.id),
            ));
        }
        Ok(())
    }
}

/// A character annotated with its owning repository.
///
/// Only the library builds these, from a [`CharacterRecord`] and the name the
/// repository declares in its `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct EnhancedCharacter {
    pub id: String,
    pub name: String,
    pub character: String,
    pub img: String,
    pub color: String,
    /// `repository_name + ":" + id`, the key in the global character index.
    pub unique_id: String,
    pub repository_name: String,
}

impl EnhancedCharacter {
    pub(crate) fn new(record: CharacterRecord, repository_name: &str) -> Self {
        let unique_id = unique_id(repository_name, &record.id);
        Self {
            id: record.id,
            name: record.name,
            character: record.character,
            img: record.img,
            color: record.color,
            unique_id,
            repository_name: repository_name.to_string(),
        }
    }

    /// Global search predicate. `lowered_query` must already be lowercase.
    pub(crate) fn matches(&self, lowered_query: &str) -> bool {
        [&self.id, &self.name, &self.character, &self.unique_id]
            .iter()
            .any(|field| field.to_lowercase().contains(lowered_query))
    }

    /// Picker predicate: exact id, or a name / character-name substring.
    pub(crate) fn matches_picker(&self, lowered_query: &str) -> bool {
        lowered_query.is_empty()
            || self.id == lowered_query
            || self.name.to_lowercase().contains(lowered_query)
            || self.character.to_lowercase().contains(lowered_query)
    }
}

/// Build the composite identifier used as the index key.
pub fn unique_id(repository_name: &str, character_id: &str) -> String {
    format!("{}:{}", repository_name, character_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miku() -> CharacterRecord {
        CharacterRecord {
            id: "01".into(),
            name: "Miku".into(),
            character: "Miku Hatsune".into(),
            img: "01.png".into(),
            color: "#33ccaa".into(),
        }
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let raw = r##"{"id":"01","name":"Miku","character":"Miku Hatsune","img":"01.png","color":"#33ccaa","defaultText":{"text":"hi","x":1}}"##;
        let record: CharacterRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record, miku());

        let round = serde_json::to_value(&record).unwrap();
        assert!(round.get("defaultText").is_none());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let raw = r#"{"id":"01","name":"Miku","img":"01.png","color":"red"}"#;
        assert!(serde_json::from_str::<CharacterRecord>(raw).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(miku().validate(0).is_ok());

        let mut blank = miku();
        blank.id = "  ".into();
        let err = blank.validate(4).unwrap_err();
        assert!(err.to_string().contains("entry 4"));

        let mut unnamed = miku();
        unnamed.name = String::new();
        let err = unnamed.validate(2).unwrap_err();
        assert!(matches!(err, SekaiError::InvalidDocument { .. }));
        assert!(err.to_string().contains("entry 2 (01) has an empty name"));

        let mut imageless = miku();
        imageless.img = " ".into();
        assert!(imageless.validate(0).unwrap_err().to_string().contains("no image path"));
    }

    #[test]
    fn test_enhanced_character_composite_id() {
        let enhanced = EnhancedCharacter::new(miku(), "Alpha");
        assert_eq!(enhanced.unique_id, "Alpha:01");
        assert_eq!(enhanced.repository_name, "Alpha");
        assert_eq!(enhanced.name, "Miku");

        let json = serde_json::to_value(&enhanced).unwrap();
        assert_eq!(json["uniqueId"], "Alpha:01");
        assert_eq!(json["repositoryName"], "Alpha");
    }

    #[test]
    fn test_matches_any_field_case_insensitive() {
        let enhanced = EnhancedCharacter::new(miku(), "Alpha");
        assert!(enhanced.matches("hatsune"));
        assert!(enhanced.matches("alpha:0"));
        assert!(enhanced.matches("01"));
        assert!(enhanced.matches(""));
        assert!(!enhanced.matches("rin"));
    }

    #[test]
    fn test_matches_picker() {
        let enhanced = EnhancedCharacter::new(miku(), "Alpha");
        assert!(enhanced.matches_picker(""));
        assert!(enhanced.matches_picker("01"));
        assert!(enhanced.matches_picker("mik"));
        // Picker does not do substring matching on ids or the repository name
        assert!(!enhanced.matches_picker("1"));
        assert!(!enhanced.matches_picker("alpha"));
    }
}
