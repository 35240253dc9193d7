//! Flattened character index across all loaded repositories.

use crate::models::{EnhancedCharacter, RepositoryData};
use std::collections::HashMap;
use std::sync::Arc;

/// Characters keyed by composite id, in first-insertion order.
#[derive(Debug, Default)]
pub(crate) struct CharacterIndex {
    positions: HashMap<String, usize>,
    characters: Vec<EnhancedCharacter>,
}

impl CharacterIndex {
    /// Rebuild from scratch. A later repository's entry replaces an earlier
    /// one with the same composite id but keeps the earlier slot.
    pub(crate) fn rebuild<'a>(
        &mut self,
        repositories: impl IntoIterator<Item = &'a Arc<RepositoryData>>,
    ) {
        self.clear();
        for data in repositories {
            for character in &data.characters {
                match self.positions.get(&character.unique_id) {
                    Some(&slot) => self.characters[slot] = character.clone(),
                    None => {
                        self.positions
                            .insert(character.unique_id.clone(), self.characters.len());
                        self.characters.push(character.clone());
                    }
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
        self.characters.clear();
    }

    pub(crate) fn get(&self, unique_id: &str) -> Option<&EnhancedCharacter> {
        self.positions
            .get(unique_id)
            .map(|&slot| &self.characters[slot])
    }

    pub(crate) fn search(&self, query: &str) -> Vec<EnhancedCharacter> {
        let lowered = query.to_lowercase();
        self.characters
            .iter()
            .filter(|c| c.matches(&lowered))
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.characters.len()
    }
}
