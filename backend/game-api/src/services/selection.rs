use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Criteria, Tag};

/// The player's current pick per category. Always holds a slot for each of the four
/// categories, and never more than one tag in a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    slots: BTreeMap<Criteria, Option<Tag>>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            slots: Criteria::ALL.iter().map(|c| (*c, None)).collect(),
        }
    }
}

impl Selection {
    /// Stores the tag under its category, replacing any earlier pick.
    pub fn select(&mut self, tag: Tag) -> Option<Tag> {
        self.slots.insert(tag.criteria, Some(tag)).flatten()
    }

    pub fn reset(&mut self, criteria: Criteria) -> Option<Tag> {
        self.slots.insert(criteria, None).flatten()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, criteria: Criteria) -> Option<&Tag> {
        self.slots.get(&criteria).and_then(|slot| slot.as_ref())
    }

    pub fn selected_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criteria, Option<&Tag>)> {
        self.slots.iter().map(|(c, slot)| (*c, slot.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, criteria: Criteria) -> Tag {
        Tag {
            id: id.to_string(),
            value: id.to_string(),
            criteria,
            is_correct: false,
            correct_answer: "x".to_string(),
        }
    }

    #[test]
    fn test_select_overwrites_same_category() {
        let mut selection = Selection::default();
        assert!(selection.select(tag("a", Criteria::ArtistName)).is_none());

        let previous = selection.select(tag("b", Criteria::ArtistName));
        assert_eq!(previous.map(|t| t.id), Some("a".to_string()));
        assert_eq!(selection.get(Criteria::ArtistName).unwrap().id, "b");
        assert_eq!(selection.selected_count(), 1);
    }

    #[test]
    fn test_reset_clears_only_that_category() {
        let mut selection = Selection::default();
        selection.select(tag("a", Criteria::ArtistName));
        selection.select(tag("s", Criteria::Season));

        selection.reset(Criteria::ArtistName);
        assert!(selection.get(Criteria::ArtistName).is_none());
        assert!(selection.get(Criteria::Season).is_some());
        assert_eq!(selection.iter().count(), 4);
    }

    #[test]
    fn test_serializes_every_slot() {
        let json = serde_json::to_value(Selection::default()).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 4);
        assert!(map["ART NAME"].is_null());
    }
}
