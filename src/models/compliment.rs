//! Compliment model matching the frontend Compliment interface.

use serde::{Deserialize, Serialize};

use super::{Collection, CollectionEntry};

/// Relationship of a supporter to the couple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComplimentTag {
    Family,
    Friend,
}

impl ComplimentTag {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Family" => Some(ComplimentTag::Family),
            "Friend" => Some(ComplimentTag::Friend),
            _ => None,
        }
    }
}

/// A named supporter entry with a photo, shown in the credits section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Compliment {
    /// Absent on entries imported from the legacy store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Image reference (file name or URL)
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ComplimentTag>,
}

impl CollectionEntry for Compliment {
    const COLLECTION: Collection = Collection::Compliments;

    fn entry_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
