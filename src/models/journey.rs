//! Journey milestone model matching the frontend JourneyMilestone interface.

use serde::{Deserialize, Serialize};

use super::{Collection, CollectionEntry};

/// A step of the couple's story. Read-only; loaded from the legacy seed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JourneyMilestone {
    pub id: String,
    pub title: String,
    /// Display string, not a parsed date
    pub date: String,
    pub description: String,
    pub image: String,
}

impl CollectionEntry for JourneyMilestone {
    const COLLECTION: Collection = Collection::Journey;

    fn entry_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}
