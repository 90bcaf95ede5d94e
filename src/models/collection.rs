//! Catalogue of the persisted collections.

use serde::{de::DeserializeOwned, Serialize};

/// One named array of homogeneous entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Compliments,
    Gallery,
    Guestbook,
    Journey,
}

/// Where new entries land in a collection's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Front,
    Back,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Compliments,
        Collection::Gallery,
        Collection::Guestbook,
        Collection::Journey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Compliments => "compliments",
            Collection::Gallery => "gallery",
            Collection::Guestbook => "guestbook",
            Collection::Journey => "journey",
        }
    }

    /// Name of the legacy JSON file holding this collection.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Guestbook reads newest-first, so its entries are inserted at the front.
    pub fn insert_at(&self) -> InsertAt {
        match self {
            Collection::Guestbook => InsertAt::Front,
            _ => InsertAt::Back,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity stored in exactly one collection.
pub trait CollectionEntry: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    /// Identifier used by delete; entries without one cannot be removed.
    fn entry_id(&self) -> Option<&str>;
}
