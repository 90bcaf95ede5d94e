//! Gallery model matching the frontend GalleryImage interface.

use serde::{Deserialize, Serialize};

use super::{Collection, CollectionEntry};

/// A captioned photo in the gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Image reference (file name or URL)
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

impl CollectionEntry for GalleryItem {
    const COLLECTION: Collection = Collection::Gallery;

    fn entry_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
