//! Guestbook model matching the frontend GuestbookMessage interface.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, CollectionEntry};

/// A free-text message left by a guest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestbookMessage {
    /// Creation time in epoch milliseconds
    pub id: String,
    pub name: String,
    pub message: String,
    /// ISO-8601 creation timestamp
    pub date: String,
}

impl GuestbookMessage {
    /// Build a message stamped with `now`. Two messages created in the same
    /// millisecond share an id.
    pub fn new(name: String, message: String, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            name,
            message,
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl CollectionEntry for GuestbookMessage {
    const COLLECTION: Collection = Collection::Guestbook;

    fn entry_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

/// Request body for posting a guestbook message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGuestbookRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
