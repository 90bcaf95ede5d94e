//! Blessing models matching the frontend DuaResponse interface.

use serde::{Deserialize, Serialize};

/// A devotional text and its translation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Dua {
    pub dua: &'static str,
    pub translation: &'static str,
}

/// Request body for generating a blessing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDuaRequest {
    /// Accepted for compatibility; does not influence the result
    #[serde(default)]
    pub guest_name: Option<String>,
}
