use serde::{Deserialize, Serialize};

use crate::card::CardId;

/// `{success, data?, error?}` wrapper used by every catalog endpoint.
///
/// Create responses also carry the new `id` and a `message`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CardId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub const UNKNOWN_ERROR: &str = "Unknown error";

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            id: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            id: None,
            message: None,
        }
    }

    /// Splits the envelope into its payload or the backend's error message.
    pub fn into_result(self) -> Result<Self, String> {
        if self.success {
            Ok(self)
        } else {
            Err(self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
        }
    }
}
