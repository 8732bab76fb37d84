use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Metadata for a file a user shared during or around a consultation. The
/// bytes themselves live with an external blob store; we only track ownership.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: Option<u64>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertDocument {
    pub owner_id: i64,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl InsertDocument {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("document title required".into()));
        }
        if self.file_name.trim().is_empty() {
            return Err(ModelError::Validation("file name required".into()));
        }
        Ok(())
    }
}
