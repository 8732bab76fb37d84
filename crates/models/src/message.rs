use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: String,
}

impl InsertMessage {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.sender_id == self.recipient_id {
            return Err(ModelError::Validation("cannot message yourself".into()));
        }
        if self.body.trim().is_empty() {
            return Err(ModelError::Validation("message body required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_validation() {
        let ok = InsertMessage { sender_id: 1, recipient_id: 2, body: "hello".into() };
        assert!(ok.validate().is_ok());

        let to_self = InsertMessage { recipient_id: 1, ..ok.clone() };
        assert!(to_self.validate().is_err());

        let empty = InsertMessage { body: "   ".into(), ..ok };
        assert!(empty.validate().is_err());
    }
}
