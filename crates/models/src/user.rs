use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Patient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub specialty: Option<String>,
}

impl InsertUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        validate_name(&self.name)
    }
}

/// Profile payload from an external identity provider; keyed by email.
/// Role is optional so an upsert does not flip an existing account's role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpsertUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub specialty: Option<String>,
}

impl UpsertUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        validate_name(&self.name)
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_user_validation() {
        let ok = InsertUser {
            email: "sarah.morgan@example.com".into(),
            name: "Dr. Sarah Morgan".into(),
            role: UserRole::Doctor,
            specialty: Some("General Medicine".into()),
        };
        assert!(ok.validate().is_ok());

        let bad_email = InsertUser { email: "not-an-email".into(), ..ok.clone() };
        assert!(matches!(bad_email.validate(), Err(ModelError::Validation(_))));

        let bad_name = InsertUser { name: "  ".into(), ..ok };
        assert!(matches!(bad_name.validate(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Doctor).unwrap(), "\"doctor\"");
        assert_eq!(serde_json::to_string(&UserRole::Patient).unwrap(), "\"patient\"");
    }
}
