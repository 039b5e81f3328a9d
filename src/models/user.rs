//! Authenticated user identity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored trimmed and lowercased
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: &str) -> Self {
        Self {
            id: UserId::new(),
            name: name.into().trim().to_string(),
            email: email.trim().to_lowercase(),
            created_at: Utc::now(),
        }
    }

    /// Display name derived from the local part of an email address
    pub fn name_from_email(email: &str) -> String {
        email
            .trim()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}
