//! User accounts
//!
//! Registration data only. Password hashing happens upstream; the document
//! stores whatever hash it is handed and never interprets it.

use crate::id::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Document id
    pub id: UserId,
    /// Unique login name
    pub username: String,
    /// Opaque password hash, produced upstream
    pub password_hash: String,
    /// Contact email
    pub email: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user document
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_creation() {
        let user = User::new("ada", "ada@example.com", "$2b$05$hash");
        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
    }
}
