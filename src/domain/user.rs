//! # User Domain Model
//!
//! The user record managed by the user service, its role enum, and the seed
//! records every service instance starts with. JSON uses camelCase keys and
//! RFC 3339 timestamps.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::ServiceError;
use crate::store::Record;

/// Access role attached to a user account
///
/// Serialized lowercase (`"admin"` / `"user"`); unknown values are rejected
/// at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl UserRole {
    /// The lowercase wire name of this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(ServiceError::validation(
                "Role must be either 'admin' or 'user'",
            )),
        }
    }
}

/// A user account record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier; seed records use small numeric strings, created
    /// records get a UUID
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address, unique across the collection
    pub email: String,

    /// Access role
    pub role: UserRole,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp; absent until the record is first updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a fresh user record with a generated id
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            role,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Stamp the record as modified now
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The records every user service instance starts with
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            role: UserRole::Admin,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            updated_at: None,
        },
        User {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            role: UserRole::User,
            created_at: Utc.with_ymd_and_hms(2024, 1, 16, 14, 20, 0).unwrap(),
            updated_at: None,
        },
        User {
            id: "3".to_string(),
            name: "Bob Wilson".to_string(),
            email: "bob.wilson@example.com".to_string(),
            role: UserRole::User,
            created_at: Utc.with_ymd_and_hms(2024, 1, 17, 9, 45, 0).unwrap(),
            updated_at: None,
        },
    ]
}
