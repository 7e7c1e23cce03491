use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub status: String,
    pub role_id: Uuid,
    pub is_protected: bool,
    pub is_trashed: bool,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account status, stored as text in the `users.status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Blocked => "BLOCKED",
        }
    }

    /// Map a raw status filter value to a known status, None when the
    /// value is not one of the stored statuses
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ACTIVE" => Some(UserStatus::Active),
            "INACTIVE" => Some(UserStatus::Inactive),
            "BLOCKED" => Some(UserStatus::Blocked),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses_only() {
        assert_eq!(UserStatus::parse("ACTIVE"), Some(UserStatus::Active));
        assert_eq!(UserStatus::parse("active"), None);
        assert_eq!(UserStatus::parse("all"), None);
    }
}
