//! Types for authentication

use serde::{Deserialize, Serialize};
use std::fmt;

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// The user's email address
    pub email: String,

    /// The user's password
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The bearer credential
    pub token: String,

    /// The role granted to the user
    #[serde(default)]
    pub role: Option<Role>,
}

/// Role of a dashboard user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Other(String),
}

impl Role {
    /// The role name as sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Other(name) => name,
        }
    }

    /// Whether the role may manage other users
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "staff" => Role::Staff,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
