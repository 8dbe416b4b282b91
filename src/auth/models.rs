//! Authentication models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, unique across the store
    pub email: String,
    /// Bcrypt hash of the password, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Create a new user with a fresh id
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            created_at: chrono::Utc::now(),
        }
    }
}

/// User information in responses
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Per-field validation errors keyed by field name
pub type FieldErrors = HashMap<String, Vec<String>>;

impl RegisterRequest {
    /// Validate the payload shape, returning per-field errors
    pub fn validate(&self) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors
                .entry("name".to_string())
                .or_default()
                .push("The name field is required.".to_string());
        }
        if !is_plausible_email(&self.email) {
            errors
                .entry("email".to_string())
                .or_default()
                .push("The email must be a valid email address.".to_string());
        }
        if self.password.len() < 8 {
            errors
                .entry("password".to_string())
                .or_default()
                .push("The password must be at least 8 characters.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
        );
        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$hash"));
    }

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_fields() {
        let req = RegisterRequest {
            name: "  ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().expect_err("should be invalid");
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn test_user_id_uniqueness() {
        let a = User::new("A".into(), "a@x.com".into(), "h".into());
        let b = User::new("A".into(), "a@x.com".into(), "h".into());
        assert_ne!(a.id, b.id);
    }
}
