use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bcrypt::{hash, verify, DEFAULT_COST};

// Closed role set; stored lowercase so records stay readable in redis-cli.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,  // bcrypt hash, never the plaintext
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    // Stores a fresh salted hash; the plaintext is never kept.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), bcrypt::BcryptError> {
        self.password_hash = hash(plaintext.as_bytes(), DEFAULT_COST)?;
        Ok(())
    }

    // A malformed stored hash counts as a failed check, not a panic.
    pub fn verify_password(&self, plaintext: &str) -> bool {
        verify(plaintext, &self.password_hash).unwrap_or(false)
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");

        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Client);
    }

    #[test]
    fn test_role_rejects_unknown_string() {
        let result: Result<Role, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
    }

    fn sample_user() -> User {
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Client,
            first_name: None,
            last_name: None,
            phone: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(sample_user().display_name(), "jdoe");
    }

    #[test]
    fn test_set_password_then_verify() {
        let mut user = sample_user();
        user.set_password("hunter2").unwrap();

        assert_ne!(user.password_hash, "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn test_verify_against_garbage_hash_fails_closed() {
        let user = sample_user();  // empty hash, not a valid bcrypt string
        assert!(!user.verify_password("anything"));
    }
}
