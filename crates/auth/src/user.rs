//! User accounts (the subjects that can authenticate).
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - Usernames and emails are unique (enforced by storage; emails are stored
//!   lowercased so uniqueness is case-insensitive).
//! - The role only changes through the admin-only update operation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use scriptorium_core::{DomainError, DomainResult, SubjectId};

use crate::{Role, Subject};

const MAX_USERNAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub id: SubjectId,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; never leaves the service.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn subject(&self) -> Subject {
        Subject::new(self.id, self.role)
    }

    /// Case-insensitive substring match on username or email.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.username.to_lowercase().contains(&needle) || self.email.contains(&needle)
    }

    /// Apply already-normalized changes.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
    }
}

/// Input for creating an account (password already hashed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(
        username: &str,
        email: &str,
        password_hash: String,
        role: Role,
        is_active: bool,
    ) -> DomainResult<Self> {
        Ok(Self {
            username: normalize_username(username)?,
            email: normalize_email(email)?,
            password_hash,
            role,
            is_active,
        })
    }
}

/// Partial update of an account; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// Validate and normalize the provided fields.
    pub fn normalized(self) -> DomainResult<Self> {
        Ok(Self {
            username: self.username.as_deref().map(normalize_username).transpose()?,
            email: self.email.as_deref().map(normalize_email).transpose()?,
            ..self
        })
    }
}

/// Reject empty passwords before they are hashed.
pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.is_empty() {
        return Err(DomainError::validation("password cannot be empty"));
    }
    Ok(())
}

fn normalize_username(username: &str) -> DomainResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim();
    let valid_shape = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.contains('@'));
    if !valid_shape {
        return Err(DomainError::validation("invalid email format"));
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(DomainError::validation(format!(
            "email must be at most {MAX_EMAIL_LEN} characters"
        )));
    }
    Ok(email.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: SubjectId::new(1),
            username: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_user_normalizes_fields() {
        let user = NewUser::new("  bob ", " Bob@Example.COM ", "h".into(), Role::Editor, true).unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.email, "bob@example.com");
        assert_eq!(user.role, Role::Editor);
    }

    #[test]
    fn new_user_rejects_invalid_input() {
        assert!(NewUser::new("", "a@b.c", "h".into(), Role::User, true).is_err());
        assert!(NewUser::new("bob", "invalid-email", "h".into(), Role::User, true).is_err());
        assert!(NewUser::new("bob", "@example.com", "h".into(), Role::User, true).is_err());
        let long = "x".repeat(101);
        assert!(NewUser::new(&long, "a@b.c", "h".into(), Role::User, true).is_err());
    }

    #[test]
    fn changes_apply_only_provided_fields() {
        let mut user = account();
        let changes = UserChanges {
            role: Some(Role::Admin),
            email: Some("NEW@example.com".to_string()),
            ..Default::default()
        }
        .normalized()
        .unwrap();

        user.apply(changes);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.username, "Alice");
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn search_matches_username_or_email_case_insensitively() {
        let user = account();
        assert!(user.matches("ali"));
        assert!(user.matches("EXAMPLE"));
        assert!(!user.matches("bob"));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let json = serde_json::to_value(account()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn empty_password_rejected() {
        assert!(validate_password("").is_err());
        assert!(validate_password("pw").is_ok());
    }
}
