//! Storage abstractions consumed by the API guards and handlers.
//!
//! The traits are synchronous: the only implementation is in-memory and
//! every call completes without suspending.

use thiserror::Error;

use scriptorium_articles::{Article, ArticlePatch, NewArticle};
use scriptorium_auth::{NewUser, ResourceClass, UserAccount, UserChanges};
use scriptorium_core::{ArticleId, DomainError, DomainResult, SubjectId};

use chrono::{DateTime, Utc};
use std::sync::Arc;

pub mod in_memory;

pub use in_memory::InMemoryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Offset pagination window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Build a page from raw query values (`limit` in 1..=100, `offset` >= 0).
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> DomainResult<Self> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        if offset < 0 {
            return Err(DomainError::validation("offset must be >= 0"));
        }

        Ok(Self {
            limit: limit as usize,
            offset: offset as usize,
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT as usize,
            offset: 0,
        }
    }
}

/// Ownership lookup used by guards before per-item policy evaluation.
pub trait ResourceAccessor: Send + Sync {
    /// Owner of the resource. A user account is its own owner.
    fn get_owner(&self, class: ResourceClass, id: i64) -> Result<SubjectId, StoreError>;
}

impl<S> ResourceAccessor for Arc<S>
where
    S: ResourceAccessor + ?Sized,
{
    fn get_owner(&self, class: ResourceClass, id: i64) -> Result<SubjectId, StoreError> {
        (**self).get_owner(class, id)
    }
}

/// Credential lookup used by the login flow only.
pub trait IdentityStore: Send + Sync {
    /// Fails with `NotFound` for unknown usernames, wrong passwords and
    /// inactive accounts alike.
    fn find_by_credentials(&self, username: &str, password: &str) -> Result<UserAccount, StoreError>;
}

pub trait ArticleStore: Send + Sync {
    fn list_articles(&self, page: Page) -> Result<Vec<Article>, StoreError>;
    fn search_articles(&self, query: &str, page: Page) -> Result<Vec<Article>, StoreError>;
    fn get_article(&self, id: ArticleId) -> Result<Article, StoreError>;
    /// Fails with `Conflict` when the owner account does not exist.
    fn create_article(&self, draft: NewArticle, now: DateTime<Utc>) -> Result<Article, StoreError>;
    fn update_article(
        &self,
        id: ArticleId,
        patch: ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, StoreError>;
    fn delete_article(&self, id: ArticleId) -> Result<(), StoreError>;
}

pub trait UserStore: Send + Sync {
    fn list_users(&self, page: Page) -> Result<Vec<UserAccount>, StoreError>;
    fn search_users(&self, query: &str, page: Page) -> Result<Vec<UserAccount>, StoreError>;
    fn get_user(&self, id: SubjectId) -> Result<UserAccount, StoreError>;
    fn find_by_username(&self, username: &str) -> Result<UserAccount, StoreError>;
    /// Fails with `Conflict` when the username or email is taken.
    fn create_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<UserAccount, StoreError>;
    fn update_user(&self, id: SubjectId, changes: UserChanges) -> Result<UserAccount, StoreError>;
    /// Deletes the account and cascades to its articles; returns how many
    /// articles were removed.
    fn delete_user(&self, id: SubjectId) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        assert_eq!(Page::new(None, None).unwrap(), Page { limit: 20, offset: 0 });
        assert_eq!(Page::default(), Page { limit: 20, offset: 0 });
    }

    #[test]
    fn page_bounds() {
        assert!(Page::new(Some(1), Some(0)).is_ok());
        assert!(Page::new(Some(100), Some(5)).is_ok());
        assert!(Page::new(Some(0), None).is_err());
        assert!(Page::new(Some(101), None).is_err());
        assert!(Page::new(None, Some(-1)).is_err());
    }
}
