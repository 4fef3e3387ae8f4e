//! Article entity.
//!
//! # Invariants
//! - An article has exactly one owner, bound at creation and never transferred.
//! - Title and content are never blank; titles are at most 255 characters.
//! - `updated_at` is refreshed on every applied patch.

use chrono::{DateTime, Utc};
use serde::Serialize;

use scriptorium_core::{ArticleId, DomainError, DomainResult, SubjectId};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub owner_id: SubjectId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Materialize a validated draft under a storage-assigned id.
    pub fn from_draft(id: ArticleId, draft: NewArticle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match on title or content.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }

    /// Apply an already-validated patch.
    pub fn apply(&mut self, patch: ArticlePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now;
    }
}

/// A validated article that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    owner_id: SubjectId,
    title: String,
    content: String,
}

impl NewArticle {
    pub fn new(owner_id: SubjectId, title: &str, content: &str) -> DomainResult<Self> {
        Ok(Self {
            owner_id,
            title: validate_title(title)?,
            content: validate_content(content)?,
        })
    }

    pub fn owner_id(&self) -> SubjectId {
        self.owner_id
    }
}

/// Partial update; `None` leaves a field untouched. Ownership is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    title: Option<String>,
    content: Option<String>,
}

impl ArticlePatch {
    pub fn new(title: Option<&str>, content: Option<&str>) -> DomainResult<Self> {
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            content: content.map(validate_content).transpose()?,
        })
    }
}

fn validate_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> DomainResult<String> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content cannot be empty"));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap()
    }

    fn stored() -> Article {
        let draft = NewArticle::new(SubjectId::new(1), "Test Article", "Test content here.").unwrap();
        Article::from_draft(ArticleId::new(10), draft, t0())
    }

    #[test]
    fn draft_trims_title_and_keeps_owner() {
        let draft = NewArticle::new(SubjectId::new(4), "  Hello  ", "body").unwrap();
        assert_eq!(draft.owner_id(), SubjectId::new(4));

        let article = Article::from_draft(ArticleId::new(1), draft, t0());
        assert_eq!(article.title, "Hello");
        assert_eq!(article.content, "body");
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(NewArticle::new(SubjectId::new(1), "   ", "body").is_err());
        assert!(NewArticle::new(SubjectId::new(1), "title", " \n").is_err());
        assert!(NewArticle::new(SubjectId::new(1), &"t".repeat(256), "body").is_err());
        assert!(ArticlePatch::new(Some(""), None).is_err());
    }

    #[test]
    fn patch_updates_given_fields_and_timestamp() {
        let mut article = stored();
        let later = t0() + Duration::minutes(5);

        article.apply(ArticlePatch::new(Some("Updated Title"), None).unwrap(), later);

        assert_eq!(article.title, "Updated Title");
        assert_eq!(article.content, "Test content here.");
        assert_eq!(article.owner_id, SubjectId::new(1));
        assert_eq!(article.created_at, t0());
        assert_eq!(article.updated_at, later);
    }

    #[test]
    fn empty_patch_only_touches_timestamp() {
        let mut article = stored();
        let later = t0() + Duration::minutes(1);

        article.apply(ArticlePatch::new(None, None).unwrap(), later);

        assert_eq!(article.title, "Test Article");
        assert_eq!(article.content, "Test content here.");
        assert_eq!(article.updated_at, later);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let article = stored();
        assert!(article.matches("test"));
        assert!(article.matches("CONTENT"));
        assert!(!article.matches("xyznotexist"));
    }

    #[test]
    fn serializes_owner_and_timestamps() {
        let json = serde_json::to_value(stored()).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["owner_id"], 1);
        assert_eq!(json["title"], "Test Article");
        assert!(json["created_at"].is_string());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a draft's owner is exactly the id it was created for.
            #[test]
            fn draft_owner_is_preserved(
                owner in 1i64..1_000_000,
                title in "[A-Za-z][A-Za-z0-9 ]{0,50}",
                content in "[A-Za-z0-9 ]{0,40}[A-Za-z]",
            ) {
                let draft = NewArticle::new(SubjectId::new(owner), &title, &content).unwrap();
                let article = Article::from_draft(ArticleId::new(1), draft, t0());
                prop_assert_eq!(article.owner_id, SubjectId::new(owner));
            }

            /// Property: patches never change ownership.
            #[test]
            fn patch_never_changes_owner(
                title in proptest::option::of("[A-Za-z]{1,20}"),
                content in proptest::option::of("[A-Za-z]{1,20}"),
            ) {
                let mut article = stored();
                let patch = ArticlePatch::new(title.as_deref(), content.as_deref()).unwrap();
                article.apply(patch, t0());
                prop_assert_eq!(article.owner_id, SubjectId::new(1));
            }
        }
    }
}
