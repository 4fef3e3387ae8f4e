use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scriptorium_auth::{IssuedToken, Role};
use scriptorium_core::DomainError;
use scriptorium_infra::Page;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create payload. Any owner/author field a client sends is ignored; the
/// owner is always the acting subject.
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Result<Page, ApiError> {
        Ok(Page::new(self.limit, self.offset)?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchQuery {
    /// The trimmed, non-empty search term and the page window.
    pub fn parts(&self) -> Result<(&str, Page), ApiError> {
        let q = self.q.as_deref().map(str::trim).unwrap_or_default();
        if q.is_empty() {
            return Err(ApiError::Validation("query parameter 'q' is required".to_string()));
        }
        Ok((q, Page::new(self.limit, self.offset)?))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

pub fn token_to_json(token: IssuedToken, ttl: chrono::Duration) -> TokenResponse {
    TokenResponse {
        access_token: token.access_token,
        token_type: "bearer",
        expires_in: ttl.num_seconds(),
    }
}

/// Parse a path id; malformed ids are a `400 invalid_id`.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    Ok(raw.parse::<T>()?)
}

#[cfg(test)]
mod tests {
    use scriptorium_core::ArticleId;

    use super::*;

    #[test]
    fn search_requires_non_blank_term() {
        let q = SearchQuery {
            q: Some("  rust ".into()),
            ..Default::default()
        };
        let (term, page) = q.parts().unwrap();
        assert_eq!(term, "rust");
        assert_eq!(page, Page::default());

        let blank = SearchQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(blank.parts(), Err(ApiError::Validation(_))));
        assert!(SearchQuery::default().parts().is_err());
    }

    #[test]
    fn page_query_rejects_out_of_range() {
        let q = PageQuery {
            limit: Some(500),
            offset: None,
        };
        assert!(matches!(q.page(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id::<ArticleId>("12").unwrap(), ArticleId::new(12));
        assert!(matches!(parse_id::<ArticleId>("abc"), Err(ApiError::InvalidId(_))));
        assert!(matches!(parse_id::<ArticleId>("-3"), Err(ApiError::InvalidId(_))));
    }

    #[test]
    fn create_user_defaults_role_and_activity() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "newuser",
            "email": "new@test.com",
            "password": "pass123",
        }))
        .unwrap();
        assert_eq!(req.role, Role::User);
        assert!(req.is_active);
    }
}
