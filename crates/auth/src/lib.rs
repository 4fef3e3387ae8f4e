//! `scriptorium-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it verifies
//! credentials, resolves the acting [`Subject`] and decides what that subject
//! may do. Fetching ownership metadata and running the actual CRUD operation
//! are the caller's job.

pub mod claims;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod user;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use identity::{IdentityResolver, Unauthenticated, bearer_token};
pub use jwt::{Hs256JwtValidator, IssuedToken, JwtValidator, TokenError, TokenIssuer};
pub use password::{PasswordError, hash_password, verify_password};
pub use policy::{
    AccessDecision, Action, AllowReason, ArticleAction, DenyReason, Forbidden, ResourceClass,
    UserAction, authorize, owner_for_new_article,
};
pub use principal::Subject;
pub use roles::{Role, UnknownRole};
pub use user::{NewUser, UserAccount, UserChanges, validate_password};
