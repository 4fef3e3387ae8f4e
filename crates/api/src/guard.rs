//! Endpoint guards.
//!
//! Each guarded operation calls exactly one of these before touching
//! storage. They combine the resolved [`Subject`], the ownership lookup and
//! the policy engine; the handler runs the CRUD call only when the guard
//! returns `Ok`.
//!
//! For per-item article actions the existence check happens first, so a
//! missing article is reported as not found even to a subject who could not
//! have modified it.

use thiserror::Error;

use scriptorium_articles::NewArticle;
use scriptorium_auth::{
    AccessDecision, Action, AllowReason, ArticleAction, Forbidden, ResourceClass, Subject,
    UserAction, authorize, owner_for_new_article,
};
use scriptorium_core::{ArticleId, DomainError, SubjectId};
use scriptorium_infra::{ResourceAccessor, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Forbidden(#[from] Forbidden),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(StoreError),
}

/// Guard a collection-level article action (list, search, create).
pub fn guard_article_collection(
    subject: &Subject,
    action: ArticleAction,
) -> Result<AllowReason, GuardError> {
    debug_assert!(!action.is_per_item());
    Ok(enforce(subject, Action::Article(action), None)?)
}

/// Guard a per-item article action (read, update, delete).
pub fn guard_article_item<A>(
    accessor: &A,
    subject: &Subject,
    action: ArticleAction,
    id: ArticleId,
) -> Result<AllowReason, GuardError>
where
    A: ResourceAccessor + ?Sized,
{
    debug_assert!(action.is_per_item());

    let owner = match accessor.get_owner(ResourceClass::Article, id.get()) {
        Ok(owner) => owner,
        Err(StoreError::NotFound) => return Err(GuardError::NotFound("article")),
        Err(e) => return Err(GuardError::Store(e)),
    };

    Ok(enforce(subject, Action::Article(action), Some(owner))?)
}

/// Guard an account-management action. These never look at ownership;
/// existence of a targeted account is checked by the handler afterwards.
pub fn guard_user(subject: &Subject, action: UserAction) -> Result<AllowReason, GuardError> {
    Ok(enforce(subject, Action::User(action), None)?)
}

/// Guard article creation and build the draft, bound to the acting subject.
pub fn draft_article(subject: &Subject, title: &str, content: &str) -> Result<NewArticle, GuardError> {
    guard_article_collection(subject, ArticleAction::Create)?;
    Ok(NewArticle::new(owner_for_new_article(subject), title, content)?)
}

fn enforce(
    subject: &Subject,
    action: Action,
    owner: Option<SubjectId>,
) -> Result<AllowReason, Forbidden> {
    let decision = authorize(subject, action, owner);

    match decision {
        AccessDecision::Allow(reason) => tracing::debug!(
            subject_id = %subject.id,
            role = %subject.role,
            resource = action.resource_class().as_str(),
            action = %action,
            reason = ?reason,
            "access allowed"
        ),
        AccessDecision::Deny(reason) => tracing::info!(
            subject_id = %subject.id,
            role = %subject.role,
            resource = action.resource_class().as_str(),
            action = %action,
            reason = reason.as_str(),
            "access denied"
        ),
    }

    decision.into_result()
}
