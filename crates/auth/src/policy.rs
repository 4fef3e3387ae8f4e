//! Access-control policy engine.
//!
//! One pure decision function, [`authorize`], consumed uniformly by every
//! endpoint guard:
//!
//! - No IO
//! - No panics for any representable input
//! - No hidden state (same inputs, same decision)
//!
//! Actions are typed per resource class, so an action that does not exist for
//! a class cannot be expressed at all.

use serde::Serialize;
use thiserror::Error;

use scriptorium_core::SubjectId;

use crate::{Role, Subject};

/// Resource classes the policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    Article,
    User,
}

impl ResourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Article => "article",
            ResourceClass::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleAction {
    List,
    Search,
    Create,
    Read,
    Update,
    Delete,
}

impl ArticleAction {
    pub const ALL: [ArticleAction; 6] = [
        ArticleAction::List,
        ArticleAction::Search,
        ArticleAction::Create,
        ArticleAction::Read,
        ArticleAction::Update,
        ArticleAction::Delete,
    ];

    /// Per-item actions target an existing article and carry its owner.
    pub fn is_per_item(&self) -> bool {
        matches!(self, ArticleAction::Read | ArticleAction::Update | ArticleAction::Delete)
    }
}

/// Account-management actions.
///
/// `ReadSelf` is the "who am I" lookup: it only ever exposes the acting
/// subject's own record, which is why it is a distinct action rather than an
/// ownership check on `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    List,
    Search,
    Read,
    Create,
    Update,
    Delete,
    ReadSelf,
}

impl UserAction {
    pub const ALL: [UserAction; 7] = [
        UserAction::List,
        UserAction::Search,
        UserAction::Read,
        UserAction::Create,
        UserAction::Update,
        UserAction::Delete,
        UserAction::ReadSelf,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Article(ArticleAction),
    User(UserAction),
}

impl Action {
    pub fn resource_class(&self) -> ResourceClass {
        match self {
            Action::Article(_) => ResourceClass::Article,
            Action::User(_) => ResourceClass::User,
        }
    }

    /// Stable dotted name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Article(a) => match a {
                ArticleAction::List => "article.list",
                ArticleAction::Search => "article.search",
                ArticleAction::Create => "article.create",
                ArticleAction::Read => "article.read",
                ArticleAction::Update => "article.update",
                ArticleAction::Delete => "article.delete",
            },
            Action::User(a) => match a {
                UserAction::List => "user.list",
                UserAction::Search => "user.search",
                UserAction::Read => "user.read",
                UserAction::Create => "user.create",
                UserAction::Update => "user.update",
                UserAction::Delete => "user.delete",
                UserAction::ReadSelf => "user.read_self",
            },
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an action was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    /// Any authenticated subject may perform the action.
    Authenticated,
    /// The subject owns the target resource.
    Owner,
    /// The subject's role grants the action regardless of ownership.
    Role,
    /// The subject is looking up their own account.
    SelfLookup,
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    AdminOnly,
    NotOwner,
    EditorCannotDelete,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::AdminOnly => "admin_only",
            DenyReason::NotOwner => "not_owner",
            DenyReason::EditorCannotDelete => "editor_cannot_delete",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::AdminOnly => "Admins only",
            DenyReason::NotOwner => "Not your article",
            DenyReason::EditorCannotDelete => "Editors cannot delete articles",
        }
    }
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Identity is valid but the action is not allowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("forbidden: {reason}")]
pub struct Forbidden {
    pub reason: DenyReason,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }

    pub fn into_result(self) -> Result<AllowReason, Forbidden> {
        match self {
            AccessDecision::Allow(reason) => Ok(reason),
            AccessDecision::Deny(reason) => Err(Forbidden { reason }),
        }
    }
}

/// Decide whether `subject` may perform `action`.
///
/// `resource_owner` is the owner of the targeted article and must be `Some`
/// exactly for per-item article actions (read/update/delete). Callers must
/// have confirmed the target exists before calling; this function never
/// answers "not found".
pub fn authorize(
    subject: &Subject,
    action: Action,
    resource_owner: Option<SubjectId>,
) -> AccessDecision {
    match action {
        Action::User(action) => {
            debug_assert!(resource_owner.is_none(), "user actions carry no owner");
            authorize_user(subject, action)
        }
        Action::Article(action) => {
            debug_assert_eq!(
                action.is_per_item(),
                resource_owner.is_some(),
                "owner must be present exactly for per-item article actions"
            );
            authorize_article(subject, action, resource_owner)
        }
    }
}

/// Owner assigned to an article created by `subject`.
///
/// Creation always binds the new article to the creator; nothing in a request
/// payload can override it.
pub fn owner_for_new_article(subject: &Subject) -> SubjectId {
    subject.id
}

fn authorize_user(subject: &Subject, action: UserAction) -> AccessDecision {
    match (action, subject.role) {
        (UserAction::ReadSelf, _) => AccessDecision::Allow(AllowReason::SelfLookup),
        (_, Role::Admin) => AccessDecision::Allow(AllowReason::Role),
        (_, Role::User | Role::Editor) => AccessDecision::Deny(DenyReason::AdminOnly),
    }
}

fn authorize_article(
    subject: &Subject,
    action: ArticleAction,
    owner: Option<SubjectId>,
) -> AccessDecision {
    let is_owner = owner == Some(subject.id);

    match (action, subject.role) {
        (
            ArticleAction::List | ArticleAction::Search | ArticleAction::Create | ArticleAction::Read,
            _,
        ) => AccessDecision::Allow(AllowReason::Authenticated),

        (ArticleAction::Update, Role::Editor | Role::Admin) => {
            AccessDecision::Allow(AllowReason::Role)
        }
        (ArticleAction::Update, Role::User) if is_owner => AccessDecision::Allow(AllowReason::Owner),
        (ArticleAction::Update, Role::User) => AccessDecision::Deny(DenyReason::NotOwner),

        (ArticleAction::Delete, Role::Admin) => AccessDecision::Allow(AllowReason::Role),
        (ArticleAction::Delete, Role::Editor) => {
            AccessDecision::Deny(DenyReason::EditorCannotDelete)
        }
        (ArticleAction::Delete, Role::User) if is_owner => AccessDecision::Allow(AllowReason::Owner),
        (ArticleAction::Delete, Role::User) => AccessDecision::Deny(DenyReason::NotOwner),
    }
}
