//! Demo data bootstrap.
//!
//! Creates one account per role plus one article each. Running it twice is a
//! no-op for accounts that already exist.

use chrono::{DateTime, Utc};
use thiserror::Error;

use scriptorium_articles::NewArticle;
use scriptorium_auth::{NewUser, PasswordError, Role, hash_password};
use scriptorium_core::DomainError;

use crate::store::{ArticleStore, StoreError, UserStore};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub users_skipped: usize,
    pub articles_created: usize,
}

struct DemoAccount {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    article_title: &'static str,
    article_content: &'static str,
}

const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        username: "admin_user",
        email: "admin@example.com",
        password: "Admin1234!",
        role: Role::Admin,
        article_title: "Admin's Article",
        article_content: "This is an article written by the admin.",
    },
    DemoAccount {
        username: "editor_user",
        email: "editor@example.com",
        password: "Editor1234!",
        role: Role::Editor,
        article_title: "Editor's Article",
        article_content: "This is an article written by the editor.",
    },
    DemoAccount {
        username: "regular_user",
        email: "user@example.com",
        password: "User1234!",
        role: Role::User,
        article_title: "User's Article",
        article_content: "This is an article written by a regular user.",
    },
];

/// Seed the demo accounts and their articles.
pub fn seed_demo_data<S>(store: &S, now: DateTime<Utc>) -> Result<SeedReport, SeedError>
where
    S: UserStore + ArticleStore,
{
    let mut report = SeedReport::default();

    for demo in &DEMO_ACCOUNTS {
        match store.find_by_username(demo.username) {
            Ok(_) => {
                tracing::info!(username = demo.username, "demo user exists, skipping");
                report.users_skipped += 1;
                continue;
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let hash = hash_password(demo.password)?;
        let user = NewUser::new(demo.username, demo.email, hash, demo.role, true)?;
        let account = store.create_user(user, now)?;
        report.users_created += 1;

        let draft = NewArticle::new(account.id, demo.article_title, demo.article_content)?;
        store.create_article(draft, now)?;
        report.articles_created += 1;

        tracing::info!(username = demo.username, role = %demo.role, "demo user created");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IdentityStore, InMemoryStore, Page};

    #[test]
    fn seeding_is_idempotent() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let first = seed_demo_data(&store, now).unwrap();
        assert_eq!(
            first,
            SeedReport {
                users_created: 3,
                users_skipped: 0,
                articles_created: 3,
            }
        );

        let second = seed_demo_data(&store, now).unwrap();
        assert_eq!(
            second,
            SeedReport {
                users_created: 0,
                users_skipped: 3,
                articles_created: 0,
            }
        );

        assert_eq!(store.list_users(Page::default()).unwrap().len(), 3);
        assert_eq!(store.list_articles(Page::default()).unwrap().len(), 3);

        let admin = store.find_by_credentials("admin_user", "Admin1234!").unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
