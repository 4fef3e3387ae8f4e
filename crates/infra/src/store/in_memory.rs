use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use scriptorium_articles::{Article, ArticlePatch, NewArticle};
use scriptorium_auth::{NewUser, ResourceClass, UserAccount, UserChanges, verify_password};
use scriptorium_core::{ArticleId, SubjectId};

use super::{ArticleStore, IdentityStore, Page, ResourceAccessor, StoreError, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<SubjectId, UserAccount>,
    articles: BTreeMap<ArticleId, Article>,
    last_user_id: i64,
    last_article_id: i64,
}

impl Tables {
    fn ensure_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<SubjectId>,
    ) -> Result<(), StoreError> {
        let clash = self.users.values().any(|u| {
            Some(u.id) != except
                && (username == Some(u.username.as_str()) || email == Some(u.email.as_str()))
        });
        if clash {
            return Err(StoreError::Conflict(
                "User with this username or email already exists".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-memory store for users and articles (dev/test).
///
/// Ids are assigned from per-table counters starting at 1 and are never
/// reused. Listings are ordered by ascending id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn paginate<'a, T: Clone + 'a>(items: impl Iterator<Item = &'a T>, page: Page) -> Vec<T> {
    items.skip(page.offset).take(page.limit).cloned().collect()
}

impl ResourceAccessor for InMemoryStore {
    fn get_owner(&self, class: ResourceClass, id: i64) -> Result<SubjectId, StoreError> {
        let tables = self.read()?;
        match class {
            ResourceClass::Article => tables
                .articles
                .get(&ArticleId::new(id))
                .map(|a| a.owner_id)
                .ok_or(StoreError::NotFound),
            ResourceClass::User => tables
                .users
                .get(&SubjectId::new(id))
                .map(|u| u.id)
                .ok_or(StoreError::NotFound),
        }
    }
}

impl IdentityStore for InMemoryStore {
    fn find_by_credentials(&self, username: &str, password: &str) -> Result<UserAccount, StoreError> {
        // Hash verification is slow; do it outside the lock.
        let account = self.find_by_username(username)?;

        if !account.is_active || !verify_password(&account.password_hash, password) {
            return Err(StoreError::NotFound);
        }
        Ok(account)
    }
}

impl ArticleStore for InMemoryStore {
    fn list_articles(&self, page: Page) -> Result<Vec<Article>, StoreError> {
        let tables = self.read()?;
        Ok(paginate(tables.articles.values(), page))
    }

    fn search_articles(&self, query: &str, page: Page) -> Result<Vec<Article>, StoreError> {
        let tables = self.read()?;
        Ok(paginate(
            tables.articles.values().filter(|a| a.matches(query)),
            page,
        ))
    }

    fn get_article(&self, id: ArticleId) -> Result<Article, StoreError> {
        let tables = self.read()?;
        tables.articles.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn create_article(&self, draft: NewArticle, now: DateTime<Utc>) -> Result<Article, StoreError> {
        let mut tables = self.write()?;

        if !tables.users.contains_key(&draft.owner_id()) {
            return Err(StoreError::Conflict(format!(
                "owner account {} does not exist",
                draft.owner_id()
            )));
        }

        tables.last_article_id += 1;
        let id = ArticleId::new(tables.last_article_id);
        let article = Article::from_draft(id, draft, now);
        tables.articles.insert(id, article.clone());

        tracing::debug!(article_id = %id, owner_id = %article.owner_id, "article created");
        Ok(article)
    }

    fn update_article(
        &self,
        id: ArticleId,
        patch: ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, StoreError> {
        let mut tables = self.write()?;
        let article = tables.articles.get_mut(&id).ok_or(StoreError::NotFound)?;
        article.apply(patch, now);
        Ok(article.clone())
    }

    fn delete_article(&self, id: ArticleId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

impl UserStore for InMemoryStore {
    fn list_users(&self, page: Page) -> Result<Vec<UserAccount>, StoreError> {
        let tables = self.read()?;
        Ok(paginate(tables.users.values(), page))
    }

    fn search_users(&self, query: &str, page: Page) -> Result<Vec<UserAccount>, StoreError> {
        let tables = self.read()?;
        Ok(paginate(tables.users.values().filter(|u| u.matches(query)), page))
    }

    fn get_user(&self, id: SubjectId) -> Result<UserAccount, StoreError> {
        let tables = self.read()?;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn find_by_username(&self, username: &str) -> Result<UserAccount, StoreError> {
        let tables = self.read()?;
        tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn create_user(&self, user: NewUser, now: DateTime<Utc>) -> Result<UserAccount, StoreError> {
        let mut tables = self.write()?;
        tables.ensure_unique(Some(user.username.as_str()), Some(user.email.as_str()), None)?;

        tables.last_user_id += 1;
        let account = UserAccount {
            id: SubjectId::new(tables.last_user_id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
        };
        tables.users.insert(account.id, account.clone());

        tracing::debug!(user_id = %account.id, role = %account.role, "user created");
        Ok(account)
    }

    fn update_user(&self, id: SubjectId, changes: UserChanges) -> Result<UserAccount, StoreError> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        tables.ensure_unique(changes.username.as_deref(), changes.email.as_deref(), Some(id))?;

        let account = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.apply(changes);
        Ok(account.clone())
    }

    fn delete_user(&self, id: SubjectId) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        tables.users.remove(&id).ok_or(StoreError::NotFound)?;

        let before = tables.articles.len();
        tables.articles.retain(|_, a| a.owner_id != id);
        let removed = before - tables.articles.len();

        tracing::debug!(user_id = %id, articles_removed = removed, "user deleted");
        Ok(removed)
    }
}
