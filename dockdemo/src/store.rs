use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dockdemo_core::HttpError;
use tokio::sync::RwLock;

use crate::models::{CreateUserRequest, PatchUserRequest, UpdateUserRequest, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(u64),
    DuplicateEmail(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "User {id} not found"),
            StoreError::DuplicateEmail(email) => write!(f, "Email {email} is already registered"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => HttpError::NotFound(err.to_string()),
            StoreError::DuplicateEmail(_) => HttpError::Conflict(err.to_string()),
        }
    }
}

/// In-memory user list shared by all request tasks.
///
/// Cloning is cheap: clones share the same list and id counter. Every
/// mutation runs its uniqueness check and its write under one write-lock
/// acquisition.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
    next_id: Arc<AtomicU64>,
}

impl UserStore {
    pub fn empty() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Store holding the two demo users, Alice (id 1) and Bob (id 2).
    pub fn seeded() -> Self {
        let now = Utc::now();
        let seed = |id: u64, name: &str, email: &str, age: u32| User {
            id,
            name: name.into(),
            email: email.into(),
            age: Some(age),
            created_at: now,
            updated_at: now,
        };
        let users = vec![
            seed(1, "Alice", "alice@example.com", 30),
            seed(2, "Bob", "bob@example.com", 25),
        ];
        Self {
            users: Arc::new(RwLock::new(users)),
            next_id: Arc::new(AtomicU64::new(3)),
        }
    }

    /// All users in id order, optionally filtered by a case-insensitive
    /// substring of name or email.
    pub async fn list(&self, search: Option<&str>) -> Vec<User> {
        let users = self.users.read().await;
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            None => users.clone(),
            Some(term) => {
                let term = term.to_lowercase();
                users
                    .iter()
                    .filter(|u| {
                        u.name.to_lowercase().contains(&term)
                            || u.email.to_lowercase().contains(&term)
                    })
                    .cloned()
                    .collect()
            }
        }
    }

    pub async fn get(&self, id: u64) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        ensure_email_free(&users, &req.email, None)?;

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: req.name,
            email: req.email,
            age: req.age,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        tracing::info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn replace(&self, id: u64, req: UpdateUserRequest) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let pos = position(&users, id)?;
        ensure_email_free(&users, &req.email, Some(id))?;

        let user = &mut users[pos];
        user.name = req.name;
        user.email = req.email;
        user.age = req.age;
        user.updated_at = Utc::now();
        tracing::info!(user_id = id, email = %user.email, "user replaced");
        Ok(user.clone())
    }

    pub async fn patch(&self, id: u64, req: PatchUserRequest) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let pos = position(&users, id)?;
        if let Some(email) = &req.email {
            ensure_email_free(&users, email, Some(id))?;
        }

        let user = &mut users[pos];
        if let Some(name) = req.name {
            user.name = name;
        }
        if let Some(email) = req.email {
            user.email = email;
        }
        if let Some(age) = req.age {
            user.age = age;
        }
        user.updated_at = Utc::now();
        tracing::info!(user_id = id, email = %user.email, "user patched");
        Ok(user.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let pos = position(&users, id)?;
        let user = users.remove(pos);
        tracing::info!(user_id = id, email = %user.email, "user deleted");
        Ok(user)
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn position(users: &[User], id: u64) -> Result<usize, StoreError> {
    users
        .iter()
        .position(|u| u.id == id)
        .ok_or(StoreError::NotFound(id))
}

/// `DuplicateEmail` if a user other than `owner` already holds `email`.
fn ensure_email_free(users: &[User], email: &str, owner: Option<u64>) -> Result<(), StoreError> {
    let taken = users
        .iter()
        .any(|u| Some(u.id) != owner && u.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(StoreError::DuplicateEmail(email.to_string()));
    }
    Ok(())
}
