//! Credential store

use crate::auth::models::User;
use crate::auth::password;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Users keyed by id
    users: HashMap<String, User>,
    /// Lowercased email -> user id
    by_email: HashMap<String, String>,
}

/// In-memory user store with case-insensitive unique emails
pub struct UserStore {
    inner: Arc<RwLock<Inner>>,
}

impl UserStore {
    /// Create an empty user store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Create a new user. Fails if the email is already registered.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let key = email.to_lowercase();
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&key) {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let user = User::new(
            name.to_string(),
            email.to_string(),
            password_hash.to_string(),
        );
        inner.by_email.insert(key, user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Look up a user by email
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        let id = inner.by_email.get(&email.to_lowercase())?;
        inner.users.get(id).cloned()
    }

    /// Look up a user by id
    pub async fn get(&self, id: &str) -> Option<User> {
        self.inner.read().await.users.get(id).cloned()
    }

    /// Verify credentials. Returns the user on success, None otherwise.
    /// Callers cannot distinguish an unknown email from a wrong password.
    pub async fn verify_password(&self, email: &str, plaintext: &str) -> Option<User> {
        let user = self.find_by_email(email).await?;
        if password::verify_password(plaintext, &user.password_hash) {
            Some(user)
        } else {
            None
        }
    }

    /// Number of registered users
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for UserStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
