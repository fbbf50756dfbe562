//! In-memory identity repository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{Identity, NewUser, UserRecord, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Identity, UserRecord>,
    next_id: u64,
}

/// Users keyed by email, held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_email(&self, email: &Identity) -> Result<Option<UserRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, DomainError> {
        // Check and write under one lock so concurrent registrations of the
        // same email cannot both succeed
        let mut store = self.store.write().await;

        if store.users.contains_key(&user.identity) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                user.identity
            )));
        }

        store.next_id += 1;
        let record = UserRecord::new(store.next_id.to_string(), user, Utc::now());
        store
            .users
            .insert(record.identity().clone(), record.clone());

        Ok(record)
    }
}
