// src/services/storage.rs
use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::models::User;

const STARTING_BALANCE: &str = "500.00";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Persistence seam for user accounts. Only the in-memory implementation
/// ships; a relational backend is a deployment concern.
pub trait UserStore: Send + Sync {
    fn get_user(&self, id: &str) -> Option<User>;
    fn get_user_by_email(&self, email: &str) -> Option<User>;
    fn create_user(&self, new_user: NewUser) -> Result<User>;
}

#[derive(Default)]
struct MemStoreInner {
    users: HashMap<String, User>,
    email_index: HashMap<String, String>,
    next_id: u64,
}

pub struct MemStore {
    inner: Mutex<MemStoreInner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemStoreInner::default()),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemStore {
    fn get_user(&self, id: &str) -> Option<User> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.users.get(id).cloned()
    }

    fn get_user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = inner.email_index.get(email)?;
        inner.users.get(id).cloned()
    }

    fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.email_index.contains_key(&new_user.email) {
            bail!("email already registered");
        }

        inner.next_id += 1;
        let user = User {
            id: format!("user_{}", inner.next_id),
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            balance: STARTING_BALANCE.to_string(),
        };
        inner.email_index.insert(user.email.clone(), user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: "amara".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn create_then_lookup_by_id_and_email() {
        let store = MemStore::new();
        let created = store.create_user(new_user("amara@example.com")).unwrap();
        assert_eq!(created.balance, "500.00");

        let by_id = store.get_user(&created.id).unwrap();
        assert_eq!(by_id.email, "amara@example.com");

        let by_email = store.get_user_by_email("amara@example.com").unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = MemStore::new();
        store.create_user(new_user("amara@example.com")).unwrap();
        assert!(store.create_user(new_user("amara@example.com")).is_err());
    }

    #[test]
    fn ids_are_unique() {
        let store = MemStore::new();
        let first = store.create_user(new_user("a@example.com")).unwrap();
        let second = store.create_user(new_user("b@example.com")).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn unknown_lookups_return_none() {
        let store = MemStore::new();
        assert!(store.get_user("user_99").is_none());
        assert!(store.get_user_by_email("nobody@example.com").is_none());
    }
}
