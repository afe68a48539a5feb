//! # Store traits — the persistence seam
//!
//! Handlers in the `api` crate never touch a concrete collection. They hold an
//! `Arc<dyn …Store>` and go through the traits below, so the same routing code
//! runs against the in-memory stores ([`crate::memory`]), a PostgreSQL backend, or
//! anything else that implements them.
//!
//! | Trait | Records | Notes |
//! |-------|---------|-------|
//! | [`BlogStore`] | [`Blog`] | `update`/`delete` return `None` for an unknown id. |
//! | [`PersonStore`] | [`Person`] | `insert` rejects a duplicate name with [`StoreError::Duplicate`] and leaves the list untouched. |
//! | [`UserStore`] | [`User`] | `insert` rejects a duplicate username. |
//!
//! Each call is atomic on its own. There are no multi-record transactions and no
//! version counters: concurrent writers overwrite each other.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Blog, BlogUpdate, NewBlog, NewPerson, NewUser, Person, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} must be unique")]
    Duplicate(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Blog collection.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Blog>, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Blog>, StoreError>;
    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError>;
    async fn update(&self, id: &str, update: BlogUpdate) -> Result<Option<Blog>, StoreError>;
    async fn delete(&self, id: &str) -> Result<Option<Blog>, StoreError>;
}

/// Phonebook entries.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Person>, StoreError>;
    async fn get(&self, id: u64) -> Result<Option<Person>, StoreError>;
    async fn insert(&self, person: NewPerson) -> Result<Person, StoreError>;
    async fn delete(&self, id: u64) -> Result<Option<Person>, StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}
