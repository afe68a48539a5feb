use std::sync::Arc;

use axum::extract::FromRef;
use store::{
    BlogStore, MemoryBlogStore, MemoryPersonStore, MemoryUserStore, PersonStore, UserStore,
};

use crate::auth::TokenKeys;

/// Shared state of the bloglist server.
#[derive(Clone)]
pub struct BloglistState {
    pub blogs: Arc<dyn BlogStore>,
    pub users: Arc<dyn UserStore>,
    pub keys: TokenKeys,
}

impl BloglistState {
    pub fn new(blogs: Arc<dyn BlogStore>, users: Arc<dyn UserStore>, keys: TokenKeys) -> Self {
        Self { blogs, users, keys }
    }

    /// Empty in-memory stores.
    pub fn in_memory(keys: TokenKeys) -> Self {
        Self::new(
            Arc::new(MemoryBlogStore::new()),
            Arc::new(MemoryUserStore::new()),
            keys,
        )
    }
}

impl FromRef<BloglistState> for TokenKeys {
    fn from_ref(state: &BloglistState) -> Self {
        state.keys.clone()
    }
}

/// Shared state of the phonebook server.
#[derive(Clone)]
pub struct PhonebookState {
    pub persons: Arc<dyn PersonStore>,
}

impl PhonebookState {
    pub fn new(persons: Arc<dyn PersonStore>) -> Self {
        Self { persons }
    }

    /// The six-entry seeded phonebook.
    pub fn seeded() -> Self {
        Self::new(Arc::new(MemoryPersonStore::seeded()))
    }
}
