//! # Bloglist client state
//!
//! [`BlogApp`] owns everything the bloglist front end shows: the list of blogs, the
//! new-blog form draft, the logged-in user and two [`Notification`] slots (errors
//! and successes). Every user action is an `async` method that talks to the server
//! through a [`BlogApi`] and merges the answer back into local state.
//!
//! ## Merge rules
//!
//! | Action | Server call | On success | On failure |
//! |--------|-------------|-----------|-----------|
//! | [`reload`](BlogApp::reload) | `GET /api/blogs` | replace the list, sorted by likes (descending, stable) | list untouched |
//! | [`add_blog`](BlogApp::add_blog) | `POST /api/blogs` | append, clear the draft, success message | draft kept, error message |
//! | [`like`](BlogApp::like) / [`toggle_importance`](BlogApp::toggle_importance) | `PATCH /api/blogs/{id}` | replace the entry in place | list untouched, error message |
//! | [`delete`](BlogApp::delete) | `DELETE /api/blogs/{id}` | drop the entry | list untouched, error message |
//!
//! Only `reload` sorts. Merges after a mutation keep the current order.
//!
//! ## Concurrency
//!
//! State sits behind a `std::sync::Mutex` that is never held across an `.await`.
//! A blog with a mutation in flight is marked busy; a second mutation of the same
//! blog fails with [`UiError::Busy`] until the first one settles or its future is
//! dropped. A response for a blog that disappeared from the local list in the
//! meantime is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use store::{Blog, BlogUpdate, NewBlog, Session};
use tracing::{debug, error, info, warn};

use crate::notification::{Notification, MESSAGE_TIMEOUT};
use crate::service::{BlogApi, Credentials};
use crate::session::SessionStore;
use crate::UiError;

/// A field of the new-blog form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Author,
    Url,
    Likes,
}

/// Contents of the new-blog form, as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: String,
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            url: String::new(),
            likes: "0".to_string(),
        }
    }
}

impl BlogDraft {
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.title = value,
            DraftField::Author => self.author = value,
            DraftField::Url => self.url = value,
            DraftField::Likes => self.likes = value,
        }
    }

    /// Typed likes count. Anything that is not a non-negative integer counts as 0.
    pub fn likes(&self) -> i64 {
        self.likes
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .unwrap_or(0)
    }

    pub fn to_new_blog(&self) -> NewBlog {
        NewBlog {
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes(),
            important: false,
        }
    }
}

/// Everything the view renders.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub blogs: Vec<Blog>,
    pub draft: BlogDraft,
    pub user: Option<Session>,
    /// `false` shows only blogs marked important.
    pub show_all: bool,
    /// Ids of blogs with a mutation awaiting its response.
    pub in_flight: HashSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            blogs: Vec::new(),
            draft: BlogDraft::default(),
            user: None,
            show_all: true,
            in_flight: HashSet::new(),
        }
    }
}

/// Sort by likes, most liked first. Equal counts keep their relative order.
pub fn sort_by_likes(blogs: &mut [Blog]) {
    blogs.sort_by(|a, b| b.likes.cmp(&a.likes));
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a blog marked busy until dropped, including when the action future is.
struct InFlight {
    state: Arc<Mutex<ViewState>>,
    id: String,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.state).in_flight.remove(&self.id);
    }
}

pub struct BlogApp<A, S> {
    api: Arc<A>,
    sessions: Arc<S>,
    state: Arc<Mutex<ViewState>>,
    errors: Notification,
    notices: Notification,
}

impl<A, S> Clone for BlogApp<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            sessions: Arc::clone(&self.sessions),
            state: Arc::clone(&self.state),
            errors: self.errors.clone(),
            notices: self.notices.clone(),
        }
    }
}

impl<A: BlogApi, S: SessionStore> BlogApp<A, S> {
    pub fn new(api: A, sessions: S) -> Self {
        Self::with_message_timeout(api, sessions, MESSAGE_TIMEOUT)
    }

    pub fn with_message_timeout(api: A, sessions: S, timeout: Duration) -> Self {
        Self {
            api: Arc::new(api),
            sessions: Arc::new(sessions),
            state: Arc::new(Mutex::new(ViewState::default())),
            errors: Notification::new(timeout),
            notices: Notification::new(timeout),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        lock(&self.state)
    }

    // -- Reads --

    pub fn snapshot(&self) -> ViewState {
        self.state().clone()
    }

    pub fn blogs(&self) -> Vec<Blog> {
        self.state().blogs.clone()
    }

    /// The list filtered by the show-all toggle.
    pub fn blogs_to_show(&self) -> Vec<Blog> {
        let state = self.state();
        if state.show_all {
            state.blogs.clone()
        } else {
            state.blogs.iter().filter(|b| b.important).cloned().collect()
        }
    }

    pub fn user(&self) -> Option<Session> {
        self.state().user.clone()
    }

    /// Banner text for the logged-in user, e.g. `Matti Luukkainen logged in`.
    pub fn logged_in_banner(&self) -> Option<String> {
        self.state()
            .user
            .as_ref()
            .map(|session| format!("{} logged in", session.display_name()))
    }

    pub fn draft(&self) -> BlogDraft {
        self.state().draft.clone()
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.state().in_flight.contains(id)
    }

    pub fn error_message(&self) -> Option<String> {
        self.errors.message()
    }

    pub fn success_message(&self) -> Option<String> {
        self.notices.message()
    }

    // -- Local edits --

    pub fn set_draft_field(&self, field: DraftField, value: impl Into<String>) {
        self.state().draft.set(field, value);
    }

    pub fn toggle_show_all(&self) {
        let mut state = self.state();
        state.show_all = !state.show_all;
    }

    // -- Session --

    /// Restore a stored session and load the list.
    pub async fn init(&self) -> Result<(), UiError> {
        self.restore_session();
        self.reload().await
    }

    /// Pick up a session saved by an earlier run. An unreadable store counts as logged out.
    pub fn restore_session(&self) -> Option<Session> {
        match self.sessions.load() {
            Ok(Some(session)) => {
                debug!("Restored session for {}", session.username);
                self.api.set_token(Some(session.token.clone()));
                self.state().user = Some(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable stored session: {}", e);
                None
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, UiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(session) => {
                if let Err(e) = self.sessions.save(&session) {
                    warn!("Could not persist session: {}", e);
                }
                self.api.set_token(Some(session.token.clone()));
                self.state().user = Some(session.clone());
                self.errors.clear();
                info!("Logged in as {}", session.display_name());
                Ok(session)
            }
            Err(e) => {
                error!("Login failed: {}", e);
                self.errors.show("Wrong credentials");
                Err(e)
            }
        }
    }

    /// Forget the session locally and in storage.
    pub fn logout(&self) -> Result<(), UiError> {
        self.api.set_token(None);
        self.state().user = None;
        self.sessions.clear()
    }

    // -- Server round trips --

    pub async fn reload(&self) -> Result<(), UiError> {
        match self.api.get_all().await {
            Ok(mut blogs) => {
                sort_by_likes(&mut blogs);
                self.state().blogs = blogs;
                Ok(())
            }
            Err(e) => {
                error!("Loading blogs failed: {}", e);
                self.errors.show("Failed to load blogs");
                Err(e)
            }
        }
    }

    /// Submit the draft. The created blog is appended without re-sorting.
    pub async fn add_blog(&self) -> Result<Blog, UiError> {
        let new_blog = self.state().draft.to_new_blog();
        match self.api.create(&new_blog).await {
            Ok(blog) => {
                {
                    let mut state = self.state();
                    state.blogs.push(blog.clone());
                    state.draft = BlogDraft::default();
                }
                self.notices
                    .show(format!("a new blog {} by {} added", blog.title, blog.author));
                Ok(blog)
            }
            Err(e) => {
                error!("Adding blog failed: {}", e);
                self.errors.show("Failed to add blog");
                Err(e)
            }
        }
    }

    pub async fn like(&self, id: &str) -> Result<Blog, UiError> {
        self.mutate(id, BlogUpdate::like, "Failed to like blog")
            .await
    }

    pub async fn toggle_importance(&self, id: &str) -> Result<Blog, UiError> {
        self.mutate(id, BlogUpdate::toggle_importance, "Failed to update blog")
            .await
    }

    /// Delete a blog. Callers confirm with the user before calling.
    pub async fn delete(&self, id: &str) -> Result<(), UiError> {
        let (busy, title) = self.begin(id, |blog| blog.title.clone())?;
        let result = self.api.remove(id).await;
        drop(busy);

        let mut state = self.state();
        match result {
            Ok(()) => {
                state.blogs.retain(|b| b.id != id);
                drop(state);
                self.notices.show(format!("Removed {}", title));
                Ok(())
            }
            Err(e) => {
                drop(state);
                error!("Deleting blog {} failed: {}", id, e);
                self.errors.show("Failed to delete blog");
                Err(e)
            }
        }
    }

    /// Look up `id`, mark it busy and derive what the request needs from its current value.
    fn begin<T>(
        &self,
        id: &str,
        derive: impl FnOnce(&Blog) -> T,
    ) -> Result<(InFlight, T), UiError> {
        let mut state = self.state();
        if state.in_flight.contains(id) {
            debug!("Ignoring action on blog {} while a request is pending", id);
            return Err(UiError::Busy(id.to_string()));
        }
        let blog = state
            .blogs
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| UiError::NotFound(id.to_string()))?;
        let value = derive(blog);
        state.in_flight.insert(id.to_string());
        let busy = InFlight {
            state: Arc::clone(&self.state),
            id: id.to_string(),
        };
        Ok((busy, value))
    }

    async fn mutate(
        &self,
        id: &str,
        patch: fn(&Blog) -> BlogUpdate,
        failure: &str,
    ) -> Result<Blog, UiError> {
        let (busy, update) = self.begin(id, patch)?;
        let result = self.api.update(id, &update).await;
        drop(busy);

        let mut state = self.state();
        match result {
            Ok(blog) => {
                match state.blogs.iter_mut().find(|b| b.id == id) {
                    Some(slot) => *slot = blog.clone(),
                    None => debug!("Dropping response for blog {} no longer listed", id),
                }
                Ok(blog)
            }
            Err(e) => {
                drop(state);
                error!("{} {}: {}", failure, id, e);
                self.errors.show(failure);
                Err(e)
            }
        }
    }
}
