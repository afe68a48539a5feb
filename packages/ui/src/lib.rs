//! # UI crate — client state for the bloglist front end
//!
//! Everything a bloglist front end needs short of rendering: the HTTP service
//! layer, the view state with its optimistic merge rules, session persistence and
//! auto-dismissing status messages. A renderer reads [`BlogApp`] snapshots and
//! calls its action methods.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`app`] | [`BlogApp`]: view state and user actions |
//! | [`service`] | [`BlogApi`] trait and its reqwest implementation [`HttpBlogApi`] |
//! | [`session`] | [`SessionStore`] trait, file and in-memory stores |
//! | [`notification`] | [`Notification`]: one message with a cancelable dismissal timer |

pub mod app;
pub mod notification;
pub mod service;
pub mod session;

mod error;

pub use app::{sort_by_likes, BlogApp, BlogDraft, DraftField, ViewState};
pub use error::UiError;
pub use notification::{Notification, MESSAGE_TIMEOUT};
pub use service::{BlogApi, Credentials, HttpBlogApi};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_KEY};
