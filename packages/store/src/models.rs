//! # Domain models for blogs, phonebook entries and users
//!
//! Defines the records kept by the stores in this crate and the payloads that
//! cross the server/client boundary as JSON. Everything here is
//! `Serialize + Deserialize` so the `api` handlers and the `ui` service layer
//! share one definition.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Blog`] | A stored blog entry. The `id` is assigned by the store and never changes. |
//! | [`NewBlog`] | A validated create payload (no identifier yet). |
//! | [`BlogUpdate`] | A patch: every field that is present overwrites the stored one. Carries an optional [`BlogAction`] discriminator. |
//! | [`Person`] / [`NewPerson`] | A phonebook entry and its create payload. |
//! | [`User`] / [`UserInfo`] | A registered user (server side, with password hash) and its client-safe projection. |
//! | [`Session`] | What `/api/login` returns and what the client keeps in durable storage. |
//!
//! ## Patch semantics
//!
//! [`Blog::apply`] is the single place that decides how a [`BlogUpdate`] lands on a
//! stored record, so the in-memory and PostgreSQL stores agree:
//!
//! - `action: "like"` without a `likes` field increments the stored counter,
//!   saturating at `i64::MAX`;
//! - `action: "toggleImportance"` without an `important` field inverts the stored flag;
//! - any scalar field that is sent overwrites the stored value (last write wins).

use serde::{Deserialize, Serialize};

/// A blog entry as stored and returned by the bloglist API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub important: bool,
}

/// Fields required to create a blog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlog {
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub important: bool,
}

impl NewBlog {
    /// Attach a store-assigned identifier.
    pub fn into_blog(self, id: String) -> Blog {
        Blog {
            id,
            title: self.title,
            author: self.author,
            url: self.url,
            likes: self.likes,
            important: self.important,
        }
    }
}

/// Discriminator sent alongside a patch to name the user action behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlogAction {
    Like,
    ToggleImportance,
}

/// Partial update of a blog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<BlogAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
}

impl BlogUpdate {
    /// Patch for a "like" on `blog`: the incremented counter plus the discriminator.
    pub fn like(blog: &Blog) -> Self {
        Self {
            action: Some(BlogAction::Like),
            likes: Some(blog.likes.saturating_add(1)),
            ..Self::default()
        }
    }

    /// Patch for flipping the importance flag of `blog`.
    pub fn toggle_importance(blog: &Blog) -> Self {
        Self {
            action: Some(BlogAction::ToggleImportance),
            important: Some(!blog.important),
            ..Self::default()
        }
    }
}

impl Blog {
    /// Apply a patch in place. See the module docs for the precedence rules.
    pub fn apply(&mut self, update: &BlogUpdate) {
        match update.action {
            Some(BlogAction::Like) if update.likes.is_none() => {
                self.likes = self.likes.saturating_add(1)
            }
            Some(BlogAction::ToggleImportance) if update.important.is_none() => {
                self.important = !self.important
            }
            _ => {}
        }

        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(author) = &update.author {
            self.author = author.clone();
        }
        if let Some(url) = &update.url {
            self.url = url.clone();
        }
        if let Some(likes) = update.likes {
            self.likes = likes;
        }
        if let Some(important) = update.important {
            self.important = important;
        }
    }
}

/// A phonebook entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub number: String,
}

/// A phonebook entry before an identifier is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub number: String,
}

/// Full user record, including the password hash. Never sent to clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// Fields needed to register a user. The password is already hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

/// User information safe to send to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// Logged-in session: the bearer token plus who it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub name: String,
}

impl Session {
    /// Get display name, falling back to the username if name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog() -> Blog {
        Blog {
            id: "b1".to_string(),
            title: "Go To Statement Considered Harmful".to_string(),
            author: "Edsger W. Dijkstra".to_string(),
            url: "https://example.com/goto".to_string(),
            likes: 5,
            important: false,
        }
    }

    #[test]
    fn test_like_action_increments_when_no_count_sent() {
        let mut b = blog();
        b.apply(&BlogUpdate {
            action: Some(BlogAction::Like),
            ..BlogUpdate::default()
        });
        assert_eq!(b.likes, 6);
    }

    #[test]
    fn test_like_saturates_at_max() {
        let mut b = Blog {
            likes: i64::MAX,
            ..blog()
        };
        assert_eq!(BlogUpdate::like(&b).likes, Some(i64::MAX));

        b.apply(&BlogUpdate {
            action: Some(BlogAction::Like),
            ..BlogUpdate::default()
        });
        assert_eq!(b.likes, i64::MAX);
    }

    #[test]
    fn test_sent_fields_overwrite() {
        let mut b = blog();
        // The explicit count wins over the action
        b.apply(&BlogUpdate {
            action: Some(BlogAction::Like),
            likes: Some(42),
            title: Some("New title".to_string()),
            ..BlogUpdate::default()
        });
        assert_eq!(b.likes, 42);
        assert_eq!(b.title, "New title");
        assert_eq!(b.author, "Edsger W. Dijkstra");
    }

    #[test]
    fn test_toggle_importance() {
        let mut b = blog();
        b.apply(&BlogUpdate {
            action: Some(BlogAction::ToggleImportance),
            ..BlogUpdate::default()
        });
        assert!(b.important);

        b.apply(&BlogUpdate::toggle_importance(&b));
        assert!(!b.important);
    }

    #[test]
    fn test_derived_patches() {
        let b = blog();
        let like = BlogUpdate::like(&b);
        assert_eq!(like.likes, Some(6));
        assert_eq!(like.action, Some(BlogAction::Like));
        assert!(like.important.is_none());

        let toggle = BlogUpdate::toggle_importance(&b);
        assert_eq!(toggle.important, Some(true));
        assert!(toggle.likes.is_none());
    }

    #[test]
    fn test_update_wire_format() {
        let json = serde_json::to_value(BlogUpdate::toggle_importance(&blog())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "action": "toggleImportance", "important": true })
        );

        let parsed: BlogUpdate = serde_json::from_str(r#"{"action":"like"}"#).unwrap();
        assert_eq!(parsed.action, Some(BlogAction::Like));
        assert!(parsed.likes.is_none());
    }
}
