//! `/api/blogs` handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use store::{Blog, BlogUpdate, NewBlog};
use tracing::info;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiJson},
    state::BloglistState,
};

/// Create payload as sent by clients. Required fields are checked in [`BlogRequest::validate`].
#[derive(Debug, Deserialize)]
pub struct BlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
    pub important: Option<bool>,
}

impl BlogRequest {
    pub fn validate(self) -> Result<NewBlog, ApiError> {
        Ok(NewBlog {
            title: required(self.title, "title")?,
            author: required(self.author, "author")?,
            url: required(self.url, "url")?,
            likes: likes(self.likes)?.unwrap_or(0),
            important: self.important.unwrap_or(false),
        })
    }
}

/// Like counts are never negative.
fn likes(value: Option<i64>) -> Result<Option<i64>, ApiError> {
    match value {
        Some(n) if n < 0 => Err(ApiError::Validation(
            "`likes` must not be negative".to_string(),
        )),
        other => Ok(other),
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("`{field}` is required")))
}

fn blog_not_found() -> ApiError {
    ApiError::NotFound("Blog not found".to_string())
}

pub async fn welcome() -> &'static str {
    "Welcome to the Blog API"
}

pub async fn list_blogs(State(state): State<BloglistState>) -> Result<Json<Vec<Blog>>, ApiError> {
    Ok(Json(state.blogs.list().await?))
}

pub async fn get_blog(
    State(state): State<BloglistState>,
    Path(id): Path<String>,
) -> Result<Json<Blog>, ApiError> {
    state
        .blogs
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(blog_not_found)
}

pub async fn create_blog(
    State(state): State<BloglistState>,
    user: AuthUser,
    ApiJson(request): ApiJson<BlogRequest>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let blog = state.blogs.insert(request.validate()?).await?;
    info!("{} added blog {} ({})", user.username, blog.id, blog.title);
    Ok((StatusCode::CREATED, Json(blog)))
}

pub async fn update_blog(
    State(state): State<BloglistState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<BlogUpdate>,
) -> Result<Json<Blog>, ApiError> {
    likes(update.likes)?;
    let blog = state
        .blogs
        .update(&id, update)
        .await?
        .ok_or_else(blog_not_found)?;
    info!("{} updated blog {}", user.username, blog.id);
    Ok(Json(blog))
}

pub async fn delete_blog(
    State(state): State<BloglistState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.blogs.delete(&id).await?.ok_or_else(blog_not_found)?;
    info!("{} deleted blog {id}", user.username);
    Ok(StatusCode::NO_CONTENT)
}
