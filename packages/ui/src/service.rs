//! HTTP service layer for the bloglist API.
//!
//! [`BlogApi`] is the seam between [`crate::BlogApp`] and the network. The
//! production implementation is [`HttpBlogApi`] (reqwest); tests plug in their
//! own implementation.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use store::{Blog, BlogUpdate, NewBlog, Session};

use crate::UiError;

/// Username and password as posted to `/api/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Operations the client performs against the bloglist server.
pub trait BlogApi: Send + Sync {
    /// Set or clear the bearer token attached to mutating requests.
    fn set_token(&self, token: Option<String>);

    fn get_all(&self) -> impl Future<Output = Result<Vec<Blog>, UiError>> + Send;

    fn create(&self, blog: &NewBlog) -> impl Future<Output = Result<Blog, UiError>> + Send;

    fn update(
        &self,
        id: &str,
        update: &BlogUpdate,
    ) -> impl Future<Output = Result<Blog, UiError>> + Send;

    fn remove(&self, id: &str) -> impl Future<Output = Result<(), UiError>> + Send;

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, UiError>> + Send;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`BlogApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBlogApi {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpBlogApi {
    /// `base_url` is the server origin, e.g. `http://localhost:3003`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a non-2xx response into [`UiError::Status`], using the `{ "error" }` body when present.
async fn check(response: Response) -> Result<Response, UiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(UiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, UiError> {
    let response = check(response).await?;
    Ok(response.json().await?)
}

impl BlogApi for HttpBlogApi {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn get_all(&self) -> Result<Vec<Blog>, UiError> {
        let response = self.client.get(self.url("/api/blogs")).send().await?;
        read_json(response).await
    }

    async fn create(&self, blog: &NewBlog) -> Result<Blog, UiError> {
        let request = self.authorized(self.client.post(self.url("/api/blogs")).json(blog));
        read_json(request.send().await?).await
    }

    async fn update(&self, id: &str, update: &BlogUpdate) -> Result<Blog, UiError> {
        let request = self.authorized(
            self.client
                .patch(self.url(&format!("/api/blogs/{id}")))
                .json(update),
        );
        read_json(request.send().await?).await
    }

    async fn remove(&self, id: &str) -> Result<(), UiError> {
        let request = self.authorized(self.client.delete(self.url(&format!("/api/blogs/{id}"))));
        check(request.send().await?).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, UiError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(credentials)
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpBlogApi::new("http://localhost:3003/");
        assert_eq!(api.url("/api/blogs"), "http://localhost:3003/api/blogs");
    }

    #[test]
    fn test_set_token() {
        let api = HttpBlogApi::new("http://localhost:3003");
        assert!(api.token().is_none());

        api.set_token(Some("abc".to_string()));
        // Clones share the token slot
        let clone = api.clone();
        assert_eq!(clone.token().as_deref(), Some("abc"));

        api.set_token(None);
        assert!(clone.token().is_none());
    }
}
