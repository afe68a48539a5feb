//! # API crate — HTTP servers for the bloglist and the phonebook
//!
//! Builds the two axum routers. Both are stateless over an injected store: handlers
//! map verbs and paths onto [`store`] trait calls and turn the results into JSON and
//! status codes.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Argon2id password hashing, JWT bearer tokens, the [`auth::AuthUser`] extractor |
//! | [`config`] | — | `PORT` / `DATABASE_URL` / `SECRET` from the environment (via `dotenvy`) |
//! | [`db`] | `postgres` | PostgreSQL pool, migrations and the `Pg*Store` implementations |
//! | [`error`] | — | [`error::ApiError`] and its `{ "error" }` response mapping |
//! | [`logging`] | — | Per-request log line middleware |
//! | [`routes`] | — | The handlers |
//! | [`state`] | — | Router state holding the `Arc<dyn …Store>` handles |
//!
//! ## Bloglist routes
//!
//! | Route | Auth | Handler |
//! |-------|------|---------|
//! | `GET /` | — | [`routes::blogs::welcome`] |
//! | `GET /api/blogs` | — | [`routes::blogs::list_blogs`] |
//! | `POST /api/blogs` | bearer | [`routes::blogs::create_blog`] → 201 |
//! | `GET /api/blogs/{id}` | — | [`routes::blogs::get_blog`] |
//! | `PUT`/`PATCH /api/blogs/{id}` | bearer | [`routes::blogs::update_blog`] |
//! | `DELETE /api/blogs/{id}` | bearer | [`routes::blogs::delete_blog`] → 204 |
//! | `GET`/`POST /api/users` | — | [`routes::users::list_users`] / [`routes::users::create_user`] |
//! | `POST /api/login` | — | [`routes::users::login`] |
//!
//! ## Phonebook routes
//!
//! `GET`/`POST /api/persons`, `GET`/`DELETE /api/persons/{id}` and `GET /info`,
//! all in [`routes::persons`].

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use state::{BloglistState, PhonebookState};

use routes::{blogs, persons, users};

/// Router of the bloglist server.
pub fn bloglist_router(state: BloglistState) -> Router {
    Router::new()
        .route("/", get(blogs::welcome))
        .route("/api/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route(
            "/api/blogs/{id}",
            get(blogs::get_blog)
                .put(blogs::update_blog)
                .patch(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/login", post(users::login))
        .layer(middleware::from_fn(logging::log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router of the phonebook server.
pub fn phonebook_router(state: PhonebookState) -> Router {
    Router::new()
        .route(
            "/api/persons",
            get(persons::list_persons).post(persons::create_person),
        )
        .route(
            "/api/persons/{id}",
            get(persons::get_person).delete(persons::delete_person),
        )
        .route("/info", get(persons::info))
        .layer(middleware::from_fn(logging::log_requests_with_body))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
