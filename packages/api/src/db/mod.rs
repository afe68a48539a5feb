//! # Database module — PostgreSQL persistence
//!
//! Everything here is gated behind the `postgres` feature so the default build
//! runs on the in-memory stores alone.
//!
//! - [`connect`] — opens a pool of up to 5 connections and runs the migrations in
//!   `packages/api/migrations`.
//! - [`PgBlogStore`] / [`PgUserStore`] — [`store::BlogStore`] and [`store::UserStore`]
//!   over that pool. A blog update reads the row `FOR UPDATE`, applies the patch with
//!   [`store::Blog::apply`] and writes it back inside one transaction, so a single
//!   record is always updated atomically.

#[cfg(feature = "postgres")]
mod pg_store;
#[cfg(feature = "postgres")]
mod pool;

#[cfg(feature = "postgres")]
pub use pg_store::{PgBlogStore, PgUserStore};
#[cfg(feature = "postgres")]
pub use pool::connect;
