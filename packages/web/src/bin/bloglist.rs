//! Bloglist server on `PORT` (default 3003).
//!
//! With the `postgres` feature and `DATABASE_URL` set, blogs and users live in
//! PostgreSQL. Otherwise the server keeps them in memory.

use api::auth::TokenKeys;
use api::config::BLOGLIST_PORT;
use api::{BloglistState, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    web::init_tracing();

    let config = Config::load(BLOGLIST_PORT)?;
    let keys = TokenKeys::from_secret(config.secret.as_deref());

    let state = build_state(&config, keys).await?;
    web::serve(api::bloglist_router(state), config.port).await
}

#[cfg(feature = "postgres")]
async fn build_state(config: &Config, keys: TokenKeys) -> anyhow::Result<BloglistState> {
    use std::sync::Arc;

    use api::db::{connect, PgBlogStore, PgUserStore};

    let Some(url) = &config.database_url else {
        warn!("DATABASE_URL not set, keeping blogs in memory");
        return Ok(BloglistState::in_memory(keys));
    };

    info!("Connecting to PostgreSQL");
    let pool = connect(url).await?;
    Ok(BloglistState::new(
        Arc::new(PgBlogStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool)),
        keys,
    ))
}

#[cfg(not(feature = "postgres"))]
async fn build_state(config: &Config, keys: TokenKeys) -> anyhow::Result<BloglistState> {
    if config.database_url.is_some() {
        warn!("DATABASE_URL is set but this build has no postgres support, keeping blogs in memory");
    } else {
        info!("Keeping blogs in memory");
    }
    Ok(BloglistState::in_memory(keys))
}
