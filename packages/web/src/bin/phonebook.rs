//! Phonebook server. Serves the seeded in-memory phonebook on `PORT` (default 3001).

use api::config::PHONEBOOK_PORT;
use api::{Config, PhonebookState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    web::init_tracing();

    let config = Config::load(PHONEBOOK_PORT)?;
    let router = api::phonebook_router(PhonebookState::seeded());

    web::serve(router, config.port).await
}
