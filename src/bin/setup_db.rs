//! Creates the SQLite database and applies migrations.
//!
//! Run once before first use:
//!
//! ```sh
//! DATABASE_URL=sqlite:somos_darua.db cargo run --bin setup_db
//! ```

use darua_backend::Config;
use darua_backend::database::{create_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_toml()?;
    log::info!("Setting up database at {}", config.database.url);

    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;

    log::info!("Database ready");
    Ok(())
}
