use anyhow::Context;
use lava_indexer::config::AppConfig;
use lava_indexer::utils::logging;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    logging::init_logger();

    // Reads DATABASE_URL, loading .env first
    let config = AppConfig::from_env();
    logging::log_database_connection_details(&config.database.url);

    logging::log_info("Running database migrations...");

    let connection = Database::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    Migrator::up(&connection, None)
        .await
        .context("migration failed")?;

    logging::log_info("Migrations completed successfully!");

    Ok(())
}
