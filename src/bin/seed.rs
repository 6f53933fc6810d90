use diesel::pg::PgConnection;
use diesel::Connection;
use news_api::config::Config;
use news_api::db::seed::{seed, SeedData};
use news_api::errors::Result;
use news_api::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_filter);

    info!(dir = %config.seed_data_dir.display(), "loading seed data");
    let data = SeedData::load(&config.seed_data_dir)?;
    let mut conn = PgConnection::establish(&config.database_url)?;
    seed(&mut conn, &data)
}
