use news_api::config::Config;
use news_api::errors::Result;
use news_api::{build, db, init_tracing};
use tracing::{error, info};

#[rocket::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_filter);

    let pool = db::init_pool(&config.database_url)?;
    info!("database pool ready");

    if let Err(e) = build(pool).launch().await {
        error!("server stopped: {}", e);
    }
    Ok(())
}
