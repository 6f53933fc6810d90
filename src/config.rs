use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::errors::Result;

const DEFAULT_LOG_FILTER: &str = "news_api=info";
const DEFAULT_SEED_DATA_DIR: &str = "db/data/test";

/// Process settings read from the environment (and `.env`, if present).
/// Listener address and port are Rocket's own configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub log_filter: String,
    pub seed_data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            log_filter: env::var("NEWS_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            seed_data_dir: env::var("SEED_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SEED_DATA_DIR)),
        })
    }
}
