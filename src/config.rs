use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

/// Service configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one `<sport>_odds.parquet` file per sport
    pub data_dir: PathBuf,
    pub http_port: u16,
    pub default_sport: String,
    pub default_window_hours: i64,
    pub read_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var("ODDS_DATA_DIR") {
            Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
            Ok(_) => return Err(anyhow!("ODDS_DATA_DIR is set but empty")),
            Err(_) => PathBuf::from("data/odds"),
        };

        let default_window_hours: i64 = env::var("DEFAULT_WINDOW_HOURS")
            .unwrap_or_else(|_| "48".to_string())
            .parse()
            .unwrap_or(48);
        if default_window_hours <= 0 {
            return Err(anyhow!(
                "DEFAULT_WINDOW_HOURS must be positive, got {}",
                default_window_hours
            ));
        }

        Ok(Self {
            data_dir,
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8083".to_string())
                .parse()
                .unwrap_or(8083),
            default_sport: env::var("DEFAULT_SPORT")
                .map(|s| s.trim().to_lowercase())
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "nba".to_string()),
            default_window_hours,
            read_timeout_seconds: env::var("READ_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}
