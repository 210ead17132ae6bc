use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// Local folder that stands in for the cloud drive.
    pub drive_dir: PathBuf,
    pub import_display_interval: Duration,
    pub cors_allow: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = lookup("BB_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid BB_LISTEN_ADDR")?;
        let db_path = lookup("BB_DB_PATH").unwrap_or_else(|| "./db/app.db".into());
        let drive_dir = PathBuf::from(lookup("BB_DRIVE_DIR").unwrap_or_else(|| "./drive".into()));
        let display_secs: u64 = match lookup("BB_IMPORT_DISPLAY_SECS") {
            Some(raw) => raw.parse().context("Invalid BB_IMPORT_DISPLAY_SECS")?,
            None => 10,
        };
        let cors_allow = lookup("BB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(Self {
            listen_addr,
            db_path,
            drive_dir,
            import_display_interval: Duration::from_secs(display_secs),
            cors_allow,
        })
    }
}
