//! Server configuration loaded from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// JSON catalog file
    pub catalog_path: PathBuf,
    /// `token:user` pairs, comma separated
    pub sessions: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind: std::env::var("PROMPTDECK_BIND")
                .unwrap_or_else(|_| DEFAULT_BIND.to_string())
                .parse()
                .context("PROMPTDECK_BIND must be a socket address like 0.0.0.0:8000")?,
            catalog_path: require_env("PROMPTDECK_CATALOG")?.into(),
            sessions: std::env::var("PROMPTDECK_SESSIONS")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
