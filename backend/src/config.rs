use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

const BIND_ADDR_VAR: &str = "QUILL_BIND_ADDR";
const DATABASE_URL_VAR: &str = "QUILL_DATABASE_URL";
const ALLOWED_ORIGIN_VAR: &str = "QUILL_ALLOWED_ORIGIN";
const STATIC_DIR_VAR: &str = "QUILL_STATIC_DIR";
const SEED_DEMO_VAR: &str = "QUILL_SEED_DEMO";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite:quill.db";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_STATIC_DIR: &str = "../frontend/dist";

/// Server settings, read from `QUILL_*` environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Origin of the admin frontend, allowed by CORS
    pub allowed_origin: HeaderValue,
    /// Built frontend bundle; `None` when set to an empty string
    pub static_dir: Option<PathBuf>,
    /// Fill an empty database with demo content
    pub seed_demo: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = value(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("{} is not a socket address: {}", BIND_ADDR_VAR, bind_addr))?;

        let allowed_origin = value(ALLOWED_ORIGIN_VAR, DEFAULT_ALLOWED_ORIGIN);
        let allowed_origin = HeaderValue::from_str(&allowed_origin)
            .with_context(|| format!("{} is not a valid origin: {}", ALLOWED_ORIGIN_VAR, allowed_origin))?;

        let static_dir = value(STATIC_DIR_VAR, DEFAULT_STATIC_DIR);
        let static_dir = (!static_dir.trim().is_empty()).then(|| PathBuf::from(static_dir));

        let seed_demo = parse_flag(&value(SEED_DEMO_VAR, "true"))
            .with_context(|| format!("{} must be true or false", SEED_DEMO_VAR))?;

        Ok(Self {
            bind_addr,
            database_url: value(DATABASE_URL_VAR, DEFAULT_DATABASE_URL),
            allowed_origin,
            static_dir,
            seed_demo,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value: {}", other),
    }
}
