use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown BLOG_STORAGE backend: {}", other)),
        }
    }
}

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub page_size: u64,
    /// Public origin that emailed links point at, without a trailing slash.
    pub base_url: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Accepts `http://host[:port]` or `https://host[:port]`, with no path.
pub fn parse_base_url(value: &str) -> Result<String, String> {
    let trimmed = value.trim().trim_end_matches('/');
    let authority = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));

    match authority {
        Some(authority) if !authority.is_empty() && !authority.contains('/') => {
            Ok(trimmed.to_string())
        }
        _ => Err(format!(
            "BLOG_BASE_URL must be an http(s) origin without a path, got: {}",
            value
        )),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: var_or("HOST", "localhost"),
            port: var_or("PORT", "8000")
                .parse()
                .map_err(|_| "PORT must be a valid number")?,
            storage: var_or("BLOG_STORAGE", "mongo").parse()?,
            mongodb_uri: var_or("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_database: var_or("MONGODB_DATABASE", "rust_blogdb"),
            page_size: match var_or("BLOG_PAGE_SIZE", "3").parse::<u64>() {
                Ok(size) if size > 0 => size,
                _ => return Err("BLOG_PAGE_SIZE must be a positive number".to_string()),
            },
            base_url: parse_base_url(&var_or("BLOG_BASE_URL", "http://localhost:8000"))?,
        })
    }
}
