use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Built once at startup, immutable thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Hard ceiling on candidate documents per batch. A batch that expands
    /// past this is rejected before any inference spend.
    pub max_documents: usize,
    /// Number of documents screened concurrently within a batch.
    pub max_concurrent_screenings: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_documents: std::env::var("MAX_DOCUMENTS")
                .unwrap_or_else(|_| "200".to_string())
                .parse::<usize>()
                .context("MAX_DOCUMENTS must be a positive integer")?,
            max_concurrent_screenings: std::env::var("MAX_CONCURRENT_SCREENINGS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .context("MAX_CONCURRENT_SCREENINGS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
