use anyhow::{Context, Result};

/// Denylist used when `BLOCKED_TERMS` is not set.
pub const DEFAULT_BLOCKED_TERMS: &[&str] = &["바보", "멍청이", "나쁜놈"];

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub blocked_terms: Vec<String>,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            blocked_terms: match optional_env("BLOCKED_TERMS") {
                Some(raw) => parse_blocked_terms(&raw),
                None => DEFAULT_BLOCKED_TERMS.iter().map(|t| t.to_string()).collect(),
            },
            seed_demo_data: match optional_env("SEED_DEMO_DATA") {
                Some(raw) => parse_flag(&raw)
                    .with_context(|| format!("SEED_DEMO_DATA must be true or false, got '{raw}'"))?,
                None => true,
            },
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated denylist, dropping blank entries.
pub fn parse_blocked_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_terms_split_and_trimmed() {
        assert_eq!(
            parse_blocked_terms(" spam , scam,,  "),
            vec!["spam".to_string(), "scam".to_string()]
        );
    }

    #[test]
    fn test_blocked_terms_empty_input() {
        assert!(parse_blocked_terms("").is_empty());
    }

    #[test]
    fn test_flag_values() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
