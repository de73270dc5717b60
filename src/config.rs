use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub request_timeout: Duration,
    /// Items rendered per geodata category (2 or 3)
    pub geodata_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout: Duration::from_secs(30),
            geodata_cap: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            request_timeout: match env::var("COPY_REQUEST_TIMEOUT_SECS") {
                Ok(raw) => Duration::from_secs(
                    raw.parse()
                        .context("COPY_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => defaults.request_timeout,
            },
            geodata_cap: match env::var("GEODATA_CAP") {
                Ok(raw) => parse_geodata_cap(&raw)?,
                Err(_) => defaults.geodata_cap,
            },
        })
    }

    pub fn has_model(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn parse_geodata_cap(raw: &str) -> Result<usize> {
    Ok(raw
        .trim()
        .parse::<usize>()
        .context("GEODATA_CAP must be a number")?
        .clamp(2, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_model() {
        let config = Config::default();
        assert!(!config.has_model());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.geodata_cap, 3);
    }

    #[test]
    fn geodata_cap_is_clamped() {
        assert_eq!(parse_geodata_cap("1").unwrap(), 2);
        assert_eq!(parse_geodata_cap(" 2 ").unwrap(), 2);
        assert_eq!(parse_geodata_cap("9").unwrap(), 3);
        assert!(parse_geodata_cap("tre").is_err());
    }
}
