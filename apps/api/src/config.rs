use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::matcher::MatchWeights;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a tunable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Postgres record store when set, JSON files under `data_dir` otherwise.
    pub database_url: Option<String>,
    pub data_dir: PathBuf,
    pub investors_csv: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// Pitch export is disabled without a bucket.
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub match_weights: MatchWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            database_url: optional_env("DATABASE_URL"),
            data_dir: optional_env("DATA_DIR")
                .unwrap_or_else(|| "data".to_string())
                .into(),
            investors_csv: optional_env("INVESTORS_CSV")
                .unwrap_or_else(|| "data/investors.csv".to_string())
                .into(),
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            s3_bucket: optional_env("S3_BUCKET"),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            match_weights: match_weights_from_env()?,
        })
    }
}

/// Default weights with the env-tunable subset overridden.
fn match_weights_from_env() -> Result<MatchWeights> {
    let defaults = MatchWeights::default();
    let weights = MatchWeights {
        fuzzy_threshold: parse_env("MATCH_FUZZY_THRESHOLD", defaults.fuzzy_threshold)?,
        seed_penalty: parse_env("MATCH_SEED_PENALTY", defaults.seed_penalty)?,
        seed_penalty_valuation: parse_env(
            "MATCH_SEED_PENALTY_VALUATION",
            defaults.seed_penalty_valuation,
        )?,
        top_n: parse_env("MATCH_TOP_N", defaults.top_n)?,
        ..defaults
    };
    if !(0.0..=1.0).contains(&weights.fuzzy_threshold) {
        anyhow::bail!("MATCH_FUZZY_THRESHOLD must be between 0 and 1");
    }
    if weights.top_n == 0 {
        anyhow::bail!("MATCH_TOP_N must be at least 1");
    }
    Ok(weights)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_parse_env_default_and_override() {
        std::env::remove_var("PITCHSENSE_TEST_PORT");
        assert_eq!(parse_env("PITCHSENSE_TEST_PORT", 8080u16).unwrap(), 8080);

        std::env::set_var("PITCHSENSE_TEST_PORT", " 9090 ");
        assert_eq!(parse_env("PITCHSENSE_TEST_PORT", 8080u16).unwrap(), 9090);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PITCHSENSE_TEST_TOP_N", "five");
        let err = parse_env("PITCHSENSE_TEST_TOP_N", 5usize).unwrap_err();
        assert!(err.to_string().contains("PITCHSENSE_TEST_TOP_N"));
    }

    #[test]
    fn test_blank_optional_is_none() {
        std::env::set_var("PITCHSENSE_TEST_BUCKET", "  ");
        assert_eq!(optional_env("PITCHSENSE_TEST_BUCKET"), None);
    }
}
