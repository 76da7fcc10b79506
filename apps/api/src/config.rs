use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::alignment::aligner::{
    AlignPolicy, DEFAULT_MAX_PHRASES_PER_BULLET, DEFAULT_SIGNAL_REUSE_LIMIT,
};

/// Service configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON vocabulary replacing the built-in one.
    pub vocabulary_path: Option<PathBuf>,
    /// JSON profile served when a request carries none.
    pub profile_path: Option<PathBuf>,
    pub policy: AlignPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            vocabulary_path: None,
            profile_path: None,
            policy: AlignPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let policy = AlignPolicy {
            max_phrases_per_bullet: parse_env("MAX_PHRASES_PER_BULLET", DEFAULT_MAX_PHRASES_PER_BULLET)?,
            signal_reuse_limit: parse_env("SIGNAL_REUSE_LIMIT", DEFAULT_SIGNAL_REUSE_LIMIT)?,
        };
        if policy.max_phrases_per_bullet == 0 || policy.signal_reuse_limit == 0 {
            bail!("MAX_PHRASES_PER_BULLET and SIGNAL_REUSE_LIMIT must be at least 1");
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            vocabulary_path: optional_env("VOCABULARY_PATH").map(PathBuf::from),
            profile_path: optional_env("PROFILE_PATH").map(PathBuf::from),
            policy,
        })
    }
}

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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: usize = parse_env("ALIGNMENT_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("ALIGNMENT_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("ALIGNMENT_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("ALIGNMENT_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("ALIGNMENT_TEST_LIMIT", " 3 ");
        let value: usize = parse_env("ALIGNMENT_TEST_LIMIT", 1).unwrap();
        assert_eq!(value, 3);
        std::env::remove_var("ALIGNMENT_TEST_LIMIT");
    }

    #[test]
    fn test_default_policy() {
        let config = Config::default();
        assert_eq!(config.policy.max_phrases_per_bullet, 2);
        assert_eq!(config.policy.signal_reuse_limit, 1);
    }
}
