//! Loads profile and vocabulary files. The alignment core itself never touches the filesystem.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::models::profile::ProfileStore;
use crate::vocabulary::Vocabulary;

async fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {what} file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid {what} file '{}'", path.display()))
}

/// Reads and validates a JSON profile (`{"headline": ..., "claims": [...]}`).
pub async fn load_profile(path: &Path) -> Result<ProfileStore> {
    let profile: ProfileStore = read_json(path, "profile").await?;
    info!("Loaded profile with {} claims from {}", profile.len(), path.display());
    Ok(profile)
}

/// Reads a vocabulary file, or falls back to the built-in vocabulary.
pub async fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    let vocabulary = match path {
        Some(path) => read_json(path, "vocabulary").await?,
        None => Vocabulary::builtin().context("Built-in vocabulary failed validation")?,
    };
    info!("Vocabulary ready: {} phrases", vocabulary.entries().len());
    Ok(vocabulary)
}
