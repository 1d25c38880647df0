//! Assertions over env files produced by CLI runs.

use anyhow::{Context, Result};
use std::path::Path;

/// Assert that the env file at `path` has `key` decoding to `value`.
pub fn assert_env_entry(path: &Path, key: &str, value: &str) -> Result<()> {
    let entries = paramsync_core::read_env_file(path)
        .with_context(|| format!("Failed to read env file {}", path.display()))?;

    let found = entries
        .iter()
        .rev()
        .find(|entry| entry.key == key)
        .with_context(|| format!("Key {} not found in {}", key, path.display()))?;

    if found.value != value {
        anyhow::bail!(
            "Expected {}={:?} in {}, got {:?}",
            key,
            value,
            path.display(),
            found.value
        );
    }

    Ok(())
}

/// Assert that no key in the env file starts with `prefix`.
pub fn assert_no_key_with_prefix(path: &Path, prefix: &str) -> Result<()> {
    let entries = paramsync_core::read_env_file(path)?;
    let offending: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.key.starts_with(prefix))
        .map(|entry| entry.key.as_str())
        .collect();

    if !offending.is_empty() {
        anyhow::bail!(
            "Keys still carry prefix {} in {}: {:?}",
            prefix,
            path.display(),
            offending
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_assert_env_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "A=1\nB='has space'").unwrap();

        assert!(assert_env_entry(&path, "B", "has space").is_ok());
        assert!(assert_env_entry(&path, "A", "2").is_err());
        assert!(assert_env_entry(&path, "C", "1").is_err());
    }

    #[test]
    fn test_assert_no_key_with_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "DEV_A=1\nB=2").unwrap();

        assert!(assert_no_key_with_prefix(&path, "DEV_").is_err());
        assert!(assert_no_key_with_prefix(&path, "PROD_").is_ok());
    }
}
