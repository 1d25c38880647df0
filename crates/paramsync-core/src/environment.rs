use paramsync_types::EnvEntry;
use tracing::warn;

/// Point-in-time copy of the process environment.
///
/// Everything below the CLI boundary works on explicit entry lists; this is
/// the one place that reads the ambient environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    entries: Vec<EnvEntry>,
}

impl EnvironmentSnapshot {
    /// Capture the current process environment, skipping variables whose
    /// name or value is not valid UTF-8.
    pub fn capture() -> Self {
        let entries = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some(EnvEntry::new(key, value)),
                _ => None,
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<EnvEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<EnvEntry> {
        self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

/// Copy entries into the process environment, overwriting existing
/// variables. Returns how many entries were applied.
///
/// Keys the platform cannot represent (empty, containing `=` or NUL) and
/// values containing NUL are skipped with a warning. There is no rollback.
///
/// # Safety
///
/// Mutating the environment is only sound while no other thread reads or
/// writes it, see [`std::env::set_var`].
pub unsafe fn load_into_environment(entries: &[EnvEntry]) -> usize {
    let mut applied = 0;
    for entry in entries {
        if entry.key.is_empty()
            || entry.key.contains(['=', '\0'])
            || entry.value.contains('\0')
        {
            warn!(key = %entry.key, "cannot export variable to the environment");
            continue;
        }
        // SAFETY: upheld by the caller.
        unsafe { std::env::set_var(&entry.key, &entry.value) };
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_capture_round_trip() {
        let entries = vec![
            EnvEntry::new("PARAMSYNC_TEST_ENV_A", "value01"),
            EnvEntry::new("PARAMSYNC_TEST_ENV_B", "special$code"),
            EnvEntry::new("BAD=KEY", "skipped"),
        ];

        let applied = unsafe { load_into_environment(&entries) };
        assert_eq!(applied, 2);

        let snapshot = EnvironmentSnapshot::capture();
        assert_eq!(snapshot.get("PARAMSYNC_TEST_ENV_A"), Some("value01"));
        assert_eq!(snapshot.get("PARAMSYNC_TEST_ENV_B"), Some("special$code"));

        unsafe {
            std::env::remove_var("PARAMSYNC_TEST_ENV_A");
            std::env::remove_var("PARAMSYNC_TEST_ENV_B");
        }
    }

    #[test]
    fn test_snapshot_get_prefers_last_duplicate() {
        let snapshot = EnvironmentSnapshot::from_entries(vec![
            EnvEntry::new("A", "1"),
            EnvEntry::new("A", "2"),
        ]);
        assert_eq!(snapshot.get("A"), Some("2"));
        assert_eq!(snapshot.get("B"), None);
    }
}
