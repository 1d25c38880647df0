//! Sample env entries covering plain values and every quoting case.

use paramsync_types::EnvEntry;

/// Entries whose values exercise the special characters `$`, `"`,
/// backtick and `!`, alongside plain values.
pub fn sample_entries(prefix: &str) -> Vec<EnvEntry> {
    [
        ("01", "value01"),
        ("02", "value02"),
        ("03", "value03"),
        ("04", "special$code"),
        ("05", "\"quoted\""),
        ("06", "`code`!"),
    ]
    .into_iter()
    .map(|(suffix, value)| EnvEntry::new(format!("{}{}", prefix, suffix), value))
    .collect()
}

/// The text `paramsync` writes for [`sample_entries`].
pub fn sample_env_text(prefix: &str) -> String {
    paramsync_core::encode(&sample_entries(prefix))
}
