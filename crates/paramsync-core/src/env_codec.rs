//! Reading and writing `key=value` env files.
//!
//! Values containing shell-special characters are written inside single
//! quotes, with embedded single quotes spelled `'\''`, so the file can be
//! `source`d by a POSIX shell. Decoding reverses that only for values that
//! actually needed the quoting; anything else is kept verbatim.

use crate::error::{Error, Result};
use paramsync_types::EnvEntry;
use std::path::Path;
use tracing::debug;

/// Characters that force a value to be single-quoted
pub const SPECIAL_CHARS: [char; 6] = ['$', '\\', '"', '!', '`', ' '];

const ESCAPED_QUOTE: &str = "'\\''";

fn has_special_chars(value: &str) -> bool {
    value.contains(SPECIAL_CHARS)
}

/// Single-quote `value` if it contains any of [`SPECIAL_CHARS`].
pub fn quote(value: &str) -> String {
    if has_special_chars(value) {
        format!("'{}'", value.replace('\'', ESCAPED_QUOTE))
    } else {
        value.to_string()
    }
}

/// Strip the quoting added by [`quote`].
///
/// The quotes are only removed when the un-escaped content contains a
/// special character; a value like `'abc'` is returned as-is, quotes
/// included.
pub fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        let content = value[1..value.len() - 1].replace(ESCAPED_QUOTE, "'");
        if has_special_chars(&content) {
            return content;
        }
    }
    value.to_string()
}

/// Parse env-file text into entries, in file order.
///
/// A line is kept only if it splits on `=` into exactly two non-empty
/// parts. Lines carrying more than one `=` are dropped.
pub fn decode(text: &str) -> Vec<EnvEntry> {
    let mut entries = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split('=').collect();

        match parts.as_slice() {
            [key, value] if !key.is_empty() && !value.is_empty() => {
                entries.push(EnvEntry::new(*key, unquote(value)));
            }
            _ if line.trim().is_empty() => {}
            _ => debug!(line = index + 1, "skipping env line without a single key=value pair"),
        }
    }

    entries
}

/// Render entries as `key=value` lines joined by `\n`, without a trailing
/// newline.
pub fn encode(entries: &[EnvEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}={}", entry.key, quote(&entry.value)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn read_env_file(path: &Path) -> Result<Vec<EnvEntry>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(decode(&text))
}

/// Write entries to `path` and return the rendered text.
///
/// The parent directory must already exist.
pub fn write_env_file(path: &Path, entries: &[EnvEntry]) -> Result<String> {
    let text = encode(entries);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, &text).map_err(|e| Error::io(path, e))?;
    Ok(text)
}

/// Replace `old_prefix` with `new_prefix` on every key that starts with it.
///
/// Non-matching entries pass through untouched and the order is preserved.
pub fn remap_prefix(entries: &[EnvEntry], old_prefix: &str, new_prefix: &str) -> Vec<EnvEntry> {
    entries
        .iter()
        .map(|entry| match entry.key.strip_prefix(old_prefix) {
            Some(rest) => EnvEntry::new(format!("{}{}", new_prefix, rest), entry.value.clone()),
            None => entry.clone(),
        })
        .collect()
}
