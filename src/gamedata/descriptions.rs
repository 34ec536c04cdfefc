//! Localisation file reader.
//!
//! Lines look like ` ACHIEVEMENT_KEY:0 "Display text"`. The language header
//! (`l_english:`), blank lines and `#` comments carry no entry.

use std::collections::HashMap;

use tracing::trace;

const BOM: char = '\u{feff}';

/// Parses localisation text into a key to text map.
///
/// Lines that do not have the `KEY:N "text"` shape are skipped. When a key
/// repeats, the last occurrence wins.
#[must_use]
pub fn parse_descriptions(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for (index, line) in text.trim_start_matches(BOM).lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some((key, value)) => {
                entries.insert(key.to_string(), value.to_string());
            }
            None => trace!(line = index + 1, "Skipping localisation line"),
        }
    }
    entries
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit()).trim_start();
    let body = rest.strip_prefix('"')?;
    let end = body.rfind('"')?;
    Some((key, &body[..end]))
}
