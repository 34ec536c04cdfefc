//! Locates a JSON array literal assigned inside page script text.

use std::sync::LazyLock;

use regex::Regex;

/// `<ident>(.<ident>)*.achievements = [` - the array literal starts at the final `[`.
#[allow(clippy::expect_used)]
static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z_$][\w$]*\.)+achievements\s*=\s*\[")
        .expect("achievements assignment regex is valid") // Static pattern, safe to panic
});

/// Returns the array literal of the first `<namespace>.achievements=[...];`
/// assignment in `text`, without the terminating `;`.
///
/// Brackets inside JSON string literals are ignored while scanning, so
/// descriptions containing `]` or `];` do not end the literal early.
#[must_use]
pub fn extract_embedded_json(text: &str) -> Option<&str> {
    ASSIGNMENT_RE.find_iter(text).find_map(|assignment| {
        let start = assignment.end() - 1;
        let end = array_literal_end(text, start)?;
        text[end..]
            .trim_start()
            .starts_with(';')
            .then(|| &text[start..end])
    })
}

/// Returns the byte offset just past the `]` closing the array opened at `start`.
fn array_literal_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
