//! `;`-separated result file writer and reader.
//!
//! Every cell, including the last, is terminated by `;`. Cells containing the
//! separator, a quote or a line break are quoted with `""` escaping.

use std::collections::BTreeSet;
use std::fs;
use std::mem::take;
use std::path::Path;

use tracing::debug;

use crate::achievement::EnrichedAchievement;

use super::OutputError;

const SEPARATOR: char = ';';
const COUNTRY_SEPARATOR: &str = ",";

/// Fixed leading header columns.
pub const HEADER_COLUMNS: [&str; 4] = [
    "Achievement",
    "Description",
    "Country",
    "Is dlc required?",
];

/// Cell marking a DLC every listed DLC is needed for.
pub const ALL_REQUIRED_MARK: &str = "AND";
/// Cell marking a DLC from a one-of group.
pub const ONE_REQUIRED_MARK: &str = "OR";

/// Contents recovered from a result file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvContents {
    /// DLC column names.
    pub dlc_names: BTreeSet<String>,
    /// One entry per data row.
    pub achievements: Vec<EnrichedAchievement>,
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains(SEPARATOR) || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    for cell in cells {
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
        out.push(SEPARATOR);
    }
    out.push('\n');
}

/// Renders the header line and one row per achievement.
#[must_use]
pub fn render_csv(dlc_names: &BTreeSet<String>, achievements: &[EnrichedAchievement]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        HEADER_COLUMNS
            .iter()
            .copied()
            .chain(dlc_names.iter().map(String::as_str)),
    );

    for achievement in achievements {
        let countries = achievement
            .countries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(COUNTRY_SEPARATOR);
        let required = if achievement.is_required_dlc {
            "true"
        } else {
            "false"
        };
        let marks = dlc_names.iter().map(|dlc| {
            if achievement.all_required_dlc_names.contains(dlc) {
                ALL_REQUIRED_MARK
            } else if achievement.one_required_of_dlc_names.contains(dlc) {
                ONE_REQUIRED_MARK
            } else {
                ""
            }
        });
        push_row(
            &mut out,
            [
                achievement.name.as_str(),
                achievement.description.as_str(),
                countries.as_str(),
                required,
            ]
            .into_iter()
            .chain(marks),
        );
    }
    out
}

/// Writes the result file, creating parent directories first.
///
/// The content is rendered before the file is opened, so the file is either
/// written whole or not touched.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if a directory cannot be created or the file
/// cannot be written.
pub fn write_csv(
    path: &Path,
    dlc_names: &BTreeSet<String>,
    achievements: &[EnrichedAchievement],
) -> Result<(), OutputError> {
    let content = render_csv(dlc_names, achievements);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        rows = achievements.len(),
        dlc_columns = dlc_names.len(),
        "Wrote result file"
    );
    Ok(())
}

/// Reads a result file written by [`write_csv`].
///
/// The file has no unlock column; `achieved` sets the flag on every entry.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the file cannot be read and
/// [`OutputError::MalformedCache`] if its layout is not recognized.
pub fn read_csv(path: &Path, achieved: bool) -> Result<CsvContents, OutputError> {
    let text = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&text, achieved).map_err(|reason| OutputError::MalformedCache {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parses result file text.
pub(crate) fn parse_csv(text: &str, achieved: bool) -> Result<CsvContents, String> {
    let mut rows = parse_rows(text.trim_start_matches('\u{feff}')).into_iter();
    let header = rows.next().ok_or_else(|| "file is empty".to_string())?;

    let fixed = header.get(..HEADER_COLUMNS.len());
    if fixed.is_none_or(|cells| !cells.iter().map(String::as_str).eq(HEADER_COLUMNS)) {
        return Err(format!("unexpected header: {}", header.join(";")));
    }
    let dlc_columns: Vec<String> = header[HEADER_COLUMNS.len()..].to_vec();

    let mut achievements = Vec::new();
    for (offset, row) in rows.enumerate() {
        let line = offset + 2;
        achievements.push(parse_record(&row, &dlc_columns, achieved).map_err(|reason| {
            format!("line {line}: {reason}")
        })?);
    }

    Ok(CsvContents {
        dlc_names: dlc_columns.into_iter().collect(),
        achievements,
    })
}

fn parse_record(
    row: &[String],
    dlc_columns: &[String],
    achieved: bool,
) -> Result<EnrichedAchievement, String> {
    let [name, description, countries, required, marks @ ..] = row else {
        return Err(format!("expected at least 4 cells, found {}", row.len()));
    };
    let is_required_dlc = match required.trim() {
        "true" | "True" => true,
        "false" | "False" => false,
        other => return Err(format!("invalid dlc flag '{other}'")),
    };

    let mut record = EnrichedAchievement {
        achieved,
        name: name.clone(),
        description: description.clone(),
        countries: countries
            .split(COUNTRY_SEPARATOR)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        is_required_dlc,
        ..EnrichedAchievement::default()
    };
    for (dlc, mark) in dlc_columns.iter().zip(marks) {
        match mark.trim() {
            ALL_REQUIRED_MARK => record.all_required_dlc_names.push(dlc.clone()),
            ONE_REQUIRED_MARK => record.one_required_of_dlc_names.push(dlc.clone()),
            _ => {}
        }
    }
    Ok(record)
}

/// Splits text into rows of cells, honoring quotes and CRLF line endings.
///
/// The empty cell after each row's terminating separator is dropped, as are
/// blank lines.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if cell.is_empty() => in_quotes = true,
            c if c == SEPARATOR && !in_quotes => row.push(take(&mut cell)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_row(&mut rows, &mut row, &mut cell);
            }
            _ => cell.push(ch),
        }
    }
    finish_row(&mut rows, &mut row, &mut cell);
    rows
}

fn finish_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, cell: &mut String) {
    if !cell.is_empty() {
        row.push(take(cell));
    }
    if !row.is_empty() {
        rows.push(take(row));
    }
}
