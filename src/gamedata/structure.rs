//! Achievement-structure script reader.
//!
//! The file is a sequence of `key = value` pairs where a value is a word, a
//! quoted string or a `{ ... }` block. Each top-level block describes one
//! achievement:
//!
//! ```text
//! achievement_a1 = {
//!     localization = ACHIEVEMENT_A1
//!     visible_requirements = {
//!         has_dlc = "Rights of Man"
//!         OR = { has_dlc = "Cossacks" has_dlc = "Mandate of Heaven" }
//!     }
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use crate::achievement::{DlcGroup, RequirementRecord, RequirementToken};

use super::ParsedStructure;

const LOCALIZATION_KEY: &str = "localization";
const NAME_SUFFIX: &str = "_NAME";
const VISIBLE_REQUIREMENTS_KEY: &str = "visible_requirements";
const AND_KEY: &str = "AND";
const OR_KEY: &str = "OR";

/// Position and reason of a script syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptError {
    pub(crate) line: usize,
    pub(crate) reason: String,
}

impl ScriptError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    Operator(String),
    Word(String),
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

/// Script value: a scalar or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Scalar(String),
    Block(Vec<Entry>),
}

/// One block item; bare list values have no key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: Option<String>,
    value: Value,
}

impl Entry {
    fn key_is(&self, expected: &str) -> bool {
        self.key
            .as_deref()
            .is_some_and(|key| key.eq_ignore_ascii_case(expected))
    }

    fn scalar(&self) -> Option<&str> {
        match &self.value {
            Value::Scalar(value) => Some(value),
            Value::Block(_) => None,
        }
    }

    fn block(&self) -> Option<&[Entry]> {
        match &self.value {
            Value::Block(entries) => Some(entries),
            Value::Scalar(_) => None,
        }
    }
}

struct Tokenizer<'a> {
    chars: Peekable<CharIndices<'a>>,
    text: &'a str,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            text,
            line: 1,
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch == '\n' {
                self.line += 1;
                self.chars.next();
            } else if ch.is_whitespace() || ch == '\u{feff}' {
                self.chars.next();
            } else if ch == '#' {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                break;
            }
        }
    }

    fn quoted(&mut self, start_line: usize) -> Result<String, ScriptError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(value),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => value.push(c),
                    None => break,
                },
                Some((_, c)) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                }
                None => break,
            }
        }
        Err(ScriptError::new(start_line, "unterminated quoted string"))
    }

    fn word(&mut self, start: usize) -> String {
        let mut end = self.text.len();
        while let Some(&(index, ch)) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '{' | '}' | '=' | '<' | '>' | '"' | '#') {
                end = index;
                break;
            }
            self.chars.next();
        }
        self.text[start..end].to_string()
    }

    fn next_token(&mut self) -> Result<Option<Token>, ScriptError> {
        self.skip_trivia();
        let line = self.line;
        let Some((start, ch)) = self.chars.next() else {
            return Ok(None);
        };
        let kind = match ch {
            '{' => TokenKind::Open,
            '}' => TokenKind::Close,
            '=' => TokenKind::Operator("=".to_string()),
            '<' | '>' => {
                let mut op = ch.to_string();
                if self.chars.next_if(|&(_, c)| c == '=').is_some() {
                    op.push('=');
                }
                TokenKind::Operator(op)
            }
            '"' => TokenKind::Quoted(self.quoted(line)?),
            _ => TokenKind::Word(self.word(start)),
        };
        Ok(Some(Token { kind, line }))
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ScriptError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

struct ScriptParser {
    tokens: std::vec::IntoIter<Token>,
    peeked: Option<Token>,
}

impl ScriptParser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            peeked: None,
        }
    }

    fn next(&mut self) -> Option<Token> {
        self.peeked.take().or_else(|| self.tokens.next())
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next();
        }
        self.peeked.as_ref()
    }

    /// Parses entries until `}` (nested) or end of input (top level).
    fn block(&mut self, opened_at: Option<usize>) -> Result<Vec<Entry>, ScriptError> {
        let mut entries = Vec::new();
        loop {
            let Some(token) = self.next() else {
                return match opened_at {
                    Some(line) => Err(ScriptError::new(
                        line,
                        "unbalanced braces: block is never closed",
                    )),
                    None => Ok(entries),
                };
            };
            match token.kind {
                TokenKind::Close => {
                    return match opened_at {
                        Some(_) => Ok(entries),
                        None => Err(ScriptError::new(
                            token.line,
                            "unbalanced braces: unexpected '}'",
                        )),
                    };
                }
                TokenKind::Open => entries.push(Entry {
                    key: None,
                    value: Value::Block(self.block(Some(token.line))?),
                }),
                TokenKind::Operator(op) => {
                    return Err(ScriptError::new(
                        token.line,
                        format!("operator '{op}' without a key"),
                    ));
                }
                TokenKind::Word(word) | TokenKind::Quoted(word) => {
                    let has_operator =
                        matches!(self.peek(), Some(Token { kind: TokenKind::Operator(_), .. }));
                    if has_operator {
                        let operator_line = self.next().map_or(token.line, |t| t.line);
                        let value = self.value(operator_line)?;
                        entries.push(Entry {
                            key: Some(word),
                            value,
                        });
                    } else {
                        entries.push(Entry {
                            key: None,
                            value: Value::Scalar(word),
                        });
                    }
                }
            }
        }
    }

    fn value(&mut self, operator_line: usize) -> Result<Value, ScriptError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Word(value) | TokenKind::Quoted(value),
                ..
            }) => Ok(Value::Scalar(value)),
            Some(Token {
                kind: TokenKind::Open,
                line,
            }) => Ok(Value::Block(self.block(Some(line))?)),
            _ => Err(ScriptError::new(operator_line, "dangling '=' without a value")),
        }
    }
}

fn parse_script(text: &str) -> Result<Vec<Entry>, ScriptError> {
    let tokens = Tokenizer::new(text).tokenize()?;
    ScriptParser::new(tokens).block(None)
}

/// Parses structure text into requirement records.
///
/// Achievement names are resolved through `descriptions`:
/// `<localization>_NAME`, then `<localization>`, then the block key.
pub(crate) fn parse_structure<S>(
    text: &str,
    descriptions: &HashMap<String, String, S>,
) -> Result<ParsedStructure, ScriptError>
where
    S: std::hash::BuildHasher,
{
    let entries = parse_script(text)?;
    let mut parsed = ParsedStructure::default();

    for entry in &entries {
        let (Some(key), Some(body)) = (entry.key.as_deref(), entry.block()) else {
            continue;
        };
        let name = resolve_name(key, body, descriptions);
        let mut record = RequirementRecord::new(name);
        if let Some(requirements) = body
            .iter()
            .find(|e| e.key_is(VISIBLE_REQUIREMENTS_KEY))
            .and_then(Entry::block)
        {
            collect_requirements(requirements, &mut record, &mut parsed.dlc_names);
        }
        parsed.records.push(record);
    }

    debug!(
        records = parsed.records.len(),
        dlc_names = parsed.dlc_names.len(),
        "Parsed achievement structure"
    );
    Ok(parsed)
}

fn resolve_name<S>(key: &str, body: &[Entry], descriptions: &HashMap<String, String, S>) -> String
where
    S: std::hash::BuildHasher,
{
    body.iter()
        .find(|e| e.key_is(LOCALIZATION_KEY))
        .and_then(Entry::scalar)
        .and_then(|loc| {
            descriptions
                .get(&format!("{loc}{NAME_SUFFIX}"))
                .or_else(|| descriptions.get(loc))
        })
        .map_or_else(|| key.to_string(), Clone::clone)
}

fn collect_requirements(
    entries: &[Entry],
    record: &mut RequirementRecord,
    dlc_names: &mut BTreeSet<String>,
) {
    for entry in entries {
        if entry.key_is(RequirementToken::HAS_DLC) {
            if let Some(dlc) = entry.scalar() {
                record.requires_all_dlc.insert(dlc.to_string());
                dlc_names.insert(dlc.to_string());
            }
        } else if entry.key_is(AND_KEY) {
            if let Some(inner) = entry.block() {
                collect_requirements(inner, record, dlc_names);
            }
        } else if entry.key_is(OR_KEY)
            && let Some(inner) = entry.block()
        {
            for group in one_of_groups(inner) {
                if group.marker.is_dlc() {
                    dlc_names.extend(group.names.iter().cloned());
                }
                record.requires_one_of.push(group);
            }
        }
    }
}

/// Groups the scalar pairs of an `OR` block by key, in first-seen order.
fn one_of_groups(entries: &[Entry]) -> Vec<DlcGroup> {
    let mut groups: Vec<DlcGroup> = Vec::new();
    for entry in entries {
        let (Some(key), Some(value)) = (entry.key.as_deref(), entry.scalar()) else {
            continue;
        };
        let marker = RequirementToken::from(key);
        match groups.iter_mut().find(|g| g.marker == marker) {
            Some(group) => group.names.push(value.to_string()),
            None => groups.push(DlcGroup::new(marker, vec![value.to_string()])),
        }
    }
    groups
}
