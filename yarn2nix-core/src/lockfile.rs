//! Reader and writer for the yarn v1 `yarn.lock` format.
//!
//! A lock file is a sequence of blocks. Each block starts with one or more
//! dependency keys (`"a@^1.0.0", "a@^1.1.0":`) followed by indented fields:
//!
//! ```text
//! "a@^1.0.0", "a@^1.1.0":
//!   version "1.1.0"
//!   resolved "https://registry.yarnpkg.com/a/-/a-1.1.0.tgz#<sha1>"
//!   dependencies:
//!     b "^2.0.0"
//! ```
//!
//! Block order and field order are kept exactly as they appear on disk, and
//! scalars remember whether they were strings, booleans or numbers so that
//! [`Lockfile::encode`] writes back what [`Lockfile::parse`] read.

use crate::{Result, Yarn2NixError};
use std::fs;
use std::path::Path;

const HEADER: &str = "# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.\n# yarn lockfile v1\n";
const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
    /// Unquoted numeric scalar, kept verbatim.
    Number(String),
    Map(Vec<(String, Value)>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedDependency {
    pub fields: Vec<(String, Value)>,
}

impl LockedDependency {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The `resolved` field. Workspace and `file:` dependencies have none,
    /// and an empty string is treated the same way.
    pub fn resolved(&self) -> Option<&str> {
        self.get_str("resolved").filter(|value| !value.is_empty())
    }

    pub fn set_resolved(&mut self, resolved: String) {
        match self.fields.iter_mut().find(|(key, _)| key == "resolved") {
            Some((_, value)) => *value = Value::String(resolved),
            None => self
                .fields
                .push(("resolved".to_string(), Value::String(resolved))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    pub keys: Vec<String>,
    pub dependency: LockedDependency,
}

impl LockEntry {
    /// All keys of the block, as written in the lock file header line.
    pub fn display_key(&self) -> String {
        self.keys.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lockfile {
    pub entries: Vec<LockEntry>,
}

impl Lockfile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Yarn2NixError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let lines = significant_lines(text)?;
        let mut idx = 0;
        let mut entries = Vec::new();

        while idx < lines.len() {
            let line = &lines[idx];
            if line.indent != 0 {
                return Err(parse_error(line.number, "unexpected indentation"));
            }

            let Some(head) = line.text.strip_suffix(':') else {
                return Err(parse_error(
                    line.number,
                    "expected a dependency key ending with ':'",
                ));
            };

            let keys = parse_keys(head).map_err(|reason| parse_error(line.number, reason))?;
            idx += 1;

            let fields = parse_map(&lines, &mut idx, 1)?;
            entries.push(LockEntry {
                keys,
                dependency: LockedDependency { fields },
            });
        }

        Ok(Lockfile { entries })
    }

    pub fn encode(&self) -> String {
        let mut out = String::from(HEADER);
        out.push_str("\n\n");

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }

            let keys: Vec<String> = entry.keys.iter().map(|key| maybe_wrap(key)).collect();
            out.push_str(&keys.join(", "));
            out.push_str(":\n");
            write_fields(&mut out, &entry.dependency.fields, 1);
        }

        out
    }
}

struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

fn significant_lines(text: &str) -> Result<Vec<Line<'_>>> {
    let mut lines = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let number = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if ["<<<<<<<", "=======", ">>>>>>>"]
            .iter()
            .any(|marker| raw.starts_with(marker))
        {
            return Err(parse_error(number, "merge conflict marker"));
        }

        let body = raw.trim_start_matches(' ');
        if body.starts_with('\t') {
            return Err(parse_error(number, "tabs are not allowed for indentation"));
        }

        let indent = raw.len() - body.len();
        if indent % INDENT.len() != 0 {
            return Err(parse_error(number, "odd indentation"));
        }

        lines.push(Line {
            number,
            indent: indent / INDENT.len(),
            text: body.trim_end(),
        });
    }

    Ok(lines)
}

fn parse_map(lines: &[Line<'_>], idx: &mut usize, depth: usize) -> Result<Vec<(String, Value)>> {
    let mut fields = Vec::new();

    while *idx < lines.len() && lines[*idx].indent >= depth {
        let line = &lines[*idx];
        if line.indent != depth {
            return Err(parse_error(line.number, "unexpected indentation"));
        }
        *idx += 1;

        let (key, rest) = read_token(line.text).map_err(|reason| parse_error(line.number, reason))?;

        if rest == ":" {
            let nested = parse_map(lines, idx, depth + 1)?;
            fields.push((key, Value::Map(nested)));
            continue;
        }

        if !rest.starts_with(char::is_whitespace) {
            return Err(parse_error(line.number, "expected whitespace after key"));
        }

        let value = parse_value(rest.trim()).map_err(|reason| parse_error(line.number, reason))?;
        fields.push((key, value));
    }

    Ok(fields)
}

fn parse_keys(head: &str) -> std::result::Result<Vec<String>, String> {
    let mut keys = Vec::new();
    let mut rest = head.trim();

    loop {
        let (key, tail) = if rest.starts_with('"') {
            read_quoted(rest)?
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            (rest[..end].trim().to_string(), &rest[end..])
        };

        if key.is_empty() {
            return Err("empty dependency key".to_string());
        }
        keys.push(key);

        let tail = tail.trim_start();
        if tail.is_empty() {
            return Ok(keys);
        }

        let Some(next) = tail.strip_prefix(',') else {
            return Err(format!("unexpected characters after key: {tail}"));
        };
        rest = next.trim_start();
    }
}

fn read_token(text: &str) -> std::result::Result<(String, &str), String> {
    if text.starts_with('"') {
        return read_quoted(text);
    }

    let end = text
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(text.len());

    if end == 0 {
        return Err("expected a key".to_string());
    }

    Ok((text[..end].to_string(), &text[end..]))
}

fn parse_value(raw: &str) -> std::result::Result<Value, String> {
    if raw.starts_with('"') {
        let (value, rest) = read_quoted(raw)?;
        if !rest.trim().is_empty() {
            return Err(format!("unexpected characters after string: {}", rest.trim()));
        }
        return Ok(Value::String(value));
    }

    if raw.contains(char::is_whitespace) {
        return Err(format!("unquoted value contains whitespace: {raw}"));
    }

    Ok(match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if raw.starts_with(|c: char| c.is_ascii_digit()) => Value::Number(raw.to_string()),
        _ => Value::String(raw.to_string()),
    })
}

/// Reads a double-quoted, JSON-escaped string from the start of `text` and
/// returns it together with whatever follows the closing quote.
fn read_quoted(text: &str) -> std::result::Result<(String, &str), String> {
    let mut escaped = false;

    for (i, c) in text.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            '"' => {
                let literal = &text[..=i];
                let value = serde_json::from_str::<String>(literal)
                    .map_err(|e| format!("invalid string {literal}: {e}"))?;
                return Ok((value, &text[i + 1..]));
            }
            _ => {}
        }
    }

    Err("unterminated string".to_string())
}

fn write_fields(out: &mut String, fields: &[(String, Value)], depth: usize) {
    let indent = INDENT.repeat(depth);

    for (key, value) in fields {
        out.push_str(&indent);
        out.push_str(&maybe_wrap(key));

        match value {
            Value::Map(nested) => {
                out.push_str(":\n");
                write_fields(out, nested, depth + 1);
            }
            Value::String(s) => {
                out.push(' ');
                out.push_str(&maybe_wrap(s));
                out.push('\n');
            }
            Value::Bool(b) => {
                out.push(' ');
                out.push_str(if *b { "true" } else { "false" });
                out.push('\n');
            }
            Value::Number(n) => {
                out.push(' ');
                out.push_str(n);
                out.push('\n');
            }
        }
    }
}

fn should_wrap(s: &str) -> bool {
    s.starts_with("true")
        || s.starts_with("false")
        || s.contains(|c: char| c.is_whitespace() || matches!(c, ':' | '\\' | '"' | ',' | '[' | ']'))
        || !s.starts_with(|c: char| c.is_ascii_alphabetic())
}

fn maybe_wrap(s: &str) -> String {
    if should_wrap(s) {
        serde_json::Value::String(s.to_string()).to_string()
    } else {
        s.to_string()
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> Yarn2NixError {
    Yarn2NixError::LockParse {
        line,
        reason: reason.into(),
    }
}
