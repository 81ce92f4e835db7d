//! # Name Mapping Module / 名称映射模块
//!
//! Regex-based rewrite rules that normalize class names across reports whose
//! packages were renamed between runs. A rule is a pattern with a first
//! capturing group and a replacement for the captured span:
//!
//! ```text
//! com\.example\.(legacy)\.=modern
//! ```
//!
//! turns `com.example.legacy.FooTest` into `com.example.modern.FooTest`.
//! Rules are tried in table order and the first match wins.
//!
//! 基于正则表达式的重写规则，用于在包名发生变化的报告之间统一类名。
//! 规则按表中顺序尝试，第一个匹配的规则生效。

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::error::MappingError;

/// A single `pattern -> replacement` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub pattern: String,
    pub replacement: String,
}

/// An ordered set of mapping rules, keyed by pattern text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

/// Shape of a TOML mapping file: a single `[mappings]` table.
#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    mappings: toml::Table,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. A pattern that is already present keeps its position and
    /// takes the new replacement.
    pub fn insert(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        let pattern = pattern.into();
        let replacement = replacement.into();
        match self.rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(rule) => rule.replacement = replacement,
            None => self.rules.push(MappingRule {
                pattern,
                replacement,
            }),
        }
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Loads a mapping file. Paths ending in `.toml` are read as TOML, anything
    /// else as a Java-style property list.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml(&text).map_err(|err| match err {
                MappingError::Toml { source, .. } => MappingError::Toml {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })
        } else {
            Self::from_properties(&text)
        }
    }

    /// Parses a TOML document with a `[mappings]` table of string values.
    pub fn from_toml(text: &str) -> Result<Self, MappingError> {
        let file: MappingFile = toml::from_str(text).map_err(|source| MappingError::Toml {
            path: "<inline>".into(),
            source,
        })?;
        let mut table = Self::new();
        for (pattern, value) in file.mappings {
            let replacement = value
                .as_str()
                .ok_or_else(|| MappingError::NonStringReplacement {
                    pattern: pattern.clone(),
                })?
                .to_string();
            table.insert(pattern, replacement);
        }
        Ok(table)
    }

    /// Parses a property list: `#`/`!` comments, `=`, `:` or whitespace as the
    /// key/value separator, trailing-backslash continuation lines and the
    /// `\t \n \r \f \uXXXX` escapes. Any other escaped character stands for itself.
    pub fn from_properties(text: &str) -> Result<Self, MappingError> {
        let mut table = Self::new();
        for (line_no, line) in logical_lines(text) {
            let (raw_key, raw_value) = split_key_value(&line);
            let key = unescape(raw_key, line_no)?;
            let value = unescape(raw_value, line_no)?;
            table.insert(key, value);
        }
        Ok(table)
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Joins continuation lines and drops blanks and comments. Each logical line
/// carries the 1-based number of the natural line it started on.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut natural = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .enumerate();
    let mut logical = Vec::new();

    while let Some((index, line)) = natural.next() {
        let trimmed = line.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let mut joined = trimmed.to_string();
        while ends_with_odd_backslashes(&joined) {
            joined.pop();
            match natural.next() {
                Some((_, next)) => joined.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }
        logical.push((index + 1, joined));
    }
    logical
}

/// Splits a logical line at the first unescaped `=`, `:` or blank.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(is_blank);
    if !has_separator {
        if let Some(rest) = value.strip_prefix(['=', ':']) {
            value = rest.trim_start_matches(is_blank);
        }
    }
    (&line[..key_end], value)
}

fn unescape(raw: &str, line: usize) -> Result<String, MappingError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| MappingError::Escape {
                        line,
                        detail: format!("invalid unicode escape \\u{hex}"),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Applies a [`MappingTable`] to class names, compiling each pattern once.
///
/// The compiled-regex cache lives as long as the mapper; one mapper is created
/// per parsed report.
pub struct NameMapper<'a> {
    table: &'a MappingTable,
    cache: HashMap<String, Regex>,
}

impl<'a> NameMapper<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// Rewrites `class_name` with the first rule whose pattern matches.
    ///
    /// The span of capture group 1 is replaced and the unmatched prefix and
    /// suffix are kept. Unmatched names are returned unchanged.
    pub fn map(&mut self, class_name: &str) -> Result<String, MappingError> {
        let table = self.table;
        for rule in table.rules() {
            if !self.cache.contains_key(&rule.pattern) {
                let compiled =
                    Regex::new(&rule.pattern).map_err(|source| MappingError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
                self.cache.insert(rule.pattern.clone(), compiled);
            }
            let Some(regex) = self.cache.get(&rule.pattern) else {
                continue;
            };
            let Some(captures) = regex.captures(class_name) else {
                continue;
            };
            let group = captures
                .get(1)
                .ok_or_else(|| MappingError::MissingGroup {
                    pattern: rule.pattern.clone(),
                    class_name: class_name.to_string(),
                })?;
            let mut mapped = String::with_capacity(class_name.len() + rule.replacement.len());
            mapped.push_str(&class_name[..group.start()]);
            mapped.push_str(&rule.replacement);
            mapped.push_str(&class_name[group.end()..]);
            return Ok(mapped);
        }
        Ok(class_name.to_string())
    }

    /// Number of patterns compiled so far.
    pub fn compiled_patterns(&self) -> usize {
        self.cache.len()
    }
}
