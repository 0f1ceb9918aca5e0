//! Flat INI document: named sections of `key = value` lines

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};

// These regexes are compile-time constants, panicking is acceptable here
// as it indicates a programming error in the codebase, not a runtime issue
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<name>[^\]]+)\]\s*$").expect("Invalid section regex - this is a bug")
});
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^=:]*?)\s*[=:]\s*(?P<value>.*)$")
        .expect("Invalid option regex - this is a bug")
});

/// One `[name]` section and its entries in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value; keys match case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or update a value, keeping the position of an existing key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// An ordered set of sections.
///
/// Comments are dropped on parse, so a parse/write cycle does not
/// preserve them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text.
    ///
    /// Accepts `key = value` and `key: value`, `#`/`;` comment lines and
    /// indented continuation lines. A value wrapped in double quotes is
    /// unescaped (`\\`, `\"`, `\n`, `\r`, `\t`). Duplicate sections or keys
    /// are errors.
    pub fn parse(content: &str) -> Result<Self> {
        let mut doc = IniDocument::new();
        // Index of the key that an indented line would continue
        let mut last_key: Option<usize> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }

            // An indented line right after an entry continues its value, even
            // when it starts with a comment character
            let indented = raw.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key_idx)) = (doc.sections.last_mut(), last_key) {
                    let value = &mut section.entries[key_idx].1;
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(caps) = SECTION_RE.captures(trimmed) {
                let name = caps["name"].to_string();
                if doc.section(&name).is_some() {
                    return Err(parse_error(line_no, format!("duplicate section [{}]", name)));
                }
                doc.sections.push(Section::new(name));
                last_key = None;
                continue;
            }

            let caps = OPTION_RE
                .captures(trimmed)
                .ok_or_else(|| parse_error(line_no, format!("expected 'key = value', got '{}'", trimmed)))?;
            let key = caps["key"].to_string();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key".to_string()));
            }

            let section = doc
                .sections
                .last_mut()
                .ok_or_else(|| parse_error(line_no, "missing section header".to_string()))?;
            if section.contains_key(&key) {
                return Err(parse_error(
                    line_no,
                    format!("duplicate key '{}' in [{}]", key, section.name),
                ));
            }
            section.entries.push((key, unquote(&caps["value"])));
            last_key = Some(section.entries.len() - 1);
        }

        Ok(doc)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Replace the whole content of a section, appending it if new.
    pub fn set_section(&mut self, section: Section) {
        match self.section_mut(&section.name) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Set one value, creating the section when it does not exist yet.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        if self.section(section).is_none() {
            self.sections.push(Section::new(section));
        }
        if let Some(s) = self.section_mut(section) {
            s.set(key, value);
        }
    }

    /// Check that every section name and key can be written and read back.
    pub fn validate(&self) -> Result<()> {
        for section in &self.sections {
            validate_section_name(&section.name)?;
            for (key, _) in &section.entries {
                validate_key(key)?;
            }
        }
        Ok(())
    }
}

/// A section name must be non-empty and free of `]` and line breaks.
pub fn validate_section_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(|c| matches!(c, ']' | '\n' | '\r')) {
        return Err(Error::InvalidName(format!("section [{}]", name.escape_debug())));
    }
    Ok(())
}

/// A key must be non-empty, carry no surrounding whitespace, contain no
/// `=`, `:` or line break, and not start with `[`, `#` or `;`.
pub fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.trim() != key
        || key.contains(|c| matches!(c, '=' | ':' | '\n' | '\r'))
        || key.starts_with(['[', '#', ';']);
    if bad {
        return Err(Error::InvalidName(format!("key '{}'", key.escape_debug())));
    }
    Ok(())
}

fn parse_error(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, quote(value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Values that would not survive a plain `key = value` line are written
/// quoted and escaped.
fn quote(value: &str) -> String {
    let plain = value.trim() == value
        && !value.starts_with('"')
        && !value.contains(|c| matches!(c, '\n' | '\r'));
    if plain {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> String {
    let inner = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
