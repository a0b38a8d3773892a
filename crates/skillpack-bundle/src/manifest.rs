//! SKILL.md header block extraction and parsing.
//!
//! The header is a deliberately small format: a `---` line, `key: value`
//! lines, and a closing `---` line. It is parsed in two phases:
//! locate the delimited block, then split each line on the first `:`.

use crate::error::{ValidationError, ValidationResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// File name of the manifest inside a skill directory.
pub const MANIFEST_FILE_NAME: &str = "SKILL.md";

/// Marker line that opens and closes the header block.
pub const HEADER_DELIMITER: &str = "---";

/// Maximum number of bytes scanned for the closing delimiter.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Maximum length of the `name` field, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of the `description` field, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Key/value pairs from the manifest header block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestHeader {
    fields: BTreeMap<String, String>,
}

impl ManifestHeader {
    /// Parse a header block (the text between the delimiter lines).
    ///
    /// Blank lines and lines without a `:` are ignored. Later duplicates
    /// replace earlier ones.
    pub fn parse(block: &str) -> Self {
        let fields = block
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { fields }
    }

    /// Extract and parse the header from full manifest content.
    pub fn from_content(content: &str) -> ValidationResult<Self> {
        extract_header_block(content).map(Self::parse)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `name` field, if present.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    /// The `description` field, if present.
    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Locate the header block at the start of `content`.
///
/// Returns the text between the opening and closing delimiter lines,
/// excluding both. The closing line must be exactly `---` (a trailing
/// `\r` is tolerated) and must start within [`MAX_HEADER_BYTES`].
pub fn extract_header_block(content: &str) -> ValidationResult<&str> {
    if !content.starts_with(HEADER_DELIMITER) {
        return Err(ValidationError::NoHeader);
    }

    let first_end = content.find('\n').ok_or(ValidationError::InvalidHeader)?;
    if strip_cr(&content[..first_end]) != HEADER_DELIMITER {
        return Err(ValidationError::InvalidHeader);
    }

    let body_start = first_end + 1;
    let mut line_start = body_start;
    // The block must be preceded by at least one newline before the
    // closing marker, so `---\n---` carries no block.
    while let Some(rel_nl) = content[line_start..].find('\n') {
        let nl = line_start + rel_nl;
        let next = nl + 1;
        if next > MAX_HEADER_BYTES {
            break;
        }
        let line_end = content[next..]
            .find('\n')
            .map_or(content.len(), |i| next + i);
        if strip_cr(&content[next..line_end]) == HEADER_DELIMITER {
            return Ok(&content[body_start..nl]);
        }
        line_start = next;
    }

    Err(ValidationError::InvalidHeader)
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
