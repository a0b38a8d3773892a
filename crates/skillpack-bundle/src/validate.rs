//! Skill manifest validation.
//!
//! Rules are applied in a fixed order and the first failure wins.

use crate::error::{ValidationError, ValidationResult};
use crate::manifest::{ManifestHeader, MANIFEST_FILE_NAME, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Message reported when every rule passes.
pub const VALID_MESSAGE: &str = "Skill is valid!";

/// Pass/fail verdict with the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

impl Verdict {
    /// Validate `skill_dir` and fold the outcome into a verdict.
    pub fn of(skill_dir: &Path) -> Self {
        Self::from(validate_skill(skill_dir))
    }
}

impl<T> From<ValidationResult<T>> for Verdict {
    fn from(result: ValidationResult<T>) -> Self {
        match result {
            Ok(_) => Verdict {
                valid: true,
                message: VALID_MESSAGE.to_string(),
            },
            Err(e) => Verdict {
                valid: false,
                message: e.to_string(),
            },
        }
    }
}

/// Validate the manifest of a skill directory.
///
/// Reads `SKILL.md` fresh on every call. Returns the parsed header on
/// success.
pub fn validate_skill(skill_dir: &Path) -> ValidationResult<ManifestHeader> {
    let manifest_path = skill_dir.join(MANIFEST_FILE_NAME);
    if !manifest_path.exists() {
        return Err(ValidationError::ManifestNotFound);
    }

    let content = std::fs::read_to_string(&manifest_path)
        .map_err(|e| ValidationError::Unreadable(e.to_string()))?;

    let header = validate_manifest_content(&content)?;
    debug!(path = %manifest_path.display(), fields = header.len(), "Manifest validated");
    Ok(header)
}

/// Validate manifest content already in memory.
pub fn validate_manifest_content(content: &str) -> ValidationResult<ManifestHeader> {
    let header = ManifestHeader::from_content(content)?;

    let name = header.name().ok_or(ValidationError::MissingField("name"))?;
    let description = header
        .description()
        .ok_or(ValidationError::MissingField("description"))?;

    validate_name(name)?;
    validate_description(description)?;

    Ok(header)
}

/// Check a skill name for kebab-case and length.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
    if name.is_empty() || !name.chars().all(allowed) {
        return Err(ValidationError::NameNotKebabCase(name.to_string()));
    }

    if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Err(ValidationError::NameHyphenPlacement(name.to_string()));
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(len));
    }

    Ok(())
}

/// Check a skill description for forbidden characters and length.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.contains(['<', '>']) {
        return Err(ValidationError::DescriptionAngleBrackets);
    }

    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong(len));
    }

    Ok(())
}
