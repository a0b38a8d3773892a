//! Error types for validation and packaging.

use std::path::PathBuf;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Manifest validation failures.
///
/// The `Display` output of each variant is the diagnostic shown to the
/// operator, so the wording is kept stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("SKILL.md not found")]
    ManifestNotFound,

    #[error("SKILL.md could not be read: {0}")]
    Unreadable(String),

    #[error("No YAML frontmatter found at start of SKILL.md")]
    NoHeader,

    #[error("Invalid frontmatter format - must be between --- markers")]
    InvalidHeader,

    #[error("Missing '{0}' in frontmatter")]
    MissingField(&'static str),

    #[error("Name '{0}' should be kebab-case (lowercase letters, digits, and hyphens only)")]
    NameNotKebabCase(String),

    #[error("Name '{0}' cannot start/end with hyphen or contain consecutive hyphens")]
    NameHyphenPlacement(String),

    #[error("Name is too long ({0} characters). Maximum is {max} characters.", max = crate::manifest::MAX_NAME_LEN)]
    NameTooLong(usize),

    #[error("Description cannot contain angle brackets (< or >)")]
    DescriptionAngleBrackets,

    #[error("Description is too long ({0} characters). Maximum is {max} characters.", max = crate::manifest::MAX_DESCRIPTION_LEN)]
    DescriptionTooLong(usize),
}

impl ValidationError {
    /// Short machine-readable name for structured output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ValidationError::ManifestNotFound => "manifest_not_found",
            ValidationError::Unreadable(_) => "manifest_unreadable",
            ValidationError::NoHeader => "no_header",
            ValidationError::InvalidHeader => "invalid_header",
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::NameNotKebabCase(_) => "name_not_kebab_case",
            ValidationError::NameHyphenPlacement(_) => "name_hyphen_placement",
            ValidationError::NameTooLong(_) => "name_too_long",
            ValidationError::DescriptionAngleBrackets => "description_angle_brackets",
            ValidationError::DescriptionTooLong(_) => "description_too_long",
        }
    }
}

/// Errors that can occur while packaging a skill directory.
#[derive(Error, Debug)]
pub enum PackageError {
    /// Skill directory does not exist
    #[error("Skill folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Skill path exists but is not a directory
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// SKILL.md missing directly inside the skill directory
    #[error("SKILL.md not found in {}", .0.display())]
    ManifestMissing(PathBuf),

    /// Manifest failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Output directory could not be created or resolved
    #[error("cannot prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure while enumerating the skill directory
    #[error("cannot read {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    /// Failure while creating the archive
    #[error("Error creating .skill file {}: {source}", path.display())]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: Box<PackageError>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Entry not present in an archive
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),
}

impl PackageError {
    /// Whether the failure happened before anything was written.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PackageError::DirectoryNotFound(_)
                | PackageError::NotADirectory(_)
                | PackageError::ManifestMissing(_)
                | PackageError::Validation(_)
        )
    }

    /// Short machine-readable name for structured output.
    pub fn code_name(&self) -> &'static str {
        match self {
            PackageError::DirectoryNotFound(_) => "directory_not_found",
            PackageError::NotADirectory(_) => "not_a_directory",
            PackageError::ManifestMissing(_) => "manifest_missing",
            PackageError::Validation(_) => "validation_failed",
            PackageError::OutputDir { .. } => "output_dir",
            PackageError::Walk { .. } => "walk",
            PackageError::ArchiveWrite { .. } => "archive_write",
            PackageError::Io(_) => "io",
            PackageError::Zip(_) => "zip",
            PackageError::EntryNotFound(_) => "entry_not_found",
        }
    }
}

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, PackageError>;
