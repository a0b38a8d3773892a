//! Exit codes for the skillpack CLI.
//!
//! - 0: archive written (or dry run passed)
//! - 1: any missing-input, validation, or packaging failure
//!
//! Usage errors are reported by clap with its own status (2).

use skillpack_bundle::PackageError;

/// Outcome of a packaging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Archive written
    Clean,
    /// Skill directory or manifest missing
    InputError,
    /// Manifest failed validation
    ValidationError,
    /// Archive creation failed
    PackageError,
}

impl ExitCode {
    /// Map a packaging failure onto its exit code.
    pub fn from_error(err: &PackageError) -> Self {
        match err {
            PackageError::DirectoryNotFound(_)
            | PackageError::NotADirectory(_)
            | PackageError::ManifestMissing(_) => ExitCode::InputError,
            PackageError::Validation(_) => ExitCode::ValidationError,
            _ => ExitCode::PackageError,
        }
    }

    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        match self {
            ExitCode::Clean => 0,
            ExitCode::InputError | ExitCode::ValidationError | ExitCode::PackageError => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ValidationError => "ERR_VALIDATION",
            ExitCode::PackageError => "ERR_PACKAGE",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
