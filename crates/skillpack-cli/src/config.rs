//! Packager configuration resolution.
//!
//! Precedence: CLI arguments, then environment variables (handled by
//! clap's `env` support), then the defaults below.

use skillpack_bundle::PackageOptions;
use std::path::{Path, PathBuf};

/// Environment variable overriding the skill directory.
pub const ENV_SKILL_DIR: &str = "SKILLPACK_SKILL_DIR";

/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_DIR: &str = "SKILLPACK_OUTPUT_DIR";

/// Skill directory packaged when none is given, next to the program.
pub const DEFAULT_SKILL_DIR_NAME: &str = "laravel-api";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerConfig {
    pub skill_dir: PathBuf,
    /// `None` means the current working directory.
    pub output_dir: Option<PathBuf>,
    pub cleanup_on_failure: bool,
    pub dry_run: bool,
}

impl PackagerConfig {
    pub fn resolve(
        skill_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        keep_partial: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            skill_dir: skill_dir.unwrap_or_else(default_skill_dir),
            output_dir,
            cleanup_on_failure: !keep_partial,
            dry_run,
        }
    }

    /// Output directory as shown to the operator.
    pub fn display_output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn package_options(&self) -> PackageOptions {
        let options = PackageOptions::default()
            .with_cleanup_on_failure(self.cleanup_on_failure)
            .with_dry_run(self.dry_run);
        match &self.output_dir {
            Some(dir) => options.with_output_dir(dir),
            None => options,
        }
    }
}

/// `<program root>/laravel-api`, where the program root is the parent of
/// the directory holding the executable.
pub fn default_skill_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| program_root(&exe))
        .map(|root| root.join(DEFAULT_SKILL_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SKILL_DIR_NAME))
}

fn program_root(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}
