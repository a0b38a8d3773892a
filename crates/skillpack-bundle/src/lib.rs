//! Skill manifest validation and `.skill` archive packaging.
//!
//! A skill is a directory with a `SKILL.md` manifest at its root. The
//! manifest starts with a small header block:
//!
//! ```text
//! ---
//! name: my-skill
//! description: What the skill does
//! ---
//! ```
//!
//! [`validate_skill`] checks that header; [`package_skill`] runs the same
//! validation and then zips the whole directory into `<dir-name>.skill`,
//! rooted at the directory's base name.
//!
//! # Example
//!
//! ```no_run
//! use skillpack_bundle::{package_skill, NullEmitter, PackageOptions};
//! use std::path::Path;
//!
//! let options = PackageOptions::default().with_output_dir("dist");
//! let report = package_skill(Path::new("laravel-api"), &options, &NullEmitter).unwrap();
//! println!("{} ({} entries)", report.archive_path.display(), report.entry_count());
//! ```

pub mod error;
pub mod manifest;
pub mod package;
pub mod progress;
pub mod reader;
pub mod validate;
pub mod walk;
pub mod writer;

pub use error::{PackageError, Result, ValidationError, ValidationResult};
pub use manifest::{ManifestHeader, MANIFEST_FILE_NAME};
pub use package::{archive_file_name, package_skill, PackageOptions, PackageReport};
pub use progress::{NullEmitter, PackageEvent, ProgressEmitter, RecordingEmitter};
pub use reader::ArchiveReader;
pub use validate::{validate_manifest_content, validate_skill, Verdict, VALID_MESSAGE};
pub use walk::{SkillFile, SkillFiles};
pub use writer::{ArchiveWriter, ARCHIVE_EXTENSION};
