//! Validate-then-zip packaging of a skill directory.

use crate::manifest::MANIFEST_FILE_NAME;
use crate::progress::{PackageEvent, ProgressEmitter};
use crate::validate::{validate_skill, VALID_MESSAGE};
use crate::walk::{SkillFile, SkillFiles};
use crate::writer::{ArchiveWriter, ARCHIVE_EXTENSION};
use crate::{PackageError, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Knobs for a packaging run.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Where the archive goes; the current directory when `None`.
    pub output_dir: Option<PathBuf>,
    /// Delete a partially written archive when creation fails.
    pub cleanup_on_failure: bool,
    /// Run every check and the walk but write nothing.
    pub dry_run: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            cleanup_on_failure: true,
            dry_run: false,
        }
    }
}

impl PackageOptions {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Outcome of a successful packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    /// Skill name from the manifest header.
    pub name: String,
    /// Absolute path of the archive.
    pub archive_path: PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    /// Sum of entry sizes before compression.
    pub uncompressed_bytes: u64,
    /// Size of the archive file on disk (0 for a dry run).
    pub archive_size: u64,
    pub dry_run: bool,
}

impl PackageReport {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Archive size in KiB, for display.
    pub fn archive_size_kb(&self) -> f64 {
        self.archive_size as f64 / 1024.0
    }
}

/// Package `skill_dir` into `<name>.skill`.
///
/// The directory must exist, be a directory, contain `SKILL.md`, and pass
/// validation before anything is written. Entries are named relative to
/// the directory's parent so the archive unpacks into a folder of the same
/// name.
pub fn package_skill(
    skill_dir: &Path,
    options: &PackageOptions,
    emitter: &dyn ProgressEmitter,
) -> Result<PackageReport> {
    let result = run(skill_dir, options, emitter);
    if let Err(e) = &result {
        emitter.emit(&PackageEvent::Failed {
            message: e.to_string(),
        });
    }
    result
}

fn run(
    skill_dir: &Path,
    options: &PackageOptions,
    emitter: &dyn ProgressEmitter,
) -> Result<PackageReport> {
    let skill_dir = check_skill_dir(skill_dir)?;

    emitter.emit(&PackageEvent::Validating {
        skill_dir: skill_dir.clone(),
    });
    let header = validate_skill(&skill_dir)?;
    let name = header.name().unwrap_or_default().to_string();
    emitter.emit(&PackageEvent::Validated {
        name: name.clone(),
        message: VALID_MESSAGE.to_string(),
    });

    let output_dir = resolve_output_dir(options)?;
    let archive_path = output_dir.join(archive_file_name(&skill_dir));

    if options.dry_run {
        return dry_run(&skill_dir, name, archive_path, emitter);
    }

    let files = SkillFiles::new(&skill_dir).excluding(&archive_path);
    let (entries, uncompressed_bytes) =
        build_archive(&archive_path, files, options.cleanup_on_failure, emitter)?;

    let archive_size = std::fs::metadata(&archive_path)
        .map(|m| m.len())
        .map_err(|e| archive_error(&archive_path, e.into()))?;

    info!(
        archive = %archive_path.display(),
        entries = entries.len(),
        bytes = archive_size,
        "Skill packaged"
    );
    emitter.emit(&PackageEvent::Completed {
        archive: archive_path.clone(),
        entries: entries.len(),
        archive_size,
    });

    Ok(PackageReport {
        name,
        archive_path,
        entries,
        uncompressed_bytes,
        archive_size,
        dry_run: false,
    })
}

/// Resolve and check the skill directory preconditions.
fn check_skill_dir(skill_dir: &Path) -> Result<PathBuf> {
    if !skill_dir.exists() {
        return Err(PackageError::DirectoryNotFound(skill_dir.to_path_buf()));
    }
    let skill_dir = skill_dir.canonicalize()?;

    if !skill_dir.is_dir() {
        return Err(PackageError::NotADirectory(skill_dir));
    }
    if !skill_dir.join(MANIFEST_FILE_NAME).exists() {
        return Err(PackageError::ManifestMissing(skill_dir));
    }
    Ok(skill_dir)
}

fn resolve_output_dir(options: &PackageOptions) -> Result<PathBuf> {
    let dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    if !options.dry_run {
        std::fs::create_dir_all(&dir).map_err(|source| PackageError::OutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    // An output dir that does not exist yet (dry run) stays as given,
    // made absolute against the working directory.
    match dir.canonicalize() {
        Ok(abs) => Ok(abs),
        Err(_) if dir.is_absolute() => Ok(dir),
        Err(_) => Ok(std::env::current_dir()?.join(dir)),
    }
}

/// `<directory-base-name>.skill`
pub fn archive_file_name(skill_dir: &Path) -> String {
    let base = skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "skill".to_string());
    format!("{base}.{ARCHIVE_EXTENSION}")
}

/// Write `files` into a fresh archive at `archive_path`, removing the
/// partial file on failure when `cleanup` is set.
///
/// A file that could not be opened was never touched, so a failed create
/// returns without cleanup and an existing archive stays in place.
fn build_archive<I>(
    archive_path: &Path,
    files: I,
    cleanup: bool,
    emitter: &dyn ProgressEmitter,
) -> Result<(Vec<String>, u64)>
where
    I: IntoIterator<Item = Result<SkillFile>>,
{
    let writer = ArchiveWriter::create(archive_path).map_err(|e| archive_error(archive_path, e))?;

    match write_archive(writer, files, emitter) {
        Ok(written) => Ok(written),
        Err(e) => {
            if cleanup {
                remove_partial(archive_path, emitter);
            }
            Err(archive_error(archive_path, e))
        }
    }
}

/// Consumes the writer, so the file handle is dropped before this returns.
fn write_archive<I>(
    mut writer: ArchiveWriter<File>,
    files: I,
    emitter: &dyn ProgressEmitter,
) -> Result<(Vec<String>, u64)>
where
    I: IntoIterator<Item = Result<SkillFile>>,
{
    let mut entries = Vec::new();

    for file in files {
        let file = file?;
        let bytes = writer.add_file(&file.entry_name, &file.source)?;
        emitter.emit(&PackageEvent::EntryAdded {
            entry: file.entry_name.clone(),
            bytes,
        });
        entries.push(file.entry_name);
    }

    let uncompressed_bytes = writer.uncompressed_bytes();
    writer.finish()?;
    Ok((entries, uncompressed_bytes))
}

fn dry_run(
    skill_dir: &Path,
    name: String,
    archive_path: PathBuf,
    emitter: &dyn ProgressEmitter,
) -> Result<PackageReport> {
    let mut entries = Vec::new();
    let mut uncompressed_bytes = 0;

    for file in SkillFiles::new(skill_dir).excluding(&archive_path) {
        let file = file?;
        let bytes = std::fs::metadata(&file.source)?.len();
        uncompressed_bytes += bytes;
        emitter.emit(&PackageEvent::EntryAdded {
            entry: file.entry_name.clone(),
            bytes,
        });
        entries.push(file.entry_name);
    }

    debug!(entries = entries.len(), "Dry run complete");
    Ok(PackageReport {
        name,
        archive_path,
        entries,
        uncompressed_bytes,
        archive_size: 0,
        dry_run: true,
    })
}

fn remove_partial(archive_path: &Path, emitter: &dyn ProgressEmitter) {
    if !archive_path.exists() {
        return;
    }
    match std::fs::remove_file(archive_path) {
        Ok(()) => {
            debug!(archive = %archive_path.display(), "Removed partial archive");
            emitter.emit(&PackageEvent::PartialRemoved {
                archive: archive_path.to_path_buf(),
            });
        }
        Err(e) => warn!(
            archive = %archive_path.display(),
            error = %e,
            "Could not remove partial archive"
        ),
    }
}

fn archive_error(archive_path: &Path, source: PackageError) -> PackageError {
    PackageError::ArchiveWrite {
        path: archive_path.to_path_buf(),
        source: Box::new(source),
    }
}
