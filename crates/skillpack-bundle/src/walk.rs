//! Lazy enumeration of the files that make up a skill.

use crate::{PackageError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file discovered under a skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFile {
    /// Location on disk.
    pub source: PathBuf,
    /// Entry name inside the archive, rooted at the skill directory's
    /// base name and always `/`-separated.
    pub entry_name: String,
}

/// Depth-first iterator over every regular file below a skill directory.
///
/// Visit order is whatever the filesystem returns and is not stable.
/// Directory symlinks are not descended into; a symlink pointing at a
/// regular file is yielded.
pub struct SkillFiles {
    walker: walkdir::IntoIter,
    archive_root: PathBuf,
    exclude: Option<PathBuf>,
}

impl SkillFiles {
    /// Walk `skill_dir`, naming entries relative to its parent.
    pub fn new(skill_dir: &Path) -> Self {
        let archive_root = skill_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            walker: WalkDir::new(skill_dir).min_depth(1).into_iter(),
            archive_root,
            exclude: None,
        }
    }

    /// Skip one specific path (the archive being written, when it lives
    /// inside the skill directory).
    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude = Some(path.into());
        self
    }

    fn entry_name(&self, path: &Path) -> Result<String> {
        let rel = path
            .strip_prefix(&self.archive_root)
            .map_err(|_| PackageError::Walk {
                path: path.to_path_buf(),
                message: format!("not under {}", self.archive_root.display()),
            })?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Ok(parts.join("/"))
    }
}

impl Iterator for SkillFiles {
    type Item = Result<SkillFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    return Some(Err(PackageError::Walk {
                        path,
                        message: e.to_string(),
                    }));
                }
            };

            // `is_file` follows symlinks, matching what a plain stat reports.
            if !entry.path().is_file() {
                continue;
            }
            if self.exclude.as_deref() == Some(entry.path()) {
                continue;
            }

            let source = entry.into_path();
            return Some(self.entry_name(&source).map(|entry_name| SkillFile {
                source,
                entry_name,
            }));
        }
    }
}
