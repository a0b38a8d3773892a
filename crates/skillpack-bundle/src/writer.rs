//! Archive writer for `.skill` files.
//!
//! Thin layer over [`zip::ZipWriter`] that streams entries with Deflate
//! compression and keeps each file's timestamp and mode.

use crate::Result;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Extension of packaged skill archives.
pub const ARCHIVE_EXTENSION: &str = "skill";

const LARGE_FILE_THRESHOLD: u64 = u32::MAX as u64;
const DEFAULT_UNIX_MODE: u32 = 0o644;

/// Streaming writer for skill archives.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    entries: usize,
    uncompressed_bytes: u64,
}

impl ArchiveWriter<File> {
    /// Create (or truncate) an archive file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            entries: 0,
            uncompressed_bytes: 0,
        }
    }

    /// Stream a file from disk into the archive under `entry_name`.
    ///
    /// Returns the number of bytes copied.
    pub fn add_file(&mut self, entry_name: &str, source: &Path) -> Result<u64> {
        let mut file = File::open(source)?;
        let metadata = file.metadata()?;

        let mut options = entry_options()
            .large_file(metadata.len() >= LARGE_FILE_THRESHOLD)
            .unix_permissions(unix_mode(&metadata));
        if let Some(modified) = metadata.modified().ok().and_then(zip_time) {
            options = options.last_modified_time(modified);
        }

        self.zip.start_file(entry_name, options)?;
        let bytes = std::io::copy(&mut file, &mut self.zip)?;
        self.record(entry_name, bytes);
        Ok(bytes)
    }

    /// Write in-memory content as an entry.
    pub fn add_bytes(&mut self, entry_name: &str, data: &[u8]) -> Result<u64> {
        let options = entry_options()
            .large_file(data.len() as u64 >= LARGE_FILE_THRESHOLD)
            .unix_permissions(DEFAULT_UNIX_MODE);
        self.zip.start_file(entry_name, options)?;
        self.zip.write_all(data)?;
        let bytes = data.len() as u64;
        self.record(entry_name, bytes);
        Ok(bytes)
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Total size of the written entries before compression.
    pub fn uncompressed_bytes(&self) -> u64 {
        self.uncompressed_bytes
    }

    /// Write the central directory and hand back the inner writer.
    pub fn finish(self) -> Result<W> {
        let inner = self.zip.finish()?;
        debug!(
            entries = self.entries,
            bytes = self.uncompressed_bytes,
            "Archive finalized"
        );
        Ok(inner)
    }

    fn record(&mut self, entry_name: &str, bytes: u64) {
        self.entries += 1;
        self.uncompressed_bytes += bytes;
        debug!(entry = entry_name, bytes, "Added archive entry");
    }
}

fn entry_options() -> FileOptions<'static, ()> {
    FileOptions::default().compression_method(CompressionMethod::Deflated)
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        DEFAULT_UNIX_MODE
    }
}

/// Convert a filesystem timestamp to a ZIP (local, 1980-2107) timestamp.
///
/// Returns `None` when the time is outside the representable range.
fn zip_time(time: SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = time.into();
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
