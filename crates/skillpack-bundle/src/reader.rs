//! Reader for inspecting packaged `.skill` archives.

use crate::{PackageError, Result};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Read-only view over a skill archive.
pub struct ArchiveReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ArchiveReader<File> {
    /// Open an archive from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl ArchiveReader<Cursor<Vec<u8>>> {
    /// Open an archive from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        debug!(entries = archive.len(), "Archive opened");
        Ok(Self { archive })
    }

    /// Names of all file entries, in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// The single top-level directory every entry lives under, if any.
    pub fn root_dir(&self) -> Option<String> {
        let mut roots = self
            .archive
            .file_names()
            .filter_map(|name| name.split_once('/').map(|(root, _)| root));
        let first = roots.next()?;
        roots.all(|r| r == first).then(|| first.to_string())
    }

    /// Read an entry's full content.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|_| PackageError::EntryNotFound(name.to_string()))?;
        // The declared size comes from the archive and is not trusted.
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ArchiveWriter;

    fn sample(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.add_bytes(name, data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reader_lists_and_reads() {
        let bytes = sample(&[("demo/SKILL.md", b"manifest"), ("demo/a/b.txt", b"bee")]);
        let mut reader = ArchiveReader::from_bytes(bytes).unwrap();

        assert_eq!(reader.len(), 2);
        assert!(reader.contains("demo/a/b.txt"));
        assert_eq!(reader.entry_names(), vec!["demo/SKILL.md", "demo/a/b.txt"]);
        assert_eq!(reader.read("demo/a/b.txt").unwrap(), b"bee");
    }

    #[test]
    fn test_reader_root_dir() {
        let single = ArchiveReader::from_bytes(sample(&[("demo/x", b"1"), ("demo/y/z", b"2")]))
            .unwrap();
        assert_eq!(single.root_dir().as_deref(), Some("demo"));

        let mixed = ArchiveReader::from_bytes(sample(&[("demo/x", b"1"), ("other/y", b"2")]))
            .unwrap();
        assert_eq!(mixed.root_dir(), None);
    }

    #[test]
    fn test_reader_missing_entry() {
        let mut reader = ArchiveReader::from_bytes(sample(&[("demo/x", b"1")])).unwrap();
        assert!(matches!(
            reader.read("demo/nope"),
            Err(PackageError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_reader_survives_inflated_declared_size() {
        let mut bytes = sample(&[("demo/x", b"tiny")]);
        // Uncompressed size sits 24 bytes into the central directory header.
        let central = bytes
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        if let Ok(mut reader) = ArchiveReader::from_bytes(bytes) {
            let _ = reader.read("demo/x");
        }
    }

    #[test]
    fn test_reader_rejects_garbage() {
        assert!(ArchiveReader::from_bytes(b"not a zip".to_vec()).is_err());
    }
}
