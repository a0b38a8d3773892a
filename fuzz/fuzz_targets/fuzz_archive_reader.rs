//! Fuzz target for .skill archive inspection.
//!
//! Opening and listing an arbitrary archive should only ever return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skillpack_bundle::ArchiveReader;

fuzz_target!(|data: &[u8]| {
    if let Ok(reader) = ArchiveReader::from_bytes(data.to_vec()) {
        let _ = reader.entry_names();
        let _ = reader.root_dir();
    }
});
