//! Test fixtures: ZIP archives built in memory.

use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Build a ZIP archive; names ending in `/` become directory entries.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add directory");
        } else {
            zip.start_file(*name, options).expect("start file");
            zip.write_all(data).expect("write entry");
        }
    }
    zip.finish().expect("finish archive").into_inner()
}

/// `a.txt` (5 bytes) and `dir/b.txt` (10 bytes).
pub fn sample_archive() -> Vec<u8> {
    build_zip(&[("a.txt", b"hello"), ("dir/", b""), ("dir/b.txt", b"0123456789")])
}
