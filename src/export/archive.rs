//! Zip packaging of a generated EPUB tree.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;

/// Contents of the `mimetype` entry.
pub const MIMETYPE: &[u8] = b"application/epub+zip";

const MIMETYPE_ENTRY: &str = "mimetype";

/// Pack the tree under `root` into `writer`.
///
/// `mimetype` is written first and stored uncompressed; every other file
/// follows in sorted path order, deflated, named relative to `root`.
pub fn archive_tree<W: Write + Seek>(
    root: &Path,
    writer: W,
    compression_level: Option<u32>,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    let compression_level = compression_level.unwrap_or(6);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level as i64));

    // Must be first and uncompressed
    zip.start_file(MIMETYPE_ENTRY, stored)?;
    zip.write_all(MIMETYPE)?;

    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.sort();

    for path in &files {
        let name = entry_name(root, path);
        if name == MIMETYPE_ENTRY {
            continue;
        }
        debug!(entry = %name, "adding to archive");
        zip.start_file(name.as_str(), deflated)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }

    Ok(zip.finish()?)
}

/// Recursively collect regular files below `dir`.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Archive path of `path` relative to `root`, always `/`-separated.
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
