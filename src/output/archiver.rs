//! ZIP packaging of a mirrored site folder

use crate::output::Compressor;
use crate::ArchiveError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A file or directory collected for the archive
#[derive(Debug)]
struct Entry {
    /// Absolute path on disk
    path: PathBuf,
    /// `/`-separated path inside the archive
    name: String,
    is_dir: bool,
}

/// Packs a directory into a ZIP file
///
/// Entry names are relative to the source directory, so extracting the
/// archive recreates the site layout without the run folder around it.
#[derive(Debug, Clone, Copy)]
pub struct ZipCompressor {
    method: CompressionMethod,
}

impl ZipCompressor {
    pub fn new(method: CompressionMethod) -> Self {
        Self { method }
    }
}

impl Default for ZipCompressor {
    fn default() -> Self {
        Self::new(CompressionMethod::Deflated)
    }
}

impl Compressor for ZipCompressor {
    fn compress(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError> {
        if !source.is_dir() {
            return Err(ArchiveError::MissingSource(source.to_path_buf()));
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut entries = Vec::new();
        collect_entries(source, source, &mut entries)?;

        let file = File::create(destination).map_err(|e| io_error(destination, e))?;
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default()
            .compression_method(self.method)
            .unix_permissions(0o644);

        for entry in &entries {
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options)?;
                continue;
            }

            writer.start_file(entry.name.as_str(), options)?;
            let mut input = File::open(&entry.path).map_err(|e| io_error(&entry.path, e))?;
            io::copy(&mut input, &mut writer).map_err(|e| io_error(&entry.path, e))?;
        }

        writer.finish()?;

        tracing::debug!(
            "Packed {} entries from {} into {}",
            entries.len(),
            source.display(),
            destination.display()
        );

        Ok(())
    }
}

/// Walks `dir` depth-first in name order, collecting archive entries
fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<Entry>) -> Result<(), ArchiveError> {
    let mut children = fs::read_dir(dir)
        .map_err(|e| io_error(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| io_error(dir, e))?;
    children.sort();

    for path in children {
        let name = entry_name(root, &path);
        if path.is_dir() {
            entries.push(Entry {
                path: path.clone(),
                name,
                is_dir: true,
            });
            collect_entries(root, &path, entries)?;
        } else {
            entries.push(Entry {
                path,
                name,
                is_dir: false,
            });
        }
    }

    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn io_error(path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}
