//! File I/O for pointscope samples
//!
//! Reads and writes point cloud files, dispatching on the file extension.
//! Only the ASCII XYZ format is wired up; other extensions report
//! `UnsupportedFormat` so import loops can skip them.

pub mod xyz;

pub use xyz::{XyzLayout, XyzReader, XyzWriter};

use pointscope_core::{Error, PointCloud, Result, SamplePoint};
use std::path::{Path, PathBuf};

/// Whether a path carries an extension the importer recognizes
pub fn recognized_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("xyz")
    )
}

/// Auto-detect format and read a sample cloud
pub fn read_sample_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<SamplePoint>> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xyz") => XyzReader::read_point_cloud(path),
        other => Err(Error::UnsupportedFormat(format!(
            "unsupported point cloud format: {other:?}"
        ))),
    }
}

/// Auto-detect format and write a sample cloud
pub fn write_sample_cloud<P: AsRef<Path>>(cloud: &PointCloud<SamplePoint>, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xyz") => {
            XyzWriter::write_point_cloud(cloud, path, true)
        }
        other => Err(Error::UnsupportedFormat(format!(
            "unsupported point cloud format: {other:?}"
        ))),
    }
}

/// Regular files under `dir` with a recognized extension, in sorted order
///
/// Sorting fixes the directory-listing order imports rely on, so sample
/// indices are reproducible across platforms.
pub fn list_import_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && recognized_extension(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}
