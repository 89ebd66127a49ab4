//! Zip extraction for downloaded boundary archives.

use std::path::Path;

use crate::BoundaryError;

/// Extracts every entry of a zip archive into `dest_dir`, returning the
/// number of entries.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the archive cannot be opened or an entry
/// cannot be written.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, BoundaryError> {
    log::info!(
        "Extracting {} -> {}",
        archive_path.display(),
        dest_dir.display()
    );

    std::fs::create_dir_all(dest_dir).map_err(|e| BoundaryError::io(dest_dir, e))?;

    let file = std::fs::File::open(archive_path).map_err(|e| BoundaryError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let entries = archive.len();
    archive.extract(dest_dir)?;

    log::info!("  extracted {entries} files");
    Ok(entries)
}
