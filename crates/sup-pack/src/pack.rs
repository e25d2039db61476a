//! Creates a gzip-compressed `.sup.gz` tarball from a payload directory.

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;

use crate::error::PackError;

/// Pack the payload directory `source_dir` into a gzip-compressed tarball
/// at `output_path`.
///
/// `manifest_file` names the manifest inside `source_dir` and must exist.
/// All entries of `source_dir` are included except hidden files and
/// previously built `.sup.gz` artifacts, so republishing does not nest the
/// old tarball inside the new one. The output file is created or truncated.
///
/// # Errors
///
/// Returns [`PackError::MissingManifest`] if the manifest file is absent,
/// or [`PackError::Io`] on any I/O failure.
pub fn pack_directory(
    source_dir: &Path,
    manifest_file: &str,
    output_path: &Path,
) -> Result<(), PackError> {
    if !source_dir.join(manifest_file).exists() {
        return Err(PackError::MissingManifest(manifest_file.to_owned()));
    }

    let file = File::create(output_path)?;
    let encoder = GzEncoder::new(file, Compression::best());
    let mut archive = tar::Builder::new(encoder);
    archive.follow_symlinks(false);

    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name_str = name.to_string_lossy();

        if name_str.starts_with('.') || name_str.ends_with(".sup.gz") {
            continue;
        }

        let path = entry.path();
        debug!("packing: {}", path.display());

        if path.is_dir() {
            archive.append_dir_all(&name, &path)?;
        } else {
            archive.append_path_with_name(&path, &name)?;
        }
    }

    archive.finish()?;
    Ok(())
}
