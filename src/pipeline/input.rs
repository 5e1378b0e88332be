//! Source resolution: normalise a user-supplied location to an enumerable
//! directory.
//!
//! A directory source passes through untouched. An archive source
//! (`.zip`/`.cbz`) is unpacked into a `TempDir` whose lifetime is tied to
//! the returned [`ResolvedSource`], so the scratch directory is removed on
//! every exit path — success, error, or panic — the moment the value drops.
//! Archive entries may nest in subdirectories, so staged sources are always
//! enumerated recursively regardless of the configured flag.

use crate::error::Img2PdfError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved source — a plain directory or a staged archive.
pub enum ResolvedSource {
    /// Source was already a directory on disk.
    Directory(PathBuf),
    /// Source was an archive; contents unpacked to a scratch directory.
    /// The `TempDir` is kept alive to defer cleanup until the run completes.
    Staged { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedSource {
    /// The directory to enumerate, regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedSource::Directory(p) => p,
            ResolvedSource::Staged { path, .. } => path,
        }
    }

    /// Staged archives are enumerated recursively no matter what the
    /// configuration says; their entries nest arbitrarily.
    pub fn forces_recursion(&self) -> bool {
        matches!(self, ResolvedSource::Staged { .. })
    }
}

/// Check whether the path looks like a supported archive.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            e == "zip" || e == "cbz"
        })
        .unwrap_or(false)
}

/// Resolve the source location to an enumerable directory, staging archives
/// into scratch space as needed.
pub fn resolve_source(source: &Path) -> Result<ResolvedSource, Img2PdfError> {
    let meta = std::fs::metadata(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Img2PdfError::PermissionDenied {
            path: source.to_path_buf(),
        },
        _ => Img2PdfError::SourceNotFound {
            path: source.to_path_buf(),
        },
    })?;

    if meta.is_dir() {
        debug!("resolved directory source: {}", source.display());
        return Ok(ResolvedSource::Directory(source.to_path_buf()));
    }

    if meta.is_file() && is_archive(source) {
        return stage_archive(source);
    }

    Err(Img2PdfError::InvalidSource {
        path: source.to_path_buf(),
    })
}

/// Unpack an archive into a fresh scratch directory.
fn stage_archive(source: &Path) -> Result<ResolvedSource, Img2PdfError> {
    info!("staging archive: {}", source.display());

    let file = File::open(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Img2PdfError::PermissionDenied {
            path: source.to_path_buf(),
        },
        _ => Img2PdfError::SourceNotFound {
            path: source.to_path_buf(),
        },
    })?;

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Img2PdfError::ArchiveUnpackFailed {
            path: source.to_path_buf(),
            detail: e.to_string(),
        })?;

    let temp_dir = TempDir::new().map_err(|e| Img2PdfError::Internal(e.to_string()))?;

    archive
        .extract(temp_dir.path())
        .map_err(|e| Img2PdfError::ArchiveUnpackFailed {
            path: source.to_path_buf(),
            detail: e.to_string(),
        })?;

    info!(
        "staged {} entr{} to {}",
        archive.len(),
        if archive.len() == 1 { "y" } else { "ies" },
        temp_dir.path().display()
    );

    Ok(ResolvedSource::Staged {
        path: temp_dir.path().to_path_buf(),
        _temp_dir: temp_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zw = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        for (name, bytes) in entries {
            zw.start_file(*name, opts).unwrap();
            zw.write_all(bytes).unwrap();
        }
        zw.finish().unwrap();
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive(Path::new("comics.zip")));
        assert!(is_archive(Path::new("comics.CBZ")));
        assert!(!is_archive(Path::new("comics.rar")));
        assert!(!is_archive(Path::new("folder")));
        assert!(!is_archive(Path::new("")));
    }

    #[test]
    fn directory_passes_through() {
        let tmp = tempfile::tempdir().unwrap();
        let resolved = resolve_source(tmp.path()).unwrap();
        assert!(matches!(resolved, ResolvedSource::Directory(_)));
        assert_eq!(resolved.path(), tmp.path());
        assert!(!resolved.forces_recursion());
    }

    #[test]
    fn archive_is_staged_with_nested_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("pages.zip");
        write_zip(
            &zip_path,
            &[("p1.png", b"x".as_slice()), ("ch2/p2.png", b"y".as_slice())],
        );

        let resolved = resolve_source(&zip_path).unwrap();
        assert!(resolved.forces_recursion());
        assert!(resolved.path().join("p1.png").is_file());
        assert!(resolved.path().join("ch2").join("p2.png").is_file());
    }

    #[test]
    fn scratch_directory_is_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("pages.zip");
        write_zip(&zip_path, &[("p1.png", b"x".as_slice())]);

        let staged_at;
        {
            let resolved = resolve_source(&zip_path).unwrap();
            staged_at = resolved.path().to_path_buf();
            assert!(staged_at.exists());
        }
        assert!(!staged_at.exists(), "scratch dir must vanish with the value");
    }

    #[test]
    fn missing_source_is_not_found() {
        assert!(matches!(
            resolve_source(Path::new("/definitely/not/here")),
            Err(Img2PdfError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn plain_file_is_invalid_source() {
        let tmp = tempfile::tempdir().unwrap();
        let txt = tmp.path().join("notes.txt");
        std::fs::write(&txt, b"hello").unwrap();
        assert!(matches!(
            resolve_source(&txt),
            Err(Img2PdfError::InvalidSource { .. })
        ));
    }

    #[test]
    fn corrupt_archive_fails_to_stage() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("broken.zip");
        std::fs::write(&bad, b"this is no zip").unwrap();
        assert!(matches!(
            resolve_source(&bad),
            Err(Img2PdfError::ArchiveUnpackFailed { .. })
        ));
    }
}
