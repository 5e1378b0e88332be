//! Image discovery: walk a source directory and yield eligible entries in
//! natural-sort order.
//!
//! Eligibility is a fixed, case-insensitive extension allow-list. Anything
//! else — other extensions, directories, sockets — is silently skipped, not
//! an error. An empty result is likewise `Ok`: the caller decides whether
//! "nothing found" is worth reporting.
//!
//! Keys are built from the leaf file name only, so identically named files
//! in different subdirectories compare equal and keep their traversal order.
//! Traversal is name-sorted per directory, which makes that tie-break (and
//! the whole page order) deterministic across platforms.

use crate::error::Img2PdfError;
use crate::pipeline::sort::SortKey;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Extensions recognised as images (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// A discovered candidate image, ready for normalization.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Leaf file name, the only part that participates in ordering.
    pub file_name: String,
    /// Natural-sort key derived from `file_name`.
    pub key: SortKey,
}

/// Check whether a path's extension is on the allow-list.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Enumerate eligible images under `root`, sorted by natural-sort key.
///
/// With `recursive` set, descends into all subdirectories; otherwise only
/// the root's own entries are considered. The sort is stable, so equal keys
/// keep traversal order.
pub fn discover(root: &Path, recursive: bool) -> Result<Vec<ImageEntry>, Img2PdfError> {
    if !root.is_dir() {
        return Err(Img2PdfError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut entries: Vec<ImageEntry> = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_image_file(path) {
            trace!("skipping non-image entry: {}", path.display());
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = SortKey::from_name(&file_name);

        entries.push(ImageEntry {
            path: path.to_path_buf(),
            file_name,
            key,
        });
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));

    debug!(
        "discovered {} image(s) under {} (recursive={})",
        entries.len(),
        root.display(),
        recursive
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn natural_order_across_names_and_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b1.png");
        touch(tmp.path(), "a10.jpg");
        touch(tmp.path(), "a2.png");

        let entries = discover(tmp.path(), false).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["a2.png", "a10.jpg", "b1.png"]);
    }

    #[test]
    fn allow_list_is_case_insensitive_and_exclusive() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "keep.PNG");
        touch(tmp.path(), "keep.JpEg");
        touch(tmp.path(), "keep.webp");
        touch(tmp.path(), "skip.gif");
        touch(tmp.path(), "skip.txt");
        touch(tmp.path(), "no_extension");

        let entries = discover(tmp.path(), false).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.file_name.starts_with("keep")));
    }

    #[test]
    fn directories_named_like_images_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("fake.png")).unwrap();
        touch(tmp.path(), "real.png");

        let entries = discover(tmp.path(), false).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["real.png"]);
    }

    #[test]
    fn recursion_flag_controls_descent() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "top.png");
        let sub = tmp.path().join("chapter2");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "nested.png");

        let flat = discover(tmp.path(), false).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].file_name, "top.png");

        let deep = discover(tmp.path(), true).unwrap();
        let names: Vec<_> = deep.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["nested.png", "top.png"]);
    }

    #[test]
    fn keys_use_leaf_names_not_directory_prefixes() {
        // "z/page1.png" must sort before "a/page2.png": only the leaf counts.
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let z = tmp.path().join("z");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&z).unwrap();
        touch(&z, "page1.png");
        touch(&a, "page2.png");

        let entries = discover(tmp.path(), true).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["page1.png", "page2.png"]);
    }

    #[test]
    fn empty_directory_yields_empty_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let entries = discover(tmp.path(), true).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("nope");
        assert!(matches!(
            discover(&gone, false),
            Err(Img2PdfError::SourceNotFound { .. })
        ));
    }
}
