//! Error types for the img2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Img2PdfError`] — **Fatal**: the run cannot produce a document at all
//!   (missing source, unreadable archive, nothing survived decoding, write
//!   failure). Returned as `Err(Img2PdfError)` from the top-level `convert*`
//!   functions.
//!
//! * [`EntryError`] — **Non-fatal**: a single image failed (truncated file,
//!   unsupported encoding) but the rest of the batch is fine. Stored inside
//!   [`crate::output::EntryResult`] so callers can inspect partial success
//!   rather than losing the whole document to one bad file.
//!
//! `NoImagesFound` and `AllEntriesFailed` are deliberately separate variants:
//! the first means the source held nothing eligible, the second means files
//! were found but every one of them failed to load. Callers present them
//! differently.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the img2pdf library.
///
/// Per-image failures use [`EntryError`] and are stored in
/// [`crate::output::EntryResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Img2PdfError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// The source path does not exist.
    #[error("Source not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the source.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The source is neither a directory nor a recognised archive.
    #[error("Invalid source '{path}': expected a directory or a .zip/.cbz archive")]
    InvalidSource { path: PathBuf },

    /// The archive could not be opened or unpacked into the staging directory.
    #[error("Failed to unpack archive '{path}': {detail}")]
    ArchiveUnpackFailed { path: PathBuf, detail: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// The source was enumerated successfully but held no eligible images.
    ///
    /// Non-fatal from the user's point of view — the CLI prints a warning
    /// rather than an error trace. Distinct from [`Self::AllEntriesFailed`].
    #[error("No PNG, JPEG, or WEBP images found in '{path}'")]
    NoImagesFound { path: PathBuf },

    /// Images were discovered but every single one failed to load.
    #[error("All {total} images failed to load.\nFirst error: {first_error}")]
    AllEntriesFailed { total: usize, first_error: String },

    /// The assembler was handed an empty image sequence.
    ///
    /// A zero-page PDF is not a meaningful artifact; callers driving
    /// [`crate::pipeline::assemble`] directly get this instead of one.
    #[error("Cannot assemble a PDF from an empty image sequence")]
    EmptyDocument,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image entry.
///
/// Stored alongside [`crate::output::EntryResult`] when an entry fails.
/// The overall run continues unless ALL entries fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum EntryError {
    /// The file could not be read from disk.
    #[error("'{file}': read failed: {detail}")]
    ReadFailed { file: String, detail: String },

    /// The bytes could not be decoded as an image.
    #[error("'{file}': decode failed: {detail}")]
    DecodeFailed { file: String, detail: String },

    /// Batch export only: the converted image could not be written.
    #[error("'{file}': write failed: {detail}")]
    WriteFailed { file: String, detail: String },
}

impl EntryError {
    /// The file name of the entry this error belongs to.
    pub fn file(&self) -> &str {
        match self {
            EntryError::ReadFailed { file, .. }
            | EntryError::DecodeFailed { file, .. }
            | EntryError::WriteFailed { file, .. } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_entries_failed_display() {
        let e = Img2PdfError::AllEntriesFailed {
            total: 4,
            first_error: "'cover.png': decode failed: bad signature".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 4 images"), "got: {msg}");
        assert!(msg.contains("cover.png"));
    }

    #[test]
    fn no_images_found_names_the_source() {
        let e = Img2PdfError::NoImagesFound {
            path: PathBuf::from("/tmp/empty"),
        };
        assert!(e.to_string().contains("/tmp/empty"));
    }

    #[test]
    fn entry_error_carries_file_name() {
        let e = EntryError::DecodeFailed {
            file: "page_03.webp".into(),
            detail: "unexpected EOF".into(),
        };
        assert_eq!(e.file(), "page_03.webp");
        assert!(e.to_string().contains("page_03.webp"));
        assert!(e.to_string().contains("unexpected EOF"));
    }

    #[test]
    fn output_write_failed_preserves_source() {
        use std::error::Error as _;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = Img2PdfError::OutputWriteFailed {
            path: PathBuf::from("/root/out.pdf"),
            source: io,
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/root/out.pdf"));
    }
}
