//! Progress-callback trait for per-entry conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through each image.
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log, or a GUI without the
//! library knowing anything about how the host application communicates. The
//! trait is `Send + Sync` because the pipeline body runs on a blocking worker
//! thread, not the caller's.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each image entry.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Entries are processed sequentially in page order,
/// so events for entry N+1 never arrive before entry N has completed or
/// failed.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after discovery, before any image is decoded.
    ///
    /// # Arguments
    /// * `total_entries` — number of eligible images that will be processed
    fn on_conversion_start(&self, total_entries: usize) {
        let _ = total_entries;
    }

    /// Called just before an image is decoded.
    ///
    /// # Arguments
    /// * `entry_num` — 1-indexed position in sort order
    /// * `total`     — total eligible entries
    /// * `file_name` — leaf file name of the entry
    fn on_entry_start(&self, entry_num: usize, total: usize, file_name: &str) {
        let _ = (entry_num, total, file_name);
    }

    /// Called when an image was decoded and normalized successfully.
    ///
    /// # Arguments
    /// * `entry_num` — 1-indexed position in sort order
    /// * `total`     — total eligible entries
    /// * `width`/`height` — pixel dimensions of the normalized image
    fn on_entry_complete(&self, entry_num: usize, total: usize, width: u32, height: u32) {
        let _ = (entry_num, total, width, height);
    }

    /// Called when an entry failed and was skipped.
    ///
    /// # Arguments
    /// * `entry_num` — 1-indexed position in sort order
    /// * `total`     — total eligible entries
    /// * `error`     — human-readable error description
    fn on_entry_error(&self, entry_num: usize, total: usize, error: String) {
        let _ = (entry_num, total, error);
    }

    /// Called once after all entries have been attempted, before assembly.
    ///
    /// # Arguments
    /// * `total_entries` — total eligible entries
    /// * `success_count` — entries that became pages
    fn on_conversion_complete(&self, total_entries: usize, success_count: usize) {
        let _ = (total_entries, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
