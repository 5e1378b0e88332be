//! Output types: the run report returned by the `convert*` entry points.
//!
//! [`ConversionOutput`] carries the assembled PDF bytes plus a per-entry
//! record of everything the pipeline touched, in page order. The report side
//! serialises to JSON for the CLI's `--json` mode; the PDF payload itself is
//! skipped during serialisation so the report stays a report.

use crate::error::EntryError;
use serde::{Deserialize, Serialize};

/// The result of one image entry, success or failure.
///
/// Entries appear in sort order. Successful entries became exactly one page
/// each; `page` is that page's 1-indexed number. Failed entries carry the
/// error and `page: None` — they occupy no page and shift nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResult {
    /// 1-indexed page number in the output document, None if the entry failed.
    pub page: Option<usize>,

    /// Leaf file name of the source image.
    pub file_name: String,

    /// Pixel width of the normalized image (0 if the entry failed).
    pub width: u32,

    /// Pixel height of the normalized image (0 if the entry failed).
    pub height: u32,

    /// The failure, if this entry was skipped.
    pub error: Option<EntryError>,
}

/// Aggregate statistics for a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Eligible images discovered at the source.
    pub discovered_entries: usize,

    /// Entries successfully normalized (= pages in the document).
    pub processed_entries: usize,

    /// Entries that failed to load and were skipped.
    pub failed_entries: usize,

    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,

    /// Time spent decoding and normalizing images.
    pub normalize_duration_ms: u64,

    /// Time spent assembling and serialising the PDF.
    pub assemble_duration_ms: u64,

    /// Size of the produced PDF in bytes (0 in batch-export mode).
    pub output_bytes: u64,
}

/// Complete result of a conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled PDF document. Empty in batch-export mode.
    ///
    /// Not serialised — `--json` consumers want the report, and the document
    /// itself goes to its own file.
    #[serde(skip)]
    pub pdf: Vec<u8>,

    /// Per-entry outcomes in page order.
    pub entries: Vec<EntryResult>,

    /// Run statistics.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Entries that failed, in order.
    pub fn failures(&self) -> impl Iterator<Item = &EntryResult> {
        self.entries.iter().filter(|e| e.error.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_omits_pdf_payload() {
        let out = ConversionOutput {
            pdf: vec![1, 2, 3],
            entries: vec![EntryResult {
                page: Some(1),
                file_name: "a.png".into(),
                width: 8,
                height: 8,
                error: None,
            }],
            stats: ConversionStats {
                discovered_entries: 1,
                processed_entries: 1,
                ..Default::default()
            },
        };

        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("pdf"), "payload leaked into report: {json}");
        assert!(json.contains("a.png"));

        let back: ConversionOutput = serde_json::from_str(&json).unwrap();
        assert!(back.pdf.is_empty());
        assert_eq!(back.stats.processed_entries, 1);
    }

    #[test]
    fn failures_iterates_only_failed_entries() {
        let out = ConversionOutput {
            pdf: Vec::new(),
            entries: vec![
                EntryResult {
                    page: Some(1),
                    file_name: "ok.png".into(),
                    width: 4,
                    height: 4,
                    error: None,
                },
                EntryResult {
                    page: None,
                    file_name: "bad.png".into(),
                    width: 0,
                    height: 0,
                    error: Some(crate::error::EntryError::DecodeFailed {
                        file: "bad.png".into(),
                        detail: "truncated".into(),
                    }),
                },
            ],
            stats: ConversionStats::default(),
        };
        let failed: Vec<_> = out.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].file_name, "bad.png");
    }
}
