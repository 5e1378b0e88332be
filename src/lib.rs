//! # img2pdf
//!
//! Bundle a folder — or a `.zip`/`.cbz` archive — of images into a single
//! page-per-image PDF.
//!
//! ## Why this crate?
//!
//! Scanners, phone cameras, and comic archives all produce piles of numbered
//! image files. Plain alphabetical ordering puts `img10.png` before
//! `img2.png` and transparent PNGs turn into black rectangles in most quick
//! converters. This crate orders files the way a human reads them (digit
//! runs compare as integers), flattens transparency onto white, and writes
//! one clean PDF with one image per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source
//!  │
//!  ├─ 1. Input      directory passthrough, or archive staged to scratch
//!  ├─ 2. Discover   extension allow-list + natural sort (stable on ties)
//!  ├─ 3. Normalize  decode, composite transparency over white, opaque RGB
//!  └─ 4. Assemble   one page per image at a fixed DPI → PDF bytes
//! ```
//!
//! Bad files never abort a run: each failure is recorded with its file name
//! and cause, reported in the output, and skipped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2pdf::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().recursive(true).build()?;
//!     let stats = convert_to_file("./scans", "scans.pdf", &config).await?;
//!     eprintln!("{} pages, {} skipped", stats.processed_entries, stats.failed_entries);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! img2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ExportFormat};
pub use convert::{convert, convert_images, convert_sync, convert_to_file};
pub use error::{EntryError, Img2PdfError};
pub use output::{ConversionOutput, ConversionStats, EntryResult};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
