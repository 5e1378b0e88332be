//! Conversion entry points.
//!
//! ## Why `spawn_blocking`?
//!
//! Decoding and compositing images is CPU-bound, and the pipeline holds
//! every normalized page in memory until assembly (there is no incremental
//! page writing). `tokio::task::spawn_blocking` moves that work onto a
//! dedicated blocking thread so async callers stay responsive, while the
//! pipeline body itself stays strictly sequential — entries are processed
//! one at a time in sort order, so page order always equals sort order.
//!
//! Per-entry failures never abort the run: a bad file is recorded, reported
//! through the progress callback, and skipped. Only "nothing found" and
//! "nothing survived" are fatal, as distinct errors.

use crate::config::{ConversionConfig, ExportFormat};
use crate::error::{EntryError, Img2PdfError};
use crate::output::{ConversionOutput, ConversionStats, EntryResult};
use crate::pipeline::{assemble, discover, input, normalize};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a directory or archive of images into a single PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `source` — Directory path, or a `.zip`/`.cbz` archive to stage
/// * `config` — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some images failed
/// (check `output.stats.failed_entries`).
///
/// # Errors
/// Returns `Err(Img2PdfError)` only for run-fatal conditions:
/// - Source missing, unreadable, or not a directory/archive
/// - No eligible images found ([`Img2PdfError::NoImagesFound`])
/// - Every image failed to load ([`Img2PdfError::AllEntriesFailed`])
pub async fn convert(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let source = source.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_blocking(&source, &config))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Conversion task panicked: {e}")))?
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Img2PdfError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(source, config))
}

/// Convert and write the PDF directly to a file.
///
/// Uses atomic write (temp file + rename) so the destination is either the
/// complete document or untouched. The destination's parent directory must
/// already exist — creating it is the caller's responsibility.
pub async fn convert_to_file(
    source: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Img2PdfError> {
    let path = output_path.as_ref();

    // Default the document title to the destination file stem.
    let mut config = config.clone();
    if config.title.is_none() {
        config.title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty());
    }

    let output = convert(source, &config).await?;

    let tmp_path = temp_output_path(path);
    tokio::fs::write(&tmp_path, &output.pdf)
        .await
        .map_err(|e| Img2PdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Img2PdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("wrote {} bytes to {}", output.stats.output_bytes, path.display());
    Ok(output.stats)
}

/// Batch export: convert each discovered image to `format` in `out_dir`.
///
/// The simpler converter variant — each source file becomes
/// `<stem>.<ext>` in `out_dir` (created if missing), converted directly to
/// RGB with no transparency compositing. Per-file failures are recorded and
/// skipped exactly like the PDF pipeline.
pub async fn convert_images(
    source: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    format: ExportFormat,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let source = source.as_ref().to_path_buf();
    let out_dir = out_dir.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || export_blocking(&source, &out_dir, format, &config))
        .await
        .map_err(|e| Img2PdfError::Internal(format!("Export task panicked: {e}")))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Blocking implementation of the PDF pipeline.
fn convert_blocking(
    source: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", source.display());

    // ── Step 1: Resolve source (stages archives into scratch space) ──────
    let resolved = input::resolve_source(source)?;
    let recursive = config.recursive || resolved.forces_recursion();

    // ── Step 2: Discover and sort entries ────────────────────────────────
    let entries = discover::discover(resolved.path(), recursive)?;
    if entries.is_empty() {
        return Err(Img2PdfError::NoImagesFound {
            path: source.to_path_buf(),
        });
    }
    let total = entries.len();
    debug!("Selected {} image(s) for conversion", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    // ── Step 3: Normalize sequentially, skipping failures ────────────────
    let normalize_start = Instant::now();
    let mut images: Vec<RgbImage> = Vec::with_capacity(total);
    let mut results: Vec<EntryResult> = Vec::with_capacity(total);

    for (idx, entry) in entries.iter().enumerate() {
        let entry_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_entry_start(entry_num, total, &entry.file_name);
        }

        match normalize::normalize(entry) {
            Ok(img) => {
                let (w, h) = (img.width(), img.height());
                info!("Loaded image: {}", entry.file_name);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_entry_complete(entry_num, total, w, h);
                }
                images.push(img);
                results.push(EntryResult {
                    page: Some(images.len()),
                    file_name: entry.file_name.clone(),
                    width: w,
                    height: h,
                    error: None,
                });
            }
            Err(e) => {
                warn!("Error loading {}: {}", entry.file_name, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_entry_error(entry_num, total, e.to_string());
                }
                results.push(EntryResult {
                    page: None,
                    file_name: entry.file_name.clone(),
                    width: 0,
                    height: 0,
                    error: Some(e),
                });
            }
        }
    }
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;

    let processed = images.len();
    let failed = total - processed;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, processed);
    }

    if processed == 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Img2PdfError::AllEntriesFailed { total, first_error });
    }

    // ── Step 4: Assemble the document ────────────────────────────────────
    let assemble_start = Instant::now();
    let title = config.title.as_deref().unwrap_or("Images");
    let pdf = assemble::assemble(images, config.dpi, title)?;
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        discovered_entries: total,
        processed_entries: processed,
        failed_entries: failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        normalize_duration_ms,
        assemble_duration_ms,
        output_bytes: pdf.len() as u64,
    };

    info!(
        "Conversion complete: {}/{} page(s), {} bytes, {}ms total",
        processed, total, stats.output_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        pdf,
        entries: results,
        stats,
    })
}

/// Blocking implementation of the batch export variant.
fn export_blocking(
    source: &Path,
    out_dir: &Path,
    format: ExportFormat,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Img2PdfError> {
    let total_start = Instant::now();
    info!(
        "Starting export to {:?}: {} → {}",
        format,
        source.display(),
        out_dir.display()
    );

    let resolved = input::resolve_source(source)?;
    let recursive = config.recursive || resolved.forces_recursion();

    let entries = discover::discover(resolved.path(), recursive)?;
    if entries.is_empty() {
        return Err(Img2PdfError::NoImagesFound {
            path: source.to_path_buf(),
        });
    }
    let total = entries.len();

    // The reference creates the output folder for this variant.
    std::fs::create_dir_all(out_dir).map_err(|e| Img2PdfError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let normalize_start = Instant::now();
    let mut results: Vec<EntryResult> = Vec::with_capacity(total);
    let mut processed = 0usize;

    for (idx, entry) in entries.iter().enumerate() {
        let entry_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_entry_start(entry_num, total, &entry.file_name);
        }

        match export_one(entry, out_dir, format) {
            Ok((w, h)) => {
                processed += 1;
                info!("Converted {}", entry.file_name);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_entry_complete(entry_num, total, w, h);
                }
                results.push(EntryResult {
                    page: Some(processed),
                    file_name: entry.file_name.clone(),
                    width: w,
                    height: h,
                    error: None,
                });
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", entry.file_name, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_entry_error(entry_num, total, e.to_string());
                }
                results.push(EntryResult {
                    page: None,
                    file_name: entry.file_name.clone(),
                    width: 0,
                    height: 0,
                    error: Some(e),
                });
            }
        }
    }
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total, processed);
    }

    if processed == 0 {
        let first_error = results
            .iter()
            .find_map(|r| r.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Img2PdfError::AllEntriesFailed { total, first_error });
    }

    let stats = ConversionStats {
        discovered_entries: total,
        processed_entries: processed,
        failed_entries: total - processed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        normalize_duration_ms,
        assemble_duration_ms: 0,
        output_bytes: 0,
    };

    info!(
        "Export complete: {}/{} image(s), {}ms total",
        processed, total, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        pdf: Vec::new(),
        entries: results,
        stats,
    })
}

/// Convert a single entry for the batch export: direct RGB, no compositing.
fn export_one(
    entry: &discover::ImageEntry,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<(u32, u32), EntryError> {
    let rgb = normalize::decode(entry)?.into_rgb8();
    let (w, h) = (rgb.width(), rgb.height());

    let stem = entry
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.file_name.clone());
    let dest = out_dir.join(format!("{}.{}", stem, format.extension()));

    rgb.save_with_format(&dest, format.image_format())
        .map_err(|e| EntryError::WriteFailed {
            file: entry.file_name.clone(),
            detail: e.to_string(),
        })?;

    Ok((w, h))
}

/// Scratch sibling for the atomic write: `<dest>.pdf.tmp`.
fn temp_output_path(path: &Path) -> PathBuf {
    path.with_extension("pdf.tmp")
}
