//! CLI binary for img2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use img2pdf::{
    convert_images, convert_to_file, ConversionConfig, ConversionProgressCallback, ExportFormat,
    Img2PdfError, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and a per-image
/// log line using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-entry wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of entries that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_conversion_start` (called once discovery has counted files).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Listing images…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_entries: usize) {
        self.activate_bar(total_entries);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_entries} image(s)…"))
        ));
    }

    fn on_entry_start(&self, entry_num: usize, _total: usize, file_name: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(entry_num, Instant::now());
        self.bar.set_message(file_name.to_string());
    }

    fn on_entry_complete(&self, entry_num: usize, total: usize, width: u32, height: u32) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&entry_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<14}  {}",
            green("✓"),
            entry_num,
            total,
            dim(&format!("{width}x{height} px")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_entry_error(&self, entry_num: usize, total: usize, error: String) {
        self.start_times.lock().unwrap().remove(&entry_num);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            red("✗"),
            entry_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_entries: usize, success_count: usize) {
        let failed = total_entries.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} image(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} image(s) converted  ({} skipped)",
                if failed == total_entries {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_entries,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bundle a folder of images into output.pdf
  img2pdf ./scans

  # Choose the destination and include subdirectories
  img2pdf ./scans -o scans.pdf --recursive

  # Archives are staged automatically (.zip / .cbz)
  img2pdf chapter_01.cbz -o chapter_01.pdf

  # Higher print resolution, custom document title
  img2pdf ./scans -o scans.pdf --dpi 150 --title "Holiday scans"

  # Batch mode: convert every image to PNG instead of building a PDF
  img2pdf ./webp_downloads --export-format png --out-dir ./converted

  # Structured report on stdout
  img2pdf ./scans -o scans.pdf --json > report.json

RECOGNISED INPUT FORMATS:
  .png  .jpg  .jpeg  .webp   (case-insensitive; anything else is skipped)

ORDERING:
  Files are ordered naturally: img2.png comes before img10.png. Digit runs
  compare as integers, everything else compares case-insensitively.

FAILURE POLICY:
  A file that fails to decode is reported and skipped; the remaining images
  still become a document. The run only fails when nothing could be loaded.
"#;

/// Bundle folders or archives of images into a single page-per-image PDF.
#[derive(Parser, Debug)]
#[command(
    name = "img2pdf",
    version,
    about = "Bundle folders or archives of images into a single page-per-image PDF",
    long_about = "Collect every PNG, JPEG, and WEBP under a folder (or inside a .zip/.cbz \
archive), order them naturally (img2 before img10), flatten transparency onto white, and \
write one PDF with one image per page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source directory, or a .zip/.cbz archive.
    source: PathBuf,

    /// Destination PDF path.
    #[arg(short, long, env = "IMG2PDF_OUTPUT", default_value = "output.pdf")]
    output: PathBuf,

    /// Descend into subdirectories of a directory source.
    #[arg(short, long, env = "IMG2PDF_RECURSIVE")]
    recursive: bool,

    /// Page resolution in DPI (72–400).
    #[arg(long, env = "IMG2PDF_DPI", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Document title for the PDF metadata (defaults to the output file stem).
    #[arg(long, env = "IMG2PDF_TITLE")]
    title: Option<String>,

    /// Batch mode: convert each image to this format instead of building a PDF.
    #[arg(long, env = "IMG2PDF_EXPORT_FORMAT", value_enum)]
    export_format: Option<ExportFormatArg>,

    /// Output directory for batch mode (created if missing).
    #[arg(long, env = "IMG2PDF_OUT_DIR", requires = "export_format")]
    out_dir: Option<PathBuf>,

    /// Output the run report as JSON on stdout.
    #[arg(long, env = "IMG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExportFormatArg {
    Jpeg,
    Png,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(v: ExportFormatArg) -> Self {
        match v {
            ExportFormatArg::Jpeg => ExportFormat::Jpeg,
            ExportFormatArg::Png => ExportFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let mut builder = ConversionConfig::builder()
        .recursive(cli.recursive)
        .dpi(cli.dpi);
    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Batch export mode ────────────────────────────────────────────────
    if let Some(format) = cli.export_format {
        let out_dir = cli
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("converted"));

        let output = match convert_images(&cli.source, &out_dir, format.into(), &config).await {
            Ok(output) => output,
            Err(Img2PdfError::NoImagesFound { path }) => {
                eprintln!(
                    "{} No PNG, JPEG, or WEBP images were found in '{}'.",
                    yellow("⚠"),
                    path.display()
                );
                return Ok(());
            }
            Err(e) => return Err(e).context("Export failed"),
        };

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if !cli.quiet {
            eprintln!(
                "{}  {}/{} image(s)  {}ms  →  {}",
                if output.stats.failed_entries == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.stats.processed_entries,
                output.stats.discovered_entries,
                output.stats.total_duration_ms,
                bold(&out_dir.display().to_string()),
            );
        }
        return Ok(());
    }

    // ── PDF mode ─────────────────────────────────────────────────────────
    let stats = match convert_to_file(&cli.source, &cli.output, &config).await {
        Ok(stats) => stats,
        Err(Img2PdfError::NoImagesFound { path }) => {
            // Found nothing eligible: a user-facing warning, not a failure.
            eprintln!(
                "{} No PNG, JPEG, or WEBP images were found in '{}'. Nothing was written.",
                yellow("⚠"),
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Conversion failed"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {}/{} page(s)  {}ms  →  {}",
            if stats.failed_entries == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.processed_entries,
            stats.discovered_entries,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        if stats.failed_entries > 0 {
            eprintln!(
                "   {} image(s) failed to load — see the log above",
                red(&stats.failed_entries.to_string())
            );
        }
    }

    Ok(())
}
