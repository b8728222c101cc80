//! CLI binary for pdf2fountain.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints or writes results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2fountain::pipeline::input::output_file_name;
use pdf2fountain::{
    classify_lines, clean_screenplay, extract, inspect, write_atomic, ExtractionConfig,
    ExtractionProgressCallback, ExtractionResult, PageSelection, ProgressCallback,
};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

fn bar_style(unit: &str) -> ProgressStyle {
    ProgressStyle::with_template(&format!(
        "{{spinner:.cyan}} {{prefix:.bold}}  [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {unit}  ⏱ {{elapsed_precise}}"
    ))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(TICKS)
}

// ── Page progress (single input) ─────────────────────────────────────────────

/// Renders a page bar while one document is extracted.
struct PageProgress {
    bar: ProgressBar,
}

impl PageProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for PageProgress {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(bar_style("pages"));
        self.bar.set_prefix("Extracting");
    }

    fn on_page_extracted(&self, page_num: usize, total_pages: usize, line_count: usize) {
        self.bar.set_message(dim(&format!(
            "page {page_num}/{total_pages}: {line_count} lines"
        )));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: String) {
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total_pages,
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, line_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages → {} lines",
            green("✔"),
            bold(&total_pages.to_string()),
            line_count
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a screenplay to stdout
  pdf2fountain script.pdf

  # Write to a file
  pdf2fountain script.pdf -o script.fountain

  # Batch: one .fountain per input, four documents at a time
  pdf2fountain --output-dir out/ --concurrency 4 drafts/*.pdf

  # Skip the title page and the last page
  pdf2fountain --pages 2-119 script.pdf

  # Clean text that was extracted by another tool (use - for stdin)
  pdftotext -layout script.pdf - | pdf2fountain --from-text -

  # Show how each output line was classified
  pdf2fountain --annotate script.pdf

  # Machine-readable result
  pdf2fountain --json script.pdf > result.json

  # Inspect PDF metadata only
  pdf2fountain --inspect-only script.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Log filter, overrides -v / -q
  PDF2FOUNTAIN_*    Every flag can also be set from the environment
"#;

/// Extract screenplay PDFs to Fountain text.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2fountain",
    version,
    about = "Extract screenplay PDFs to Fountain text",
    long_about = "Extract the text layer of screenplay PDFs (local files or URLs) and rebuild \
the screenplay structure: scene headings, character cues, parentheticals and dialogue. \
Page numbers, CONTINUED markers and title-page credits are removed.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the result to this file instead of stdout (single input only).
    #[arg(short, long, env = "PDF2FOUNTAIN_OUTPUT", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write `<name>.fountain` for every input into this directory.
    #[arg(long, env = "PDF2FOUNTAIN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Inputs are already extracted text files; only run the cleaner.
    #[arg(long, env = "PDF2FOUNTAIN_FROM_TEXT")]
    from_text: bool,

    /// Skip reconstruction and print the extracted lines as-is.
    #[arg(long, env = "PDF2FOUNTAIN_RAW")]
    raw: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2FOUNTAIN_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2FOUNTAIN_PASSWORD")]
    password: Option<String>,

    /// Max baseline difference (PDF points) for fragments on one line.
    #[arg(long, env = "PDF2FOUNTAIN_LINE_TOLERANCE", default_value_t = 2.0)]
    line_tolerance: f32,

    /// Number of documents processed at once.
    #[arg(short, long, env = "PDF2FOUNTAIN_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Output the structured JSON result instead of text.
    #[arg(long, env = "PDF2FOUNTAIN_JSON", conflicts_with = "annotate")]
    json: bool,

    /// Prefix every output line with its classification.
    #[arg(long, env = "PDF2FOUNTAIN_ANNOTATE")]
    annotate: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long, conflicts_with = "from_text")]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2FOUNTAIN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2FOUNTAIN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2FOUNTAIN_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2FOUNTAIN_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

/// One line of batch JSON output.
#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: &'a ExtractionResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would tear the progress bar; keep them off while it
    // is visible.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.from_text;
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

    let batch = cli.inputs.len() > 1;
    if batch && cli.output.is_some() {
        anyhow::bail!("--output takes a single input; use --output-dir for several");
    }
    if batch && cli.output_dir.is_none() && !cli.json && !cli.inspect_only {
        anyhow::bail!("Several inputs need --output-dir or --json");
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        for input in &cli.inputs {
            print_metadata(input, &config, cli.json).await?;
        }
        return Ok(());
    }

    // ── Extract ──────────────────────────────────────────────────────────
    let page_progress = if show_progress && !batch {
        Some(PageProgress::new() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, page_progress)?;

    let doc_bar = (show_progress && batch).then(|| {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(bar_style("documents"));
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let results: Vec<(&str, ExtractionResult)> = stream::iter(cli.inputs.iter())
        .map(|input| {
            let (cli, config, doc_bar) = (&cli, &config, doc_bar.as_ref());
            async move {
                let result = process_one(input, cli, config).await;
                if let Some(bar) = doc_bar {
                    bar.println(status_line(input, &result));
                    bar.inc(1);
                }
                (input.as_str(), result)
            }
        })
        .buffered(config.concurrency)
        .collect()
        .await;

    if let Some(bar) = doc_bar {
        bar.finish_and_clear();
    }

    // ── Emit ─────────────────────────────────────────────────────────────
    if batch && cli.json && cli.output_dir.is_none() {
        let reports: Vec<Report> = results
            .iter()
            .map(|(input, result)| Report {
                input: *input,
                result,
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to serialise results")?
        );
    } else {
        for (input, result) in &results {
            emit(input, result, &cli).await?;
        }
    }

    // ── Summary / exit status ────────────────────────────────────────────
    let failed = results.iter().filter(|(_, r)| !r.success).count();
    if failed > 0 {
        if !cli.json {
            for (input, result) in results.iter().filter(|(_, r)| !r.success) {
                eprintln!(
                    "{} {}: {}",
                    red("✘"),
                    input,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        anyhow::bail!("{failed} of {} inputs failed", results.len());
    }
    if batch && !cli.quiet {
        eprintln!(
            "{} {} documents extracted",
            green("✔"),
            bold(&results.len().to_string())
        );
    }

    Ok(())
}

/// Extract one input, or clean it directly with `--from-text`.
async fn process_one(input: &str, cli: &Cli, config: &ExtractionConfig) -> ExtractionResult {
    if !cli.from_text {
        return extract(input, config).await;
    }
    match read_text(input).await {
        Ok(raw) => {
            let pages = raw.matches('\u{000C}').count() + 1;
            let text = if cli.raw { raw } else { clean_screenplay(&raw) };
            ExtractionResult::ok(text, pages)
        }
        Err(e) => ExtractionResult::failure(format!("{e:#}")),
    }
}

async fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        return tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        })
        .await
        .context("stdin reader panicked")?
        .context("Failed to read stdin");
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read text file '{input}'"))
}

/// Render a successful result in the selected output format.
fn render(result: &ExtractionResult, cli: &Cli) -> Result<String> {
    if cli.json {
        return serde_json::to_string_pretty(result).context("Failed to serialise result");
    }
    if cli.annotate {
        return Ok(annotate(&result.text));
    }
    Ok(result.text.clone())
}

fn annotate(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    classify_lines(&lines)
        .iter()
        .zip(&lines)
        .map(|(kind, line)| format!("{:<13} | {}", kind.as_str(), line))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn emit(input: &str, result: &ExtractionResult, cli: &Cli) -> Result<()> {
    if !result.success && !cli.json {
        return Ok(());
    }
    let mut body = render(result, cli)?;
    if !body.ends_with('\n') {
        body.push('\n');
    }

    let target = match (&cli.output, &cli.output_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) if result.success => Some(dir.join(output_file_name(input))),
        (None, Some(_)) => None,
        (None, None) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(body.as_bytes())
                .context("Failed to write to stdout")?;
            return Ok(());
        }
    };

    if let Some(path) = target {
        write_output(&path, &body).await?;
        if !cli.quiet {
            eprintln!(
                "{}  {} pages  →  {}",
                green("✔"),
                result.page_count,
                bold(&path.display().to_string())
            );
        }
    }
    Ok(())
}

async fn write_output(path: &Path, body: &str) -> Result<()> {
    write_atomic(path, body)
        .await
        .with_context(|| format!("Failed to write {:?}", path))
}

fn status_line(input: &str, result: &ExtractionResult) -> String {
    if result.success {
        format!(
            "  {} {}  {}",
            green("✓"),
            input,
            dim(&format!("{} pages", result.page_count))
        )
    } else {
        format!(
            "  {} {}  {}",
            red("✗"),
            input,
            red(result.error.as_deref().unwrap_or("failed"))
        )
    }
}

async fn print_metadata(input: &str, config: &ExtractionConfig, json: bool) -> Result<()> {
    let meta = inspect(input, config)
        .await
        .with_context(|| format!("Failed to inspect '{input}'"))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
        );
        return Ok(());
    }

    println!("{}", cyan(&format!("File:         {}", input)));
    if let Some(ref t) = meta.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = meta.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = meta.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", meta.page_count);
    println!("PDF Version:  {}", meta.pdf_version);
    if let Some(ref d) = meta.creation_date {
        println!("Created:      {}", d);
    }
    if let Some(ref p) = meta.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = meta.creator {
        println!("Creator:      {}", c);
    }
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractionConfig::builder()
        .line_tolerance(cli.line_tolerance)
        .pages(pages)
        .reconstruct(!cli.raw)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }
        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }
        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }
    Ok(PageSelection::Single(page))
}
