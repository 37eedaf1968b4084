//! Process command - OCR screenshots and merge the sessions into a CSV.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use evcharge_core::store::{read_records, write_records};
use evcharge_core::{
    merge_with_stats, BatchProcessor, BatchReport, ChargeParser, ImageOutcome, OcrEngine,
    TesseractEngine,
};

use super::{load_config, sources};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Screenshot files, directories, or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// CSV file to write (default from config, else charges.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tesseract page segmentation mode
    #[arg(long)]
    psm: Option<String>,

    /// Merge into the existing CSV instead of overwriting it (with --format
    /// json, print the merged records and leave the CSV untouched)
    #[arg(long)]
    append: bool,

    /// Only print the OCR text of each image
    #[arg(long)]
    text_only: bool,

    /// Parse every image with this plugin instead of detecting one
    #[arg(short, long)]
    plugin: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Write rows to the CSV file
    Csv,
    /// Print records as JSON on stdout; no file is written
    Json,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let images = sources::collect_images(&args.inputs, &config.discovery)?;
    if images.is_empty() {
        anyhow::bail!("No images found in: {}", args.inputs.join(", "));
    }

    let engine = TesseractEngine::from_config(&config.ocr);
    let psm = args.psm.clone().unwrap_or_else(|| config.ocr.psm.clone());

    if args.text_only {
        return print_text(&engine, &images, &psm);
    }

    eprintln!(
        "{} Found {} images to process",
        style("ℹ").blue(),
        images.len()
    );

    let parser = ChargeParser::with_builtin_plugins();
    let mut processor = BatchProcessor::new(&parser, &engine, psm);
    if let Some(name) = &args.plugin {
        processor = processor.with_plugin(name)?;
    }

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let report = processor.process_with(&images, |path, _| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().to_string());
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    print_summary(&report);

    if report.records.is_empty() {
        anyhow::bail!("No rows were produced; nothing written.");
    }

    let output = args.output.unwrap_or(config.output.path);
    let append = args.append || config.output.append;

    // JSON shows the same merged view the CSV would hold, without writing it
    let existing = if append {
        read_records(&output)?
    } else {
        Vec::new()
    };
    debug!("Merging into {} existing records", existing.len());
    let outcome = merge_with_stats(existing, report.records);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.records)?);
            eprintln!(
                "{} Printed {} records ({} new, {} replaced) in {:?}",
                style("✓").green(),
                outcome.records.len(),
                outcome.added,
                outcome.replaced,
                start.elapsed()
            );
        }
        OutputFormat::Csv => {
            write_records(&output, &outcome.records)?;
            eprintln!(
                "{} Wrote {} rows to {} ({} new, {} replaced) in {:?}",
                style("✓").green(),
                outcome.records.len(),
                output.display(),
                outcome.added,
                outcome.replaced,
                start.elapsed()
            );
        }
    }

    Ok(())
}

fn print_text<E: OcrEngine>(engine: &E, images: &[PathBuf], psm: &str) -> anyhow::Result<()> {
    let mut failures = 0usize;
    for path in images {
        println!("{}", style(format!("==> {} <==", path.display())).bold());
        match engine.recognize(path, psm) {
            Ok(text) => println!("{}", text.trim_end()),
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
        println!();
    }

    if failures == images.len() {
        anyhow::bail!("OCR failed for every image");
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    eprintln!(
        "   {} parsed, {} unmatched, {} failed",
        style(report.parsed()).green(),
        style(report.unmatched()).yellow(),
        style(report.failed()).red()
    );

    let problems: Vec<_> = report
        .outcomes
        .iter()
        .filter(|(_, o)| !matches!(o, ImageOutcome::Parsed { .. }))
        .collect();
    if problems.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("{}", style("Skipped images:").yellow());
    for (path, outcome) in problems {
        let reason = match outcome {
            ImageOutcome::Failed(message) => message.as_str(),
            _ => "no plugin recognised the text",
        };
        eprintln!("  - {}: {}", path.display(), reason);
    }
}
