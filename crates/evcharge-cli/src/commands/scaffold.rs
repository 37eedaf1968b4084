//! Scaffold command - generate a plugin skeleton from a sample screenshot.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use evcharge_core::scaffold::{
    extract_keywords, is_valid_brand, render_plugin_source, slug_to_type_name,
};
use evcharge_core::{OcrEngine, TesseractEngine};

use super::load_config;

/// Arguments for the scaffold command.
#[derive(Args)]
pub struct ScaffoldArgs {
    /// Slug-style brand (e.g. "electrify_america")
    brand: String,

    /// Representative screenshot to OCR
    screenshot: PathBuf,

    /// Human-friendly name (default: brand in title case)
    #[arg(short, long)]
    display_name: Option<String>,

    /// Output file (default: crates/evcharge-core/src/plugins/<brand>.rs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tesseract page segmentation mode
    #[arg(long)]
    psm: Option<String>,

    /// Maximum number of keywords seeded into detect()
    #[arg(long, default_value_t = 6)]
    keywords: usize,

    /// Overwrite an existing plugin file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ScaffoldArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if !is_valid_brand(&args.brand) {
        anyhow::bail!(
            "Invalid plugin brand: {:?}. Use lowercase letters, digits and underscores (e.g. \"charge_point\").",
            args.brand
        );
    }
    let type_name = slug_to_type_name(&args.brand);

    if !args.screenshot.exists() {
        anyhow::bail!("Screenshot not found: {}", args.screenshot.display());
    }

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from("crates/evcharge-core/src/plugins").join(format!("{}.rs", args.brand))
    });
    if output.exists() && !args.force {
        anyhow::bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    let config = load_config(config_path)?;
    let engine = TesseractEngine::from_config(&config.ocr);
    let psm = args.psm.unwrap_or(config.ocr.psm);
    let text = engine.recognize(&args.screenshot, &psm)?;

    let keywords = extract_keywords(&text, args.keywords);
    info!("Seeding detect() with keywords: {}", keywords.join(", "));

    let display_name = args.display_name.unwrap_or_else(|| type_name.clone());
    let source = render_plugin_source(&type_name, &args.brand, &display_name, &keywords);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, source)?;

    println!(
        "{} Generated plugin scaffold at {}",
        style("✓").green(),
        output.display()
    );
    println!();
    println!("Next steps:");
    println!("  1. Implement parse() using the helpers in evcharge_core::rules");
    println!("  2. Add `pub mod {};` to src/plugins/mod.rs", args.brand);
    println!(
        "  3. Register {}Plugin in PluginRegistry::with_builtin_plugins",
        type_name
    );

    Ok(())
}
