//! Plugins command - inspect the plugin registry.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use evcharge_core::store::render_csv;
use evcharge_core::ChargeParser;

/// Arguments for the plugins command.
#[derive(Args)]
pub struct PluginsArgs {
    #[command(subcommand)]
    command: PluginsCommand,
}

#[derive(Subcommand)]
enum PluginsCommand {
    /// List plugins in dispatch order
    List,

    /// Show which plugin claims a saved OCR text, and what it extracts
    Detect {
        /// File containing OCR output
        text_file: PathBuf,

        /// Parse with this plugin instead of detecting one
        #[arg(short, long)]
        plugin: Option<String>,
    },
}

pub async fn run(args: PluginsArgs) -> anyhow::Result<()> {
    let parser = ChargeParser::with_builtin_plugins();

    match args.command {
        PluginsCommand::List => list(&parser),
        PluginsCommand::Detect { text_file, plugin } => {
            detect(&parser, &text_file, plugin.as_deref())
        }
    }
}

fn list(parser: &ChargeParser) -> anyhow::Result<()> {
    println!("{}", style("Plugins (dispatch order):").bold());
    for plugin in parser.registry().all_ordered() {
        println!(
            "  {:<20} {:<20} priority {}",
            plugin.brand(),
            plugin.display_name(),
            plugin.priority()
        );
    }
    Ok(())
}

fn detect(parser: &ChargeParser, path: &Path, forced: Option<&str>) -> anyhow::Result<()> {
    let text = fs::read_to_string(path)?;

    let record = match forced {
        Some(name) => parser.parse_with(name, &text)?,
        None => {
            let Some(plugin) = parser.detect_plugin(&text) else {
                println!(
                    "{} No plugin recognised {}. Add one with `evcharge scaffold`.",
                    style("!").yellow(),
                    path.display()
                );
                return Ok(());
            };
            println!(
                "{} Matched {} ({})",
                style("✓").green(),
                plugin.display_name(),
                plugin.brand()
            );
            parser.parse_with(plugin.brand(), &text)?
        }
    };

    print!("{}", render_csv(std::slice::from_ref(&record))?);
    Ok(())
}
