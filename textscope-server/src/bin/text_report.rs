//! text-report - word and letter statistics for a text file
//!
//! ```text
//! text-report books/frankenstein.txt
//! text-report notes.txt --full
//! ```
//!
//! With `--full` the complete analysis is printed as JSON after the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use textscope_nlp::stats::{character_frequencies, count_words};
use textscope_nlp::{AnalysisOptions, Toolkit};

#[derive(Parser, Debug)]
#[command(name = "text-report")]
#[command(about = "Word count and letter frequencies of a text file")]
#[command(version)]
struct Args {
    /// Path to text file
    path: PathBuf,

    /// Also run the full analysis and print it as JSON
    #[arg(long)]
    full: bool,

    /// Directory overriding the embedded language resources
    #[arg(long, env = "TEXTSCOPE_RESOURCE_DIR")]
    resource_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    println!("--- Begin report of {} ---", args.path.display());
    println!("{} words found in the document\n", count_words(&text));

    for (ch, count) in character_frequencies(&text) {
        println!("The '{}' character was found {} times", ch, count);
    }

    println!("\n--- End report ---");

    if args.full {
        let toolkit = Toolkit::load(args.resource_dir.as_deref())
            .context("Failed to load NLP resources")?;
        let analysis = toolkit
            .analyze(&text, &AnalysisOptions::default())
            .context("Analysis failed")?;
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }

    Ok(())
}
