//! doc2md - Google Docs HTML to Markdown converter

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use doc2md::{Result, convert};

#[derive(Parser)]
#[command(name = "doc2md")]
#[command(version, about = "Convert exported Google Docs HTML to clean Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    doc2md export.html article.md       Convert an export to Markdown
    doc2md -v export.html article.md    Show pipeline progress
    doc2md --no-pandoc export.html cleaned.html
                                        Emit normalized HTML for debugging")]
struct Cli {
    /// Exported Google Docs HTML file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (Markdown, or HTML with --no-pandoc)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Write cleaned HTML instead of Markdown (primarily for debugging)
    #[arg(long)]
    no_pandoc: bool,

    /// Skip the mdformat reformatting pass. Does nothing with --no-pandoc.
    #[arg(long)]
    no_format: bool,

    /// Increase the amount of output describing the conversion; repeat for
    /// even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let html = fs::read_to_string(&cli.input)?;
    let cleaned = doc2md::clean_html(&html)?;

    if cli.no_pandoc {
        fs::write(&cli.output, cleaned)?;
        return Ok(());
    }

    convert::html_to_markdown(&cleaned, &cli.output)?;
    if !cli.no_format {
        convert::reformat_markdown(&cli.output)?;
    }
    Ok(())
}
