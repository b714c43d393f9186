//! txt2epub - plain-text novel to EPUB converter

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use txt2epub::{EmptyVolumePolicy, EpubConfig, read_txt};

#[derive(Parser)]
#[command(name = "txt2epub")]
#[command(version, about = "Convert a plain-text novel into an EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    txt2epub input.txt output.epub          Convert a manuscript
    txt2epub -i input.txt                   Show parsed metadata and structure
    RUST_LOG=txt2epub=debug txt2epub a.txt a.epub")]
struct Cli {
    /// Input manuscript (UTF-8 text)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output EPUB file
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<String>,

    /// Show parsed metadata and structure without converting
    #[arg(short, long)]
    info: bool,

    /// Value of dc:language
    #[arg(long, default_value = "zh-CN")]
    language: String,

    /// Book identifier (default: derived from title and author)
    #[arg(long)]
    identifier: Option<String>,

    /// Publication date, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Keep the unpacked EPUB tree in this (empty or new) directory
    #[arg(long, value_name = "DIR")]
    work_dir: Option<String>,

    /// Leave volumes without chapters out of the table of contents
    /// instead of generating a title page for them
    #[arg(long)]
    skip_empty_volumes: bool,

    /// Deflate level for archive entries (0-9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression_level: Option<u32>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        let output = cli.output.clone().unwrap_or_default();
        convert(&cli, &output)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "txt2epub=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn show_info(path: &str) -> txt2epub::Result<()> {
    let book = read_txt(path)?;

    let meta = &book.metadata;
    println!("File: {path}");
    println!("Title: {}", meta.title);
    println!("Author: {}", meta.author);
    if !meta.description.is_empty() {
        println!("Description: {}", meta.description);
    }
    println!("Volumes: {}", book.volumes.len());
    println!("Chapters: {}", book.chapter_count());
    for volume in &book.volumes {
        println!("  {} ({} chapters)", volume.title, volume.chapters.len());
    }

    Ok(())
}

fn convert(cli: &Cli, output: &str) -> txt2epub::Result<()> {
    let mut config = EpubConfig::default().with_language(&cli.language);
    if let Some(identifier) = &cli.identifier {
        config = config.with_identifier(identifier);
    }
    if let Some(date) = cli.date {
        config = config.with_date(date);
    }
    if let Some(dir) = &cli.work_dir {
        config = config.with_work_dir(dir);
    }
    if cli.skip_empty_volumes {
        config = config.with_empty_volumes(EmptyVolumePolicy::Skip);
    }
    if let Some(level) = cli.compression_level {
        config = config.with_compression_level(level);
    }

    txt2epub::convert_with_config(&cli.input, output, &config)?;

    if !cli.quiet {
        println!("EPUB generated: {output}");
    }
    Ok(())
}
