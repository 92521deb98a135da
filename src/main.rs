//! Chunk Tagger CLI
//!
//! Scrape a page, chunk and clean its text, and tag chunks by keyword category.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chunk_tagger::{
    cleaner::{clean, filter_short},
    config::Config,
    document::RawDocument,
    fetch::Fetcher,
    persistence::{
        DEFAULT_RECORDS_PATH, load_records, records_exist, records_size, save_records,
    },
    pipeline::ScrapePipeline,
    splitter::RecursiveSplitter,
    tagger::{MatchMode, Tagger},
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Chunk Tagger - scrape, clean and keyword-tag event listings
#[derive(Parser)]
#[command(name = "chunk-tagger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// URL of the page to fetch
    #[arg(long)]
    url: Option<String>,

    /// Local HTML or text file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full scrape-and-tag pipeline
    Run {
        #[command(flatten)]
        input: Input,

        /// Output path (.jsonl, .json or .bin)
        #[arg(short, long, default_value = DEFAULT_RECORDS_PATH)]
        output: PathBuf,

        /// Source written into record metadata
        #[arg(long)]
        source: Option<String>,

        /// Scrape date written into record metadata (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Drop chunks with this many words or fewer
        #[arg(long)]
        min_words: Option<usize>,

        /// Match keywords on word boundaries only
        #[arg(long)]
        strict: bool,
    },

    /// Print the cleaned chunks of a local file
    Clean {
        /// Path to the document file
        file: PathBuf,

        /// Keep chunks regardless of length
        #[arg(long)]
        all: bool,
    },

    /// Tag a piece of text
    Tag {
        /// The text to tag
        text: String,

        /// Match keywords on word boundaries only
        #[arg(long)]
        strict: bool,
    },

    /// List the configured categories and keywords
    Categories,

    /// Display records from an output file
    Show {
        /// Path to the records file
        #[arg(default_value = DEFAULT_RECORDS_PATH)]
        records: PathBuf,

        /// Output as JSON instead of a preview list
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            source,
            date,
            min_words,
            strict,
        } => cmd_run(input, output, source, date, min_words, strict).await,
        Commands::Clean { file, all } => cmd_clean(file, all),
        Commands::Tag { text, strict } => cmd_tag(text, strict),
        Commands::Categories => cmd_categories(),
        Commands::Show { records, json } => cmd_show(records, json),
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate_scrape().context("Invalid configuration")?;
    Ok(config)
}

async fn cmd_run(
    input: Input,
    output: PathBuf,
    source: Option<String>,
    date: Option<NaiveDate>,
    min_words: Option<usize>,
    strict: bool,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(n) = min_words {
        config.scrape.min_words = n;
    }
    if strict {
        config.scrape.match_mode = MatchMode::WordBoundary;
    }

    let start = Instant::now();

    let document = match (input.url, input.file) {
        (Some(url), _) => {
            println!("Fetching: {}", url);
            let fetcher = Fetcher::new(
                Duration::from_secs(config.scrape.timeout_secs),
                config.scrape.max_body_bytes,
            )?;
            fetcher.fetch(&url).await.context("Failed to fetch page")?
        }
        (None, Some(path)) => {
            println!("Reading: {}", path.display());
            RawDocument::from_file(&path).context("Failed to load document")?
        }
        (None, None) => anyhow::bail!("either --url or --file is required"),
    };

    println!(
        "  Document: {} ({} chars, {})",
        document.source,
        document.content.chars().count(),
        if document.is_html() { "html" } else { "text" }
    );

    let mut pipeline = ScrapePipeline::new(config.scrape, config.categories)
        .context("Failed to build pipeline")?;
    if let Some(source) = source {
        pipeline = pipeline.with_source(source);
    }
    if let Some(date) = date {
        pipeline = pipeline.with_scraped_date(date);
    }

    let result = pipeline.run(&document);

    println!("\nPipeline finished:");
    println!("  Chunks:      {}", result.stats.raw_chunks);
    println!("  Kept:        {}", result.stats.kept_chunks);
    println!("  Match mode:  {}", pipeline.tagger().mode());
    println!("  Time:        {:.2?}", start.elapsed());
    println!("  Tags:");
    for (tag, count) in &result.stats.tag_counts {
        println!("    {:<14} {}", tag, count);
    }

    save_records(&result.records, &output).context("Failed to save records")?;

    let size = records_size(&output)?;
    println!("\nRecords saved to: {}", output.display());
    println!("  File size: {:.1} KB", size as f64 / 1024.0);

    Ok(())
}

fn cmd_clean(file: PathBuf, all: bool) -> Result<()> {
    let config = load_config()?;
    let document = RawDocument::from_file(&file).context("Failed to load document")?;

    let splitter = RecursiveSplitter::new(config.scrape.splitter)?;
    let cleaned: Vec<String> = splitter
        .split(&document.text())
        .iter()
        .map(|c| clean(c))
        .collect();

    let chunks = if all {
        cleaned
    } else {
        filter_short(cleaned, config.scrape.min_words)
    };

    for (i, chunk) in chunks.iter().enumerate() {
        println!("\n--- Cleaned Chunk {} ---\n{}", i + 1, chunk);
    }
    println!("\n{} chunks", chunks.len());

    Ok(())
}

fn cmd_tag(text: String, strict: bool) -> Result<()> {
    let config = load_config()?;
    let mode = if strict {
        MatchMode::WordBoundary
    } else {
        config.scrape.match_mode
    };

    let tagger = Tagger::new(config.categories, mode);
    let tags: Vec<String> = tagger.tag(&text).into_iter().collect();
    println!("{}", tags.join(", "));

    Ok(())
}

fn cmd_categories() -> Result<()> {
    let config = load_config()?;

    println!("Categories ({})", config.categories.len());
    println!("{}", "─".repeat(40));
    for (name, keywords) in config.categories.iter() {
        println!("  {:<10} {}", name, keywords.join(", "));
    }

    if let Some(path) = Config::config_file_path() {
        println!("\nConfig file: {}", path.display());
    }

    Ok(())
}

fn cmd_show(records_path: PathBuf, json: bool) -> Result<()> {
    if !records_exist(&records_path) {
        anyhow::bail!(
            "Records not found at '{}'. Run 'run' command first.",
            records_path.display()
        );
    }

    let records = load_records(&records_path).context("Failed to load records")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (i, record) in records.iter().enumerate() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        println!("\n--- Tagged Chunk {} ---", i + 1);
        println!("Tags: {}", tags.join(", "));
        println!("Source: {} ({})", record.metadata.source, record.metadata.scraped_date);
        println!("Content: {}", record.preview(300));
    }
    println!("\n{} records", records.len());

    Ok(())
}
