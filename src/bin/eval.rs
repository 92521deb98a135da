//! Evaluation CLI binary for scoring chatbot responses.
//!
//! Usage:
//!   eval sample              # Run on built-in sample queries
//!   eval run <path>          # Run on a query file (.json or one query per line)
//!   eval test                # Test LLM connection
//!
//! Options:
//!   --max-queries <N>        # Limit number of queries
//!   --llm-responses          # Ask the model for responses instead of the template
//!   --verbose                # Verbose output
//!   --output <path>          # Save results to JSON file

use anyhow::{Context, Result};
use chunk_tagger::config::Config;
use chunk_tagger::eval::{
    AnyResponder, EvalConfig, EvalRunner, LlmResponder, LlmScorer, QuerySet, TemplateResponder,
    create_sample_queries,
};
use chunk_tagger::llm::LlmClient;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Score chatbot responses for relevance, correctness and helpfulness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of queries to evaluate
    #[arg(long, global = true)]
    max_queries: Option<usize>,

    /// Generate responses with the LLM instead of the placeholder template
    #[arg(long, global = true)]
    llm_responses: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Save results to JSON file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run on built-in sample queries (for quick testing)
    Sample,

    /// Run on a query file
    Run {
        /// Path to the query file
        path: PathBuf,
    },

    /// Test LLM connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    if let Commands::Test = cli.command {
        return cmd_test(config).await;
    }

    config.validate().context("Invalid configuration")?;

    println!("LLM API Base: {}", config.llm.api_base);
    println!("LLM Model: {}", config.llm.model);

    let queries = match &cli.command {
        Commands::Sample => {
            println!("Using sample queries...");
            create_sample_queries()
        }
        Commands::Run { path } => {
            println!("Loading queries from {:?}...", path);
            QuerySet::load(path)?
        }
        Commands::Test => unreachable!(),
    };

    println!("Query set: {} ({} queries)", queries.name, queries.len());

    let client = LlmClient::new(config.llm).context("Failed to build LLM client")?;
    let responder = if cli.llm_responses {
        AnyResponder::Llm(LlmResponder::new(client.clone()))
    } else {
        AnyResponder::Template(TemplateResponder::default())
    };

    let eval_config = EvalConfig {
        max_queries: cli.max_queries,
        verbose: cli.verbose,
    };

    let runner = EvalRunner::new(responder, LlmScorer::new(client), eval_config);
    let report = runner.run(&queries).await;

    report.print_summary();

    if let Some(output_path) = cli.output {
        report.save_json(&output_path)?;
        println!("Results saved to {:?}", output_path);
    }

    Ok(())
}

async fn cmd_test(config: Config) -> Result<()> {
    println!("Testing LLM connection...\n");

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", config.llm.model);
    let key_preview: String = config.llm.api_key.chars().take(8).collect();
    println!("  API Key:   {}...", key_preview);
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm).context("Failed to build LLM client")?;

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => println!("Connection successful!"),
        Err(e) => println!("Connection failed: {}", e),
    }

    Ok(())
}
