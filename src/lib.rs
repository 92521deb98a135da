//! Chunk Tagger - scrape, chunk, clean and keyword-tag event listings.
//!
//! # Overview
//!
//! The scrape-and-tag pipeline turns one raw page into a list of tagged
//! records:
//! 1. Extract visible text, one element per line
//! 2. Split it into bounded, overlapping chunks
//! 3. Clean each chunk: strip `H2:`/`P:`/`LI:`/`URL:` labels, drop trivial
//!    and repeated lines, flatten to one paragraph
//! 4. Drop chunks of 20 words or fewer
//! 5. Tag each chunk with every keyword category it mentions
//!
//! The evaluator is a separate, thin pipeline: it answers a list of queries
//! and has an LLM score each answer for relevance, correctness and
//! helpfulness.
//!
//! # Quick Start
//!
//! ```no_run
//! use chunk_tagger::{
//!     config::Config,
//!     document::RawDocument,
//!     pipeline::ScrapePipeline,
//!     persistence::save_records,
//! };
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate_scrape()?;
//!
//!     let document = RawDocument::from_file(Path::new("output.txt"))?;
//!
//!     let pipeline = ScrapePipeline::new(config.scrape, config.categories)?;
//!     let output = pipeline.run(&document);
//!
//!     save_records(&output.records, Path::new("tagged_chunks.jsonl"))?;
//!
//!     for record in &output.records {
//!         println!("{:?}: {}", record.tags, record.preview(80));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **cleaner**: `clean` and `filter_short`, the line-level chunk cleanup
//! - **tagger**: `CategoryTable` and keyword `tag`ging
//! - **splitter**: recursive separator-aware chunking
//! - **document** / **fetch**: raw input and text extraction
//! - **pipeline**: the end-to-end scrape-and-tag run
//! - **eval**: response scoring call-through

pub mod cleaner;
pub mod config;
pub mod document;
pub mod error;
pub mod eval;
pub mod fetch;
pub mod llm;
pub mod persistence;
pub mod pipeline;
pub mod record;
pub mod splitter;
pub mod tagger;

// Re-export commonly used types
pub use cleaner::{clean, filter_short};
pub use config::Config;
pub use document::RawDocument;
pub use error::{Result, TaggerError};
pub use llm::LlmClient;
pub use persistence::{load_records, save_records};
pub use pipeline::ScrapePipeline;
pub use record::TaggedChunk;
pub use splitter::RecursiveSplitter;
pub use tagger::{CategoryTable, MatchMode, Tagger, UNCATEGORIZED, tag};
