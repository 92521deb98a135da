//! The scrape-and-tag pipeline.
//!
//! extract text -> split -> clean -> drop short chunks -> tag -> attach metadata

use crate::cleaner::{clean, filter_short};
use crate::config::ScrapeConfig;
use crate::document::RawDocument;
use crate::error::{Result, TaggerError};
use crate::record::TaggedChunk;
use crate::splitter::RecursiveSplitter;
use crate::tagger::{CategoryTable, Tagger};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Chunks produced by the splitter.
    pub raw_chunks: usize,
    /// Chunks left after cleaning and the word-count filter.
    pub kept_chunks: usize,
    /// Number of kept chunks carrying each tag.
    pub tag_counts: BTreeMap<String, usize>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<TaggedChunk>,
    pub stats: PipelineStats,
}

/// Turns raw documents into tagged chunk records.
pub struct ScrapePipeline {
    splitter: RecursiveSplitter,
    tagger: Tagger,
    min_words: usize,
    source: Option<String>,
    scraped_date: NaiveDate,
}

impl ScrapePipeline {
    /// Build a pipeline; the scrape date defaults to today.
    pub fn new(config: ScrapeConfig, categories: CategoryTable) -> Result<Self> {
        config.validate()?;
        categories.validate().map_err(TaggerError::InvalidConfig)?;

        let splitter = RecursiveSplitter::new(config.splitter)?;
        let source = Some(config.source).filter(|s| !s.trim().is_empty());

        Ok(Self {
            splitter,
            tagger: Tagger::new(categories, config.match_mode),
            min_words: config.min_words,
            source,
            scraped_date: Local::now().date_naive(),
        })
    }

    /// Override the date written into metadata.
    pub fn with_scraped_date(mut self, date: NaiveDate) -> Self {
        self.scraped_date = date;
        self
    }

    /// Override the source written into metadata.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn tagger(&self) -> &Tagger {
        &self.tagger
    }

    /// Split and clean the document text, keeping only long enough chunks.
    pub fn cleaned_chunks(&self, document: &RawDocument) -> (usize, Vec<String>) {
        let text = document.text();
        let chunks = self.splitter.split(&text);
        let raw_count = chunks.len();

        let cleaned: Vec<String> = chunks.iter().map(|c| clean(c)).collect();
        let kept = filter_short(cleaned, self.min_words);

        tracing::debug!(
            source = %document.source,
            text_chars = text.chars().count(),
            raw_chunks = raw_count,
            kept_chunks = kept.len(),
            "document chunked"
        );

        (raw_count, kept)
    }

    /// Run the full pipeline over one document.
    pub fn run(&self, document: &RawDocument) -> PipelineOutput {
        let (raw_chunks, kept) = self.cleaned_chunks(document);
        let source = self.source.as_deref().unwrap_or(&document.source);

        let mut stats = PipelineStats {
            raw_chunks,
            kept_chunks: kept.len(),
            ..Default::default()
        };

        let records: Vec<TaggedChunk> = kept
            .into_iter()
            .map(|text| {
                let tags = self.tagger.tag(&text);
                for tag in &tags {
                    *stats.tag_counts.entry(tag.clone()).or_default() += 1;
                }
                TaggedChunk::new(text, tags, source, self.scraped_date)
            })
            .collect();

        tracing::info!(
            source,
            raw_chunks = stats.raw_chunks,
            records = records.len(),
            "pipeline finished"
        );

        PipelineOutput { records, stats }
    }
}
