//! Evaluation runner: respond to each query, score the pair, summarize.

use super::dataset::QuerySet;
use super::responder::Responder;
use super::scorer::ResponseScorer;
use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Configuration for an evaluation run.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    /// Maximum queries to evaluate (for quick testing).
    pub max_queries: Option<usize>,
    /// Verbose output.
    pub verbose: bool,
}

/// Result for a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    pub query: String,
    pub response: Option<String>,
    pub relevance_score: Option<f64>,
    pub correctness_score: Option<f64>,
    pub helpfulness_score: Option<f64>,
    /// Error message if responding or scoring failed.
    pub error: Option<String>,
}

impl EvalRecord {
    fn failed(query: &str, response: Option<String>, error: &TaggerError) -> Self {
        Self {
            query: query.to_string(),
            response,
            relevance_score: None,
            correctness_score: None,
            helpfulness_score: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Query set name.
    pub query_set: String,
    /// Queries processed, failed ones included.
    pub total_queries: usize,
    /// Queries that were scored.
    pub scored_queries: usize,
    pub avg_relevance: f64,
    pub avg_correctness: f64,
    pub avg_helpfulness: f64,
    /// Individual results.
    pub records: Vec<EvalRecord>,
    /// Total run time (seconds).
    pub total_time_secs: f64,
}

impl EvalReport {
    /// Create empty results.
    pub fn new(query_set: &str) -> Self {
        Self {
            query_set: query_set.to_string(),
            total_queries: 0,
            scored_queries: 0,
            avg_relevance: 0.0,
            avg_correctness: 0.0,
            avg_helpfulness: 0.0,
            records: Vec::new(),
            total_time_secs: 0.0,
        }
    }

    /// Calculate averages over the scored records.
    pub fn calculate_summary(&mut self) {
        self.total_queries = self.records.len();

        let scored: Vec<&EvalRecord> = self.records.iter().filter(|r| r.is_scored()).collect();
        self.scored_queries = scored.len();

        if scored.is_empty() {
            return;
        }

        let mean = |f: fn(&EvalRecord) -> Option<f64>| {
            scored.iter().filter_map(|r| f(r)).sum::<f64>() / scored.len() as f64
        };

        self.avg_relevance = mean(|r| r.relevance_score);
        self.avg_correctness = mean(|r| r.correctness_score);
        self.avg_helpfulness = mean(|r| r.helpfulness_score);
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Evaluation Summary ===");
        println!("Query set: {}", self.query_set);
        println!("Total Queries Processed: {}", self.total_queries);
        if self.scored_queries < self.total_queries {
            println!(
                "Failed Queries: {}",
                self.total_queries - self.scored_queries
            );
        }
        println!("Average Relevance Score: {:.2}%", self.avg_relevance * 100.0);
        println!("Average Correctness Score: {:.2}%", self.avg_correctness * 100.0);
        println!("Average Helpfulness Score: {:.2}%", self.avg_helpfulness * 100.0);
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("==========================\n");
    }

    /// Save the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TaggerError::Serialization(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| TaggerError::io(path, e))
    }
}

/// Evaluation runner.
pub struct EvalRunner<R, S> {
    responder: R,
    scorer: S,
    config: EvalConfig,
}

impl<R: Responder, S: ResponseScorer> EvalRunner<R, S> {
    /// Create a new runner.
    pub fn new(responder: R, scorer: S, config: EvalConfig) -> Self {
        Self {
            responder,
            scorer,
            config,
        }
    }

    /// Run the evaluation over a query set. Failed queries are recorded and
    /// skipped in the averages; they never abort the run.
    pub async fn run(&self, queries: &QuerySet) -> EvalReport {
        let start_time = Instant::now();
        let mut report = EvalReport::new(&queries.name);

        let limited;
        let queries = match self.config.max_queries {
            Some(max) => {
                limited = queries.take(max);
                &limited
            }
            None => queries,
        };
        let items = &queries.queries;

        tracing::info!(queries = items.len(), set = %queries.name, "evaluation started");

        for (idx, query) in items.iter().enumerate() {
            let record = self.evaluate(query).await;

            match &record.error {
                None => tracing::info!(
                    "Processed {}/{} queries. Latest scores: Relevance={:.2}, Correctness={:.2}, Helpfulness={:.2}",
                    idx + 1,
                    items.len(),
                    record.relevance_score.unwrap_or_default(),
                    record.correctness_score.unwrap_or_default(),
                    record.helpfulness_score.unwrap_or_default(),
                ),
                Some(error) => tracing::warn!(query = %query, %error, "query evaluation failed"),
            }

            if self.config.verbose {
                if let Some(response) = &record.response {
                    println!("\n[{}/{}] {}\n  -> {}", idx + 1, items.len(), query, response);
                }
            }

            report.records.push(record);
        }

        report.total_time_secs = start_time.elapsed().as_secs_f64();
        report.calculate_summary();
        report
    }

    /// Respond to and score a single query.
    pub async fn evaluate(&self, query: &str) -> EvalRecord {
        let response = match self.responder.respond(query).await {
            Ok(response) => response,
            Err(e) => return EvalRecord::failed(query, None, &e),
        };

        match self.scorer.score(query, &response).await {
            Ok(scores) => EvalRecord {
                query: query.to_string(),
                response: Some(response),
                relevance_score: Some(scores.relevance),
                correctness_score: Some(scores.correctness),
                helpfulness_score: Some(scores.helpfulness),
                error: None,
            },
            Err(e) => EvalRecord::failed(query, Some(response), &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::responder::TemplateResponder;
    use crate::eval::scorer::Scores;

    /// Scores by query length; fails on queries containing "boom".
    struct FakeScorer;

    impl ResponseScorer for FakeScorer {
        async fn score(&self, query: &str, _response: &str) -> Result<Scores> {
            if query.contains("boom") {
                return Err(TaggerError::LlmApi("scorer down".to_string()));
            }
            let v = if query.len() > 5 { 1.0 } else { 0.5 };
            Ok(Scores::new(v, v, 0.25))
        }
    }

    fn queries(items: &[&str]) -> QuerySet {
        let mut set = QuerySet::new("test");
        for q in items {
            set.add(*q);
        }
        set
    }

    #[tokio::test]
    async fn test_run_averages() {
        let runner = EvalRunner::new(TemplateResponder::default(), FakeScorer, EvalConfig::default());
        let report = runner.run(&queries(&["short", "a longer query"])).await;

        assert_eq!(report.total_queries, 2);
        assert_eq!(report.scored_queries, 2);
        assert!((report.avg_relevance - 0.75).abs() < 1e-9);
        assert!((report.avg_helpfulness - 0.25).abs() < 1e-9);
        assert!(report.records[0].response.as_deref().unwrap().ends_with("short"));
    }

    #[tokio::test]
    async fn test_failures_recorded_not_averaged() {
        let runner = EvalRunner::new(TemplateResponder::default(), FakeScorer, EvalConfig::default());
        let report = runner.run(&queries(&["boom", "a longer query"])).await;

        assert_eq!(report.total_queries, 2);
        assert_eq!(report.scored_queries, 1);
        assert!(report.records[0].error.as_deref().unwrap().contains("scorer down"));
        assert!(report.records[0].response.is_some());
        assert!((report.avg_relevance - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_max_queries() {
        let config = EvalConfig {
            max_queries: Some(1),
            ..Default::default()
        };
        let runner = EvalRunner::new(TemplateResponder::default(), FakeScorer, config);
        let report = runner.run(&queries(&["one", "two", "three"])).await;
        assert_eq!(report.total_queries, 1);
    }

    #[test]
    fn test_empty_report_summary() {
        let mut report = EvalReport::new("empty");
        report.calculate_summary();
        assert_eq!(report.total_queries, 0);
        assert_eq!(report.avg_relevance, 0.0);
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        EvalReport::new("x").save_json(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"query_set\": \"x\""));
    }
}
