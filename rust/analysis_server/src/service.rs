// src/service.rs

use crate::models::normalize_symbols;
use crate::prompt::{self, PromptTemplate};
use chrono::{SecondsFormat, Utc};
use completion_service::client::CompletionProvider;
use completion_service::error::CompletionError;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use quote_service::client::QuoteProvider;
use quote_service::models::TickerRecord;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on in-flight market-data fetches per request.
pub const FETCH_CONCURRENCY: usize = 4;
/// Per-fetch deadline; a stuck upstream degrades that ticker to no
/// data instead of stalling the whole batch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub stocks: Vec<String>,
    pub analysis: String,
    pub records: Vec<Option<TickerRecord>>,
    pub timestamp: String,
}

/// Coordinates the analysis pipeline: validate, normalize, enrich,
/// render, complete, shape. Provider clients are injected and shared
/// across requests; the service itself holds no mutable state.
pub struct AnalysisService {
    completion: Arc<dyn CompletionProvider>,
    quotes: Arc<dyn QuoteProvider>,
    template: &'static PromptTemplate,
}

impl AnalysisService {
    pub fn new(completion: Arc<dyn CompletionProvider>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self::with_template(completion, quotes, prompt::default_template())
    }

    pub fn with_template(
        completion: Arc<dyn CompletionProvider>,
        quotes: Arc<dyn QuoteProvider>,
        template: &'static PromptTemplate,
    ) -> Self {
        AnalysisService {
            completion,
            quotes,
            template,
        }
    }

    pub async fn analyze(&self, raw: &[String]) -> Result<AnalysisOutcome, AnalysisError> {
        if raw.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Please provide an array of stock symbols".to_string(),
            ));
        }

        let stocks = normalize_symbols(raw);
        if stocks.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "No valid stock symbols provided".to_string(),
            ));
        }

        info!("analyzing stocks: {}", stocks.join(", "));

        let records = self.fetch_records(&stocks).await;
        let rendered = self.template.render(&stocks, &records);
        let analysis = self.completion.complete(&rendered).await?;

        info!("analysis completed for: {}", stocks.join(", "));

        Ok(AnalysisOutcome {
            stocks,
            analysis,
            records,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Bounded concurrent fan-out. `buffered` yields in submission
    /// order, so the result at index `i` belongs to `stocks[i]` no
    /// matter which fetch finished first.
    async fn fetch_records(&self, stocks: &[String]) -> Vec<Option<TickerRecord>> {
        stream::iter(stocks.iter().cloned())
            .map(|ticker| {
                let quotes = Arc::clone(&self.quotes);
                async move {
                    match tokio::time::timeout(FETCH_TIMEOUT, quotes.fetch(&ticker)).await {
                        Ok(record) => record,
                        Err(_) => {
                            warn!("market data fetch timed out for {ticker}");
                            None
                        }
                    }
                }
            })
            .buffered(FETCH_CONCURRENCY)
            .collect()
            .await
    }
}
