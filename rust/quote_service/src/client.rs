// src/client.rs

use crate::models::{QuoteSummaryEnvelope, TickerRecord};
use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Fixed market-suffix convention appended to every symbol (NSE).
pub const MARKET_SUFFIX: &str = ".NS";

/// Enumerated module set requested in a single quote-summary call.
pub const QUOTE_MODULES: &str =
    "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics,earnings";

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("quote provider returned status {0}")]
    Status(StatusCode),
    #[error("quote provider returned no result for {0}")]
    EmptyResult(String),
}

/// Seam for the orchestrator; tests substitute a stub implementation.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch market data for one normalized ticker. Failure is
    /// per-ticker and non-fatal: any error is logged and collapses
    /// to `None`.
    async fn fetch(&self, ticker: &str) -> Option<TickerRecord>;
}

#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at an alternate endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        QuoteClient {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_summary(&self, ticker: &str) -> Result<TickerRecord, QuoteError> {
        let symbol = format!("{ticker}{MARKET_SUFFIX}");
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        let response = self
            .http
            .get(&url)
            .query(&[("modules", QUOTE_MODULES)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status()));
        }

        let envelope: QuoteSummaryEnvelope = response.json().await?;
        let modules = envelope
            .quote_summary
            .and_then(|summary| summary.result)
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or(QuoteError::EmptyResult(symbol))?;

        Ok(TickerRecord::from_modules(&modules))
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for QuoteClient {
    async fn fetch(&self, ticker: &str) -> Option<TickerRecord> {
        match self.fetch_summary(ticker).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("market data fetch failed for {ticker}: {err}");
                None
            }
        }
    }
}
