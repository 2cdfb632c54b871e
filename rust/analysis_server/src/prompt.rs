// src/prompt.rs
//
// Versioned prompt templates and the pure renderer. Rendering does no
// I/O: the same tickers and records always produce the same string.

use quote_service::models::TickerRecord;

/// Placeholder substituted with the comma-joined ticker list. Every
/// occurrence is replaced, so a template may repeat it in a title and
/// a body.
pub const STOCKS_PLACEHOLDER: &str = "{STOCKS}";

pub struct PromptTemplate {
    pub name: &'static str,
    pub version: u32,
    body: &'static str,
}

const FUNDAMENTAL_ANALYSIS_BODY: &str = "\
Please provide a comprehensive fundamental analysis for the following stock(s): {STOCKS}

Include the following key areas in your analysis:

1. **Company Overview & Business Model**
   - Core business operations and revenue streams
   - Market position and competitive advantages
   - Recent strategic initiatives or changes

2. **Financial Health Analysis**
   - Revenue growth trends (last 3-5 years)
   - Profitability metrics (gross, operating, net margins)
   - Balance sheet strength (debt levels, cash position)
   - Cash flow analysis (operating, free cash flow)

3. **Valuation Metrics**
   - P/E ratio (current and forward)
   - Price-to-Book (P/B) ratio
   - Price-to-Sales (P/S) ratio
   - PEG ratio
   - Comparison to industry averages

4. **Key Financial Ratios**
   - Return on Equity (ROE)
   - Return on Assets (ROA)
   - Debt-to-Equity ratio
   - Current ratio and quick ratio
   - Asset turnover ratios

5. **Growth Analysis**
   - Historical revenue and earnings growth
   - Future growth projections
   - Market expansion opportunities
   - R&D investment and innovation pipeline

6. **Risks & Challenges**
   - Industry-specific risks
   - Company-specific vulnerabilities
   - Economic sensitivity
   - Regulatory or competitive threats

7. **Investment Thesis**
   - Bull case scenario
   - Bear case scenario
   - Fair value estimation
   - Recommendation (Buy/Hold/Sell) with reasoning

Please provide specific numbers, recent data, and focus on the most recent quarterly and annual reports. Structure your response clearly with headers and bullet points for easy reading.";

const QUICK_ANALYSIS_BODY: &str = "\
Quick take on {STOCKS}

Give a concise fundamental snapshot of {STOCKS}: business model in two
sentences, the three most important financial metrics with numbers, the
single biggest risk, and a one-line Buy/Hold/Sell call with reasoning.";

pub const FUNDAMENTAL_ANALYSIS: PromptTemplate = PromptTemplate {
    name: "fundamental-analysis",
    version: 2,
    body: FUNDAMENTAL_ANALYSIS_BODY,
};

pub const QUICK_ANALYSIS: PromptTemplate = PromptTemplate {
    name: "quick-analysis",
    version: 1,
    body: QUICK_ANALYSIS_BODY,
};

const REGISTRY: &[&PromptTemplate] = &[&FUNDAMENTAL_ANALYSIS, &QUICK_ANALYSIS];

pub fn default_template() -> &'static PromptTemplate {
    &FUNDAMENTAL_ANALYSIS
}

pub fn lookup(name: &str) -> Option<&'static PromptTemplate> {
    REGISTRY.iter().copied().find(|template| template.name == name)
}

impl PromptTemplate {
    /// Substitute the ticker list into the template and, when records
    /// were fetched, append the financial-data section.
    ///
    /// No length cap is applied before hand-off; oversized prompts are
    /// left to the provider's input limit.
    pub fn render(&self, tickers: &[String], records: &[Option<TickerRecord>]) -> String {
        let joined = tickers.join(", ");
        let mut prompt = self.body.replace(STOCKS_PLACEHOLDER, &joined);
        if !records.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&render_data_section(tickers, records));
        }
        prompt
    }
}

fn render_data_section(tickers: &[String], records: &[Option<TickerRecord>]) -> String {
    let mut section = String::from("Financial Data (fetched from market data provider):\n");
    for (ticker, record) in tickers.iter().zip(records.iter()) {
        match record {
            None => {
                section.push_str(&format!("\n{ticker}: Data not available\n"));
            }
            Some(record) => {
                section.push_str(&format!("\n{ticker}:\n"));
                section.push_str(&format!("  Name: {}\n", record.name));
                section.push_str(&format!("  Sector: {}\n", record.sector));
                section.push_str(&format!("  Price: {}\n", record.price));
                section.push_str(&format!("  Market Cap: {}\n", record.market_cap));
                section.push_str(&format!("  P/E Ratio: {}\n", record.pe_ratio));
                section.push_str(&format!("  ROE: {}\n", record.roe));
                section.push_str(&format!("  Debt to Equity: {}\n", record.debt_to_equity));
                section.push_str(&format!("  Dividend Yield: {}\n", record.dividend_yield));
                section.push_str(&format!("  52 Week High: {}\n", record.week52_high));
                section.push_str(&format!("  52 Week Low: {}\n", record.week52_low));
                section.push_str(&format!("  Beta: {}\n", record.beta));
                section.push_str(&format!(
                    "  Institutional Holding: {}\n",
                    record.held_by_institutions
                ));
                section.push_str(&format!("  Insider Holding: {}\n", record.held_by_insiders));
                section.push_str("  Revenue History:\n");
                for (period, value) in &record.revenue_history {
                    section.push_str(&format!("    {period}: {value}\n"));
                }
                section.push_str("  Earnings History:\n");
                for (period, value) in &record.earnings_history {
                    section.push_str(&format!("    {period}: {value}\n"));
                }
            }
        }
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_service::models::{QuoteModules, TickerRecord};

    fn sentinel_record() -> TickerRecord {
        TickerRecord::from_modules(&QuoteModules::default())
    }

    #[test]
    fn test_render_is_deterministic() {
        let tickers = vec!["AAA".to_string()];
        let records = vec![None];
        let first = default_template().render(&tickers, &records);
        let second = default_template().render(&tickers, &records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_substitutes_ticker_list() {
        let tickers = vec!["TCS".to_string(), "INFY".to_string()];
        let prompt = default_template().render(&tickers, &[]);
        assert!(prompt.contains("stock(s): TCS, INFY"));
        assert!(!prompt.contains(STOCKS_PLACEHOLDER));
    }

    #[test]
    fn test_render_replaces_every_placeholder_occurrence() {
        let tickers = vec!["RELIANCE".to_string()];
        let prompt = QUICK_ANALYSIS.render(&tickers, &[]);
        assert_eq!(prompt.matches("RELIANCE").count(), 2);
        assert!(!prompt.contains(STOCKS_PLACEHOLDER));
    }

    #[test]
    fn test_missing_record_renders_data_not_available() {
        let tickers = vec!["TCS".to_string(), "INFY".to_string()];
        let records = vec![Some(sentinel_record()), None];
        let prompt = default_template().render(&tickers, &records);
        assert!(prompt.contains("TCS:\n"));
        assert!(prompt.contains("INFY: Data not available"));
    }

    #[test]
    fn test_empty_history_renders_empty_block() {
        let tickers = vec!["TCS".to_string()];
        let records = vec![Some(sentinel_record())];
        let prompt = default_template().render(&tickers, &records);
        assert!(prompt.contains("  Revenue History:\n  Earnings History:\n"));
    }

    #[test]
    fn test_history_pairs_render_indented() {
        let mut record = sentinel_record();
        record.revenue_history = vec![("2023".to_string(), "8.93T".to_string())];
        let tickers = vec!["RELIANCE".to_string()];
        let prompt = default_template().render(&tickers, &[Some(record)]);
        assert!(prompt.contains("    2023: 8.93T\n"));
    }

    #[test]
    fn test_no_records_skips_data_section() {
        let prompt = default_template().render(&["TCS".to_string()], &[]);
        assert!(!prompt.contains("Financial Data"));
    }

    #[test]
    fn test_registry_lookup() {
        assert!(lookup("fundamental-analysis").is_some());
        assert_eq!(lookup("quick-analysis").unwrap().version, 1);
        assert!(lookup("nonexistent").is_none());
    }
}
