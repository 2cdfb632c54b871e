// src/models.rs

use serde::{Deserialize, Serialize};

/// Sentinel substituted for any field the provider omits.
pub const NOT_AVAILABLE: &str = "N/A";

// The quote-summary endpoint wraps numeric fields in {raw, fmt} objects.
// Every level is optional: the provider freely drops modules and leaves.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FormattedValue {
    pub raw: Option<f64>,
    pub fmt: Option<String>,
    pub long_fmt: Option<String>,
}

impl FormattedValue {
    /// Human-readable rendering: prefer the provider's `fmt` string,
    /// then `longFmt` (sent for large values like market cap), then
    /// the raw number.
    pub fn display(&self) -> Option<String> {
        self.fmt
            .clone()
            .or_else(|| self.long_fmt.clone())
            .or_else(|| self.raw.map(|raw| raw.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryEnvelope {
    pub quote_summary: Option<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    pub result: Option<Vec<QuoteModules>>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteModules {
    pub price: Option<PriceModule>,
    pub summary_profile: Option<SummaryProfileModule>,
    pub summary_detail: Option<SummaryDetailModule>,
    pub financial_data: Option<FinancialDataModule>,
    pub default_key_statistics: Option<KeyStatisticsModule>,
    pub earnings: Option<EarningsModule>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub regular_market_price: Option<FormattedValue>,
    pub market_cap: Option<FormattedValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProfileModule {
    pub sector: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<FormattedValue>,
    pub dividend_yield: Option<FormattedValue>,
    pub fifty_two_week_high: Option<FormattedValue>,
    pub fifty_two_week_low: Option<FormattedValue>,
    pub beta: Option<FormattedValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataModule {
    pub return_on_equity: Option<FormattedValue>,
    pub debt_to_equity: Option<FormattedValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatisticsModule {
    pub held_percent_institutions: Option<FormattedValue>,
    pub held_percent_insiders: Option<FormattedValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EarningsModule {
    pub financials_chart: Option<FinancialsChart>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsChart {
    pub yearly: Option<Vec<YearlyFinancials>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct YearlyFinancials {
    // Period label; the provider sends a bare year number here.
    pub date: Option<serde_json::Value>,
    pub revenue: Option<FormattedValue>,
    pub earnings: Option<FormattedValue>,
}

/// Flat per-ticker record with every field populated; missing upstream
/// data degrades to the `"N/A"` sentinel, absent histories to empty
/// sequences. Built fresh per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerRecord {
    pub name: String,
    pub sector: String,
    pub price: String,
    pub market_cap: String,
    pub pe_ratio: String,
    pub roe: String,
    pub debt_to_equity: String,
    pub dividend_yield: String,
    pub week52_high: String,
    pub week52_low: String,
    pub beta: String,
    pub held_by_institutions: String,
    pub held_by_insiders: String,
    /// (period, value) pairs in provider order, typically <= 4 entries.
    pub revenue_history: Vec<(String, String)>,
    pub earnings_history: Vec<(String, String)>,
}

fn field(value: Option<&FormattedValue>) -> String {
    value
        .and_then(FormattedValue::display)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn period_label(date: &Option<serde_json::Value>) -> String {
    match date {
        Some(serde_json::Value::String(label)) => label.clone(),
        Some(serde_json::Value::Number(year)) => year.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn yearly_history<F>(chart: Option<&FinancialsChart>, pick: F) -> Vec<(String, String)>
where
    F: Fn(&YearlyFinancials) -> &Option<FormattedValue>,
{
    chart
        .and_then(|chart| chart.yearly.as_ref())
        .map(|rows| {
            rows.iter()
                .map(|row| (period_label(&row.date), field(pick(row).as_ref())))
                .collect()
        })
        .unwrap_or_default()
}

impl TickerRecord {
    /// Total conversion: any shape the provider returns maps to a fully
    /// populated record.
    pub fn from_modules(modules: &QuoteModules) -> Self {
        let price = modules.price.as_ref();
        let profile = modules.summary_profile.as_ref();
        let detail = modules.summary_detail.as_ref();
        let financials = modules.financial_data.as_ref();
        let stats = modules.default_key_statistics.as_ref();
        let chart = modules
            .earnings
            .as_ref()
            .and_then(|earnings| earnings.financials_chart.as_ref());

        TickerRecord {
            name: price
                .and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone()))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sector: profile
                .and_then(|p| p.sector.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            price: field(price.and_then(|p| p.regular_market_price.as_ref())),
            market_cap: field(price.and_then(|p| p.market_cap.as_ref())),
            pe_ratio: field(detail.and_then(|d| d.trailing_pe.as_ref())),
            roe: field(financials.and_then(|f| f.return_on_equity.as_ref())),
            debt_to_equity: field(financials.and_then(|f| f.debt_to_equity.as_ref())),
            dividend_yield: field(detail.and_then(|d| d.dividend_yield.as_ref())),
            week52_high: field(detail.and_then(|d| d.fifty_two_week_high.as_ref())),
            week52_low: field(detail.and_then(|d| d.fifty_two_week_low.as_ref())),
            beta: field(detail.and_then(|d| d.beta.as_ref())),
            held_by_institutions: field(stats.and_then(|s| s.held_percent_institutions.as_ref())),
            held_by_insiders: field(stats.and_then(|s| s.held_percent_insiders.as_ref())),
            revenue_history: yearly_history(chart, |row| &row.revenue),
            earnings_history: yearly_history(chart, |row| &row.earnings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_modules_produce_sentinel_record() {
        let record = TickerRecord::from_modules(&QuoteModules::default());

        assert_eq!(record.name, NOT_AVAILABLE);
        assert_eq!(record.sector, NOT_AVAILABLE);
        assert_eq!(record.price, NOT_AVAILABLE);
        assert_eq!(record.market_cap, NOT_AVAILABLE);
        assert_eq!(record.pe_ratio, NOT_AVAILABLE);
        assert_eq!(record.roe, NOT_AVAILABLE);
        assert_eq!(record.debt_to_equity, NOT_AVAILABLE);
        assert_eq!(record.dividend_yield, NOT_AVAILABLE);
        assert_eq!(record.week52_high, NOT_AVAILABLE);
        assert_eq!(record.week52_low, NOT_AVAILABLE);
        assert_eq!(record.beta, NOT_AVAILABLE);
        assert_eq!(record.held_by_institutions, NOT_AVAILABLE);
        assert_eq!(record.held_by_insiders, NOT_AVAILABLE);
        assert!(record.revenue_history.is_empty());
        assert!(record.earnings_history.is_empty());
    }

    #[test]
    fn test_formatted_value_prefers_fmt_over_raw() {
        let value = FormattedValue {
            raw: Some(2456.75),
            fmt: Some("2,456.75".to_string()),
            long_fmt: None,
        };
        assert_eq!(value.display().unwrap(), "2,456.75");

        let raw_only = FormattedValue {
            raw: Some(1.5),
            fmt: None,
            long_fmt: None,
        };
        assert_eq!(raw_only.display().unwrap(), "1.5");

        assert!(FormattedValue::default().display().is_none());
    }

    #[test]
    fn test_formatted_value_falls_back_to_long_fmt() {
        let value = FormattedValue {
            raw: Some(16620000000000.0),
            fmt: None,
            long_fmt: Some("16,620,000,000,000".to_string()),
        };
        assert_eq!(value.display().unwrap(), "16,620,000,000,000");
    }

    #[test]
    fn test_partial_payload_defaults_missing_leaves() {
        let json = r#"
        {
            "price": {
                "longName": "Reliance Industries Limited",
                "regularMarketPrice": { "raw": 2456.75, "fmt": "2,456.75" }
            },
            "summaryDetail": {
                "trailingPE": { "raw": 24.5, "fmt": "24.50" }
            }
        }"#;
        let modules: QuoteModules = serde_json::from_str(json).unwrap();
        let record = TickerRecord::from_modules(&modules);

        assert_eq!(record.name, "Reliance Industries Limited");
        assert_eq!(record.price, "2,456.75");
        assert_eq!(record.pe_ratio, "24.50");
        // Everything the payload left out falls back to the sentinel.
        assert_eq!(record.sector, NOT_AVAILABLE);
        assert_eq!(record.market_cap, NOT_AVAILABLE);
        assert_eq!(record.roe, NOT_AVAILABLE);
        assert!(record.revenue_history.is_empty());
    }

    #[test]
    fn test_yearly_histories_map_to_pairs_in_provider_order() {
        let json = r#"
        {
            "earnings": {
                "financialsChart": {
                    "yearly": [
                        {
                            "date": 2021,
                            "revenue": { "raw": 4667549e6, "fmt": "4.67T" },
                            "earnings": { "raw": 491500e6, "fmt": "491.5B" }
                        },
                        {
                            "date": 2022,
                            "revenue": { "fmt": "6.99T" },
                            "earnings": { "fmt": "607.05B" }
                        },
                        {
                            "date": 2023,
                            "revenue": { "fmt": "8.93T" }
                        }
                    ]
                }
            }
        }"#;
        let modules: QuoteModules = serde_json::from_str(json).unwrap();
        let record = TickerRecord::from_modules(&modules);

        assert_eq!(
            record.revenue_history,
            vec![
                ("2021".to_string(), "4.67T".to_string()),
                ("2022".to_string(), "6.99T".to_string()),
                ("2023".to_string(), "8.93T".to_string()),
            ]
        );
        // Missing earnings leaf for 2023 degrades to the sentinel,
        // the pair itself is still present.
        assert_eq!(record.earnings_history.len(), 3);
        assert_eq!(record.earnings_history[2].1, NOT_AVAILABLE);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = TickerRecord::from_modules(&QuoteModules::default());
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("marketCap").is_some());
        assert!(value.get("peRatio").is_some());
        assert!(value.get("debtToEquity").is_some());
        assert!(value.get("revenueHistory").is_some());
    }
}
