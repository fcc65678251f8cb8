use serde::Deserialize;
use serde_json::Value;

use crate::quote::{canonical_symbol, Quote};

use super::FetchResult;

/// Quote row as the upstream serves it. `regularMarketChangePercent` is
/// already a whole percentage, which is the unit `Quote` carries.
#[derive(Debug, Deserialize)]
pub struct WireQuote {
    pub symbol: String,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "longName", default)]
    pub long_name: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    pub price: Option<f64>,
    #[serde(rename = "regularMarketChange", default)]
    pub price_change: Option<f64>,
    #[serde(rename = "regularMarketChangePercent", default)]
    pub percent_change: Option<f64>,
}

impl WireQuote {
    pub fn into_quote(self) -> Quote {
        Quote {
            symbol: canonical_symbol(&self.symbol),
            name: self.long_name.or(self.short_name).unwrap_or_default(),
            price: self.price.unwrap_or(0.0),
            price_change: self.price_change.unwrap_or(0.0),
            percent_change: self.percent_change.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    #[serde(default)]
    result: Vec<WireQuote>,
}

pub fn decode_quotes(body: Value) -> FetchResult<Vec<Quote>> {
    let envelope: QuoteEnvelope = serde_json::from_value(body)?;
    Ok(envelope
        .quote_response
        .result
        .into_iter()
        .map(WireQuote::into_quote)
        .collect())
}

#[derive(Debug, Deserialize)]
struct FinanceEnvelope<T> {
    finance: FinanceResult<T>,
}

#[derive(Debug, Deserialize)]
struct FinanceResult<T> {
    // Path-form default keeps the derive from demanding `T: Default`.
    #[serde(default = "Vec::new")]
    result: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MoverList {
    #[serde(alias = "canonicalName")]
    id: String,
    #[serde(default)]
    quotes: Vec<WireQuote>,
}

/// One movers response carries every category; decode them all so the
/// caller can warm caches beyond the category it was asked for.
pub fn decode_movers(body: Value) -> FetchResult<Vec<(String, Vec<Quote>)>> {
    let envelope: FinanceEnvelope<MoverList> = serde_json::from_value(body)?;
    Ok(envelope
        .finance
        .result
        .into_iter()
        .map(|list| {
            let quotes = list
                .quotes
                .into_iter()
                .map(WireQuote::into_quote)
                .collect();
            (list.id, quotes)
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct TrendingList {
    #[serde(default)]
    quotes: Vec<TrendingSymbol>,
}

#[derive(Debug, Deserialize)]
struct TrendingSymbol {
    symbol: String,
}

/// Trending rows carry bare symbols only; price data comes from a second
/// pass through the batch quote resolver.
pub fn decode_trending(body: Value) -> FetchResult<Vec<String>> {
    let envelope: FinanceEnvelope<TrendingList> = serde_json::from_value(body)?;
    Ok(envelope
        .finance
        .result
        .into_iter()
        .flat_map(|list| list.quotes)
        .map(|entry| entry.symbol)
        .collect())
}
