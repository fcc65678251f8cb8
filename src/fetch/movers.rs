use crate::quote::{MoverCategory, Quote};

use super::{
    wire, FetchResult, Transport, MOVERS_ENDPOINT, MOVERS_PER_CATEGORY, TRENDING_ENDPOINT,
};

/// One movers call returns every category regardless of which one the
/// caller wanted; all of them come back here so the service layer can warm
/// the list cache for each and the quote cache for every embedded symbol.
/// Upstream rank order is display-significant and preserved as-is.
pub async fn fetch_all_movers<T: Transport>(
    transport: &T,
) -> FetchResult<Vec<(MoverCategory, Vec<Quote>)>> {
    let count = MOVERS_PER_CATEGORY.to_string();
    let body = transport
        .get_json(MOVERS_ENDPOINT, &[("start", "0"), ("count", &count)])
        .await?;

    let lists = wire::decode_movers(body)?;
    Ok(lists
        .into_iter()
        .filter_map(|(id, mut quotes)| {
            let category = MoverCategory::from_id(&id)?;
            quotes.truncate(MOVERS_PER_CATEGORY);
            Some((category, quotes))
        })
        .collect())
}

/// Trending returns bare symbols; resolving them to quotes is the batch
/// resolver's job.
pub async fn fetch_trending_symbols<T: Transport>(transport: &T) -> FetchResult<Vec<String>> {
    let body = transport.get_json(TRENDING_ENDPOINT, &[]).await?;
    wire::decode_trending(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::transport::mock::MockTransport;
    use super::*;

    #[tokio::test]
    async fn single_call_yields_every_category_in_rank_order() {
        let transport = MockTransport::new();
        transport.push(Ok(json!({
            "finance": {
                "result": [
                    {
                        "canonicalName": "DAY_GAINERS",
                        "quotes": [
                            {"symbol": "NVDA", "regularMarketPrice": 131.88},
                            {"symbol": "AMD", "regularMarketPrice": 158.32}
                        ]
                    },
                    {
                        "canonicalName": "DAY_LOSERS",
                        "quotes": [{"symbol": "INTC", "regularMarketPrice": 30.84}]
                    },
                    {
                        "canonicalName": "MOST_ACTIVES",
                        "quotes": [{"symbol": "TSLA", "regularMarketPrice": 246.39}]
                    },
                    {
                        "canonicalName": "SOMETHING_ELSE",
                        "quotes": [{"symbol": "GME"}]
                    }
                ]
            }
        })));

        let movers = fetch_all_movers(&transport).await.unwrap();
        assert_eq!(transport.calls(), 1);
        assert_eq!(movers.len(), 3, "unknown categories are dropped");
        assert_eq!(movers[0].0, MoverCategory::DayGainers);
        assert_eq!(movers[0].1[0].symbol, "nvda");
        assert_eq!(movers[0].1[1].symbol, "amd");
    }

    #[tokio::test]
    async fn categories_are_capped_at_five_entries() {
        let rows: Vec<_> = (0..8)
            .map(|i| json!({"symbol": format!("S{i}"), "regularMarketPrice": 1.0 + i as f64}))
            .collect();
        let transport = MockTransport::new();
        transport.push(Ok(json!({
            "finance": {"result": [{"canonicalName": "DAY_GAINERS", "quotes": rows}]}
        })));

        let movers = fetch_all_movers(&transport).await.unwrap();
        assert_eq!(movers[0].1.len(), 5);
        assert_eq!(movers[0].1[0].symbol, "s0");
    }

    #[tokio::test]
    async fn trending_returns_bare_symbols() {
        let transport = MockTransport::new();
        transport.push(Ok(json!({
            "finance": {"result": [{"quotes": [{"symbol": "TSLA"}, {"symbol": "NVDA"}]}]}
        })));

        let symbols = fetch_trending_symbols(&transport).await.unwrap();
        assert_eq!(symbols, vec!["TSLA", "NVDA"]);
        let requests = transport.requests();
        assert_eq!(requests[0].0, TRENDING_ENDPOINT);
    }
}
