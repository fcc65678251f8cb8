use log::warn;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::quote::{canonical_symbol, display_symbol, Quote};

use super::{wire, FetchResult, Transport, QUOTES_ENDPOINT};

/// Fetch one symbol, retrying on HTTP 429 only: fixed delay, bounded
/// attempt count. Any other failure returns immediately. Batch and mover
/// calls do not share this policy.
///
/// `Ok(None)` means the upstream answered but knows no such symbol.
pub async fn fetch_single_quote<T: Transport>(
    transport: &T,
    retry: &RetryConfig,
    symbol: &str,
) -> FetchResult<Option<Quote>> {
    let wanted = canonical_symbol(symbol);
    let param = display_symbol(symbol);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match transport.get_json(QUOTES_ENDPOINT, &[("symbols", &param)]).await {
            Ok(body) => {
                let quotes = wire::decode_quotes(body)?;
                return Ok(quotes
                    .into_iter()
                    .find(|quote| quote.symbol == wanted));
            }
            Err(err) if err.status() == Some(429) && attempt <= retry.max_retries => {
                warn!(
                    "quote fetch for {} rate limited (attempt {}), retrying in {:?}",
                    param,
                    attempt,
                    retry.delay()
                );
                sleep(retry.delay()).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Fetch a set of symbols with exactly one network call, comma-joined.
/// Symbols absent from the response are simply absent here; the resolver
/// layer turns them into explicit `None` entries.
pub async fn fetch_quote_batch<T: Transport>(
    transport: &T,
    symbols: &[String],
) -> FetchResult<Vec<Quote>> {
    let joined = symbols
        .iter()
        .map(|symbol| display_symbol(symbol))
        .collect::<Vec<_>>()
        .join(",");

    let body = transport
        .get_json(QUOTES_ENDPOINT, &[("symbols", &joined)])
        .await?;
    wire::decode_quotes(body)
}
