use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::warn;

use crate::cache::{movers_key, quote_key, FileStore, KeyValueStore, TieredCache, TRENDING_KEY};
use crate::config::FinchConfig;
use crate::demo::{fixture_movers, fixture_quote, fixture_trending, DemoMode, DemoState};
use crate::fetch::movers::{fetch_all_movers, fetch_trending_symbols};
use crate::fetch::quotes::{fetch_quote_batch, fetch_single_quote};
use crate::fetch::{HttpTransport, Transport, TRENDING_LIMIT};
use crate::quote::{canonical_symbol, display_symbol, MoverCategory, Quote};

/// Index symbols warmed by the prewarm pass.
const INDEX_SYMBOLS: &[&str] = &["^GSPC", "^DJI", "^IXIC"];

#[derive(Debug, Default)]
pub struct PrewarmReport {
    pub warmed: Vec<String>,
    pub errors: Vec<String>,
}

/// Operation surface over the tiered cache, the demo-mode controller and
/// the proxy transport. Every resolver follows the same shape: cache,
/// then demo short-circuit, then at most one network call, writing results
/// back through both cache tiers. Data paths never return errors; a failed
/// fetch is logged, fed to the demo controller and surfaced as `None` or
/// an empty list.
pub struct QuoteService<T: Transport> {
    transport: T,
    cache: TieredCache,
    demo: DemoMode,
    config: FinchConfig,
}

impl QuoteService<HttpTransport> {
    pub fn from_config(config: FinchConfig) -> Self {
        let transport = HttpTransport::new(config.base_url.clone());
        let persistent: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.cache_file));
        Self::new(transport, persistent, config)
    }
}

impl<T: Transport> QuoteService<T> {
    pub fn new(transport: T, persistent: Arc<dyn KeyValueStore>, config: FinchConfig) -> Self {
        let cache = TieredCache::new(persistent.clone());
        let demo = DemoMode::new(persistent, config.failure_threshold);
        Self {
            transport,
            cache,
            demo,
            config,
        }
    }

    pub fn demo_active(&self) -> bool {
        self.demo.is_active()
    }

    pub fn demo_state(&self) -> DemoState {
        self.demo.state()
    }

    pub fn exit_demo(&self) {
        self.demo.exit_demo();
    }

    /// Single-symbol lookup: cache, then demo fixtures, then the
    /// retry-wrapped network path.
    pub async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        let key = quote_key(symbol);
        if let Some(quote) = self.cache.get::<Quote>(&key, self.config.ttl.quote()) {
            return Some(quote);
        }

        if self.demo.is_active() {
            return fixture_quote(symbol);
        }

        match fetch_single_quote(&self.transport, &self.config.retry, symbol).await {
            Ok(found) => {
                self.demo.record_success();
                match found {
                    Some(quote) if !quote.is_placeholder() => {
                        self.cache.put(&key, &quote);
                        Some(quote)
                    }
                    _ => None,
                }
            }
            Err(err) => {
                warn!("quote fetch for {} failed: {}", display_symbol(symbol), err);
                self.demo.record_failure(err.status());
                None
            }
        }
    }

    /// Resolve a set of symbols with at most one network call. Every
    /// requested symbol appears in the result; `None` means "known to not
    /// exist", distinct from never having been queried.
    pub async fn resolve_quotes(&self, symbols: &[String]) -> BTreeMap<String, Option<Quote>> {
        let mut results = BTreeMap::new();
        let mut remaining = Vec::new();
        let mut seen = HashSet::new();

        for symbol in symbols {
            let canonical = canonical_symbol(symbol);
            if canonical.is_empty() || !seen.insert(canonical.clone()) {
                continue;
            }
            match self
                .cache
                .get::<Quote>(&quote_key(&canonical), self.config.ttl.quote())
            {
                Some(quote) => {
                    results.insert(display_symbol(&canonical), Some(quote));
                }
                None => remaining.push(canonical),
            }
        }

        if remaining.is_empty() {
            return results;
        }

        if self.demo.is_active() {
            for symbol in remaining {
                results.insert(display_symbol(&symbol), fixture_quote(&symbol));
            }
            return results;
        }

        match fetch_quote_batch(&self.transport, &remaining).await {
            Ok(quotes) => {
                self.demo.record_success();
                let mut by_symbol: HashMap<String, Quote> = quotes
                    .into_iter()
                    .map(|quote| (quote.symbol.clone(), quote))
                    .collect();

                for symbol in remaining {
                    let entry = match by_symbol.remove(&symbol) {
                        Some(quote) if !quote.is_placeholder() => {
                            self.cache.put(&quote_key(&symbol), &quote);
                            Some(quote)
                        }
                        _ => None,
                    };
                    results.insert(display_symbol(&symbol), entry);
                }
            }
            Err(err) => {
                warn!("batch quote fetch failed: {}", err);
                self.demo.record_failure(err.status());
                for symbol in remaining {
                    results.insert(display_symbol(&symbol), None);
                }
            }
        }

        results
    }

    /// Rank-ordered symbols for one mover category (at most five). A miss
    /// costs a single network call that warms every category plus the
    /// quote cache for each embedded symbol, so tab-switching between
    /// categories stays free.
    pub async fn movers_symbols(&self, category: MoverCategory) -> Vec<String> {
        let key = movers_key(category);
        if let Some(symbols) = self
            .cache
            .get::<Vec<String>>(&key, self.config.ttl.movers())
        {
            return symbols;
        }

        if self.demo.is_active() {
            return fixture_movers(category);
        }

        match fetch_all_movers(&self.transport).await {
            Ok(lists) => {
                self.demo.record_success();
                self.warm_movers(&lists);
                lists
                    .into_iter()
                    .find(|(listed, _)| *listed == category)
                    .map(|(_, quotes)| {
                        quotes
                            .iter()
                            .map(|quote| display_symbol(&quote.symbol))
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Err(err) => {
                warn!("movers fetch failed: {}", err);
                self.demo.record_failure(err.status());
                Vec::new()
            }
        }
    }

    fn warm_movers(&self, lists: &[(MoverCategory, Vec<Quote>)]) {
        for (category, quotes) in lists {
            let symbols: Vec<String> = quotes
                .iter()
                .map(|quote| display_symbol(&quote.symbol))
                .collect();
            self.cache.put(&movers_key(*category), &symbols);

            // Mover rows already carry price/name/change; caching them
            // saves the batch round-trip for those symbols.
            for quote in quotes {
                if !quote.is_placeholder() {
                    self.cache.put(&quote_key(&quote.symbol), quote);
                }
            }
        }
    }

    /// Trending quotes, at most ten, zero-price entries dropped while the
    /// remaining relative order is preserved.
    pub async fn trending(&self) -> Vec<Quote> {
        let symbols = match self
            .cache
            .get::<Vec<String>>(TRENDING_KEY, self.config.ttl.trending())
        {
            Some(symbols) => symbols,
            None => {
                if self.demo.is_active() {
                    return fixture_trending();
                }
                match fetch_trending_symbols(&self.transport).await {
                    Ok(mut raw) => {
                        self.demo.record_success();
                        raw.truncate(TRENDING_LIMIT);
                        let symbols: Vec<String> =
                            raw.iter().map(|symbol| display_symbol(symbol)).collect();
                        self.cache.put(TRENDING_KEY, &symbols);
                        symbols
                    }
                    Err(err) => {
                        warn!("trending fetch failed: {}", err);
                        self.demo.record_failure(err.status());
                        return Vec::new();
                    }
                }
            }
        };

        let mut resolved = self.resolve_quotes(&symbols).await;
        symbols
            .iter()
            .filter_map(|symbol| resolved.remove(&display_symbol(symbol)).flatten())
            .filter(|quote| quote.price != 0.0)
            .collect()
    }

    /// Client-side analogue of the morning-snapshot cron: three aggregate
    /// fetches run concurrently, each failure recorded instead of aborting
    /// the others.
    pub async fn prewarm(&self) -> PrewarmReport {
        let mut report = PrewarmReport::default();

        if self.demo.is_active() {
            report
                .errors
                .push("demo mode active; prewarm skipped".to_string());
            return report;
        }

        let (indices, movers, trending) = futures::join!(
            self.warm_indices_leg(),
            self.warm_movers_leg(),
            self.warm_trending_leg()
        );

        for leg in [indices, movers, trending] {
            match leg {
                Ok(label) => report.warmed.push(label),
                Err(err) => report.errors.push(err),
            }
        }

        report
    }

    async fn warm_indices_leg(&self) -> std::result::Result<String, String> {
        let symbols: Vec<String> = INDEX_SYMBOLS.iter().map(|s| s.to_string()).collect();
        match fetch_quote_batch(&self.transport, &symbols).await {
            Ok(quotes) => {
                self.demo.record_success();
                let mut warmed = 0;
                for quote in &quotes {
                    if !quote.is_placeholder() {
                        self.cache.put(&quote_key(&quote.symbol), quote);
                        warmed += 1;
                    }
                }
                Ok(format!("indices ({warmed} quotes)"))
            }
            Err(err) => {
                self.demo.record_failure(err.status());
                Err(format!("indices: {err}"))
            }
        }
    }

    async fn warm_movers_leg(&self) -> std::result::Result<String, String> {
        match fetch_all_movers(&self.transport).await {
            Ok(lists) => {
                self.demo.record_success();
                self.warm_movers(&lists);
                Ok(format!("movers ({} categories)", lists.len()))
            }
            Err(err) => {
                self.demo.record_failure(err.status());
                Err(format!("movers: {err}"))
            }
        }
    }

    async fn warm_trending_leg(&self) -> std::result::Result<String, String> {
        let symbols = match fetch_trending_symbols(&self.transport).await {
            Ok(mut raw) => {
                self.demo.record_success();
                raw.truncate(TRENDING_LIMIT);
                let symbols: Vec<String> =
                    raw.iter().map(|symbol| display_symbol(symbol)).collect();
                self.cache.put(TRENDING_KEY, &symbols);
                symbols
            }
            Err(err) => {
                self.demo.record_failure(err.status());
                return Err(format!("trending: {err}"));
            }
        };

        match fetch_quote_batch(&self.transport, &symbols).await {
            Ok(quotes) => {
                self.demo.record_success();
                for quote in &quotes {
                    if !quote.is_placeholder() {
                        self.cache.put(&quote_key(&quote.symbol), quote);
                    }
                }
                Ok(format!("trending ({} symbols)", symbols.len()))
            }
            Err(err) => {
                self.demo.record_failure(err.status());
                Err(format!("trending quotes: {err}"))
            }
        }
    }
}
