use crate::quote::{canonical_symbol, MoverCategory, Quote};

/// Static snapshot served while demo mode is active. Shapes and ordering
/// match the live resolvers so callers cannot tell which mode answered.
const FIXTURE_QUOTES: &[(&str, &str, f64, f64, f64)] = &[
    ("AAPL", "Apple Inc.", 189.84, 1.52, 0.81),
    ("MSFT", "Microsoft Corporation", 425.22, 3.18, 0.75),
    ("NVDA", "NVIDIA Corporation", 131.88, 4.12, 3.23),
    ("GOOGL", "Alphabet Inc.", 176.34, -0.92, -0.52),
    ("AMZN", "Amazon.com, Inc.", 186.51, 1.07, 0.58),
    ("META", "Meta Platforms, Inc.", 514.74, 6.21, 1.22),
    ("TSLA", "Tesla, Inc.", 246.39, -5.87, -2.33),
    ("AMD", "Advanced Micro Devices, Inc.", 158.32, 2.44, 1.57),
    ("INTC", "Intel Corporation", 30.84, -1.12, -3.50),
    ("NFLX", "Netflix, Inc.", 645.82, 4.95, 0.77),
    ("BA", "The Boeing Company", 178.12, -2.31, -1.28),
    ("F", "Ford Motor Company", 10.48, 0.14, 1.35),
    ("^GSPC", "S&P 500", 5634.61, 32.61, 0.58),
    ("^DJI", "Dow Jones Industrial Average", 41250.50, 243.63, 0.59),
    ("^IXIC", "NASDAQ Composite", 17754.82, 150.12, 0.85),
];

const FIXTURE_GAINERS: &[&str] = &["NVDA", "AMD", "F", "META", "AAPL"];
const FIXTURE_LOSERS: &[&str] = &["INTC", "TSLA", "BA", "GOOGL", "MSFT"];
const FIXTURE_ACTIVES: &[&str] = &["TSLA", "NVDA", "F", "INTC", "AAPL"];

const FIXTURE_TRENDING: &[&str] = &[
    "NVDA", "TSLA", "META", "AMD", "AAPL", "NFLX", "BA", "AMZN",
];

pub fn fixture_quote(symbol: &str) -> Option<Quote> {
    let wanted = canonical_symbol(symbol);
    FIXTURE_QUOTES
        .iter()
        .find(|(sym, ..)| canonical_symbol(sym) == wanted)
        .map(|&(sym, name, price, price_change, percent_change)| Quote {
            symbol: canonical_symbol(sym),
            name: name.to_string(),
            price,
            price_change,
            percent_change,
        })
}

pub fn fixture_movers(category: MoverCategory) -> Vec<String> {
    let symbols = match category {
        MoverCategory::DayGainers => FIXTURE_GAINERS,
        MoverCategory::DayLosers => FIXTURE_LOSERS,
        MoverCategory::MostActives => FIXTURE_ACTIVES,
    };
    symbols.iter().map(|s| s.to_string()).collect()
}

pub fn fixture_trending() -> Vec<Quote> {
    FIXTURE_TRENDING
        .iter()
        .filter_map(|symbol| fixture_quote(symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mover_fixtures_hold_at_most_five_known_symbols() {
        for category in MoverCategory::ALL {
            let symbols = fixture_movers(category);
            assert!(symbols.len() <= 5, "{:?} too long", category);
            for symbol in &symbols {
                assert!(
                    fixture_quote(symbol).is_some(),
                    "mover fixture {} has no quote fixture",
                    symbol
                );
            }
        }
    }

    #[test]
    fn trending_fixtures_are_complete_quotes() {
        let trending = fixture_trending();
        assert_eq!(trending.len(), FIXTURE_TRENDING.len());
        assert!(trending.len() <= 10);
        assert!(trending.iter().all(|quote| quote.price > 0.0));
    }

    #[test]
    fn fixture_lookup_is_case_insensitive() {
        assert!(fixture_quote("aapl").is_some());
        assert!(fixture_quote("^gspc").is_some());
        assert!(fixture_quote("ZZZNOPE").is_none());
    }
}
