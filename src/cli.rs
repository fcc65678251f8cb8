use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::quote::MoverCategory;

#[derive(Parser)]
#[command(name = "finch")]
#[command(about = "Market-data client for the Finch proxy: quotes, movers, trending")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the key-masking proxy.
    #[arg(long)]
    pub base_url: Option<String>,

    /// File backing the persistent cache tier.
    #[arg(long)]
    pub cache_file: Option<PathBuf>,

    /// Optional JSON config file; flags above override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a single quote
    Quote {
        /// Ticker symbol, e.g. AAPL or ^GSPC
        symbol: String,
    },

    /// Resolve several symbols with one upstream call
    Quotes {
        symbols: Vec<String>,

        /// Also write the snapshot to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show a mover list (gainers, losers or actives)
    Movers {
        #[arg(default_value = "gainers")]
        category: String,
    },

    /// Show trending tickers with live quotes
    Trending,

    /// Warm the cache with indices, movers and trending in one pass
    Prewarm,

    /// Leave demo mode and try live data again
    ExitDemo,

    /// Show the demo-mode state
    Status,
}

pub fn parse_category(value: &str) -> Option<MoverCategory> {
    match value.to_lowercase().as_str() {
        "gainers" | "day_gainers" => Some(MoverCategory::DayGainers),
        "losers" | "day_losers" => Some(MoverCategory::DayLosers),
        "actives" | "most_actives" | "most-active" => Some(MoverCategory::MostActives),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_aliases() {
        assert_eq!(parse_category("Gainers"), Some(MoverCategory::DayGainers));
        assert_eq!(parse_category("DAY_LOSERS"), Some(MoverCategory::DayLosers));
        assert_eq!(parse_category("actives"), Some(MoverCategory::MostActives));
        assert_eq!(parse_category("sideways"), None);
    }
}
