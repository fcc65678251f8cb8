pub mod movers;
pub mod quotes;
pub mod transport;
pub mod wire;

pub use transport::{FetchError, HttpTransport, Transport};

/// Allow-listed upstream paths forwarded through the proxy.
pub const QUOTES_ENDPOINT: &str = "market/v2/get-quotes";
pub const MOVERS_ENDPOINT: &str = "market/v2/get-movers";
pub const TRENDING_ENDPOINT: &str = "market/get-trending-tickers";

/// Rank-ordered symbols kept per mover category.
pub const MOVERS_PER_CATEGORY: usize = 5;
/// Trending quotes surfaced after zero-price filtering.
pub const TRENDING_LIMIT: usize = 10;

pub type FetchResult<T> = std::result::Result<T, FetchError>;
