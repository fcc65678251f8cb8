use serde::{Deserialize, Serialize};

/// Canonical point-in-time price snapshot for one symbol.
///
/// `percent_change` is always a whole percentage (`1.25` means +1.25%);
/// producers normalize to this unit and display sites render it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub price_change: f64,
    pub percent_change: f64,
}

impl Quote {
    /// A quote with price 0 and an empty name is the "not found" sentinel,
    /// never a legitimate zero-priced security.
    pub fn is_placeholder(&self) -> bool {
        self.price == 0.0 && self.name.is_empty()
    }
}

/// Lowercase form used for cache keys; symbols are case-insensitive.
pub fn canonical_symbol(symbol: &str) -> String {
    symbol.trim().to_lowercase()
}

/// Uppercase form used for display and result maps.
pub fn display_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Ranked mover classification; each list holds at most five symbols
/// in upstream rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoverCategory {
    MostActives,
    DayGainers,
    DayLosers,
}

impl MoverCategory {
    pub const ALL: [MoverCategory; 3] = [
        MoverCategory::MostActives,
        MoverCategory::DayGainers,
        MoverCategory::DayLosers,
    ];

    /// Upstream list identifier, also used as the cache-key suffix.
    pub fn id(&self) -> &'static str {
        match self {
            MoverCategory::MostActives => "MOST_ACTIVES",
            MoverCategory::DayGainers => "DAY_GAINERS",
            MoverCategory::DayLosers => "DAY_LOSERS",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "MOST_ACTIVES" => Some(MoverCategory::MostActives),
            "DAY_GAINERS" => Some(MoverCategory::DayGainers),
            "DAY_LOSERS" => Some(MoverCategory::DayLosers),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoverCategory::MostActives => "Most Active",
            MoverCategory::DayGainers => "Day Gainers",
            MoverCategory::DayLosers => "Day Losers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_symbols() {
        assert_eq!(canonical_symbol(" AaPl "), "aapl");
        assert_eq!(display_symbol("aapl"), "AAPL");
        assert_eq!(canonical_symbol("^GSPC"), "^gspc");
    }

    #[test]
    fn placeholder_requires_both_zero_price_and_empty_name() {
        let missing = Quote {
            symbol: "zzznope".to_string(),
            name: String::new(),
            price: 0.0,
            price_change: 0.0,
            percent_change: 0.0,
        };
        assert!(missing.is_placeholder());

        let real_zero = Quote {
            name: "Worthless Corp".to_string(),
            ..missing.clone()
        };
        assert!(!real_zero.is_placeholder());
    }

    #[test]
    fn category_ids_round_trip() {
        for category in MoverCategory::ALL {
            assert_eq!(MoverCategory::from_id(category.id()), Some(category));
        }
        assert_eq!(MoverCategory::from_id("TRENDING"), None);
    }
}
