use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Context, Result};
use crate::quote::Quote;

/// Persist a resolved batch to CSV. Unresolved symbols keep their row with
/// empty value fields so the export mirrors the full request.
pub fn save_quotes_csv<P: AsRef<Path>>(
    path: P,
    quotes: &BTreeMap<String, Option<Quote>>,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).context("Failed to create CSV writer")?;

    writer.write_record(["symbol", "name", "price", "priceChange", "percentChange"])?;

    for (symbol, quote) in quotes {
        match quote {
            Some(quote) => {
                let price = quote.price.to_string();
                let price_change = quote.price_change.to_string();
                let percent_change = quote.percent_change.to_string();
                writer.write_record([
                    symbol.as_str(),
                    quote.name.as_str(),
                    price.as_str(),
                    price_change.as_str(),
                    percent_change.as_str(),
                ])?
            }
            None => writer.write_record([symbol.as_str(), "", "", "", ""])?,
        }
    }

    writer.flush()?;
    Ok(())
}
