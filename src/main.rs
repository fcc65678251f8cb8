use anyhow::Result;
use clap::Parser;

use finch::cli::{parse_category, Cli, Commands};
use finch::config::FinchConfig;
use finch::error::AppError;
use finch::export::save_quotes_csv;
use finch::fetch::HttpTransport;
use finch::quote::{display_symbol, Quote};
use finch::service::QuoteService;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FinchConfig::load(path)?,
        None => FinchConfig::builtin(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(cache_file) = &cli.cache_file {
        config.cache_file = cache_file.clone();
    }

    let service = QuoteService::from_config(config);

    if service.demo_active() {
        println!("Demo mode active: showing sample data. Run `finch exit-demo` to try live data.");
    }

    match cli.command {
        Commands::Quote { ref symbol } => {
            match service.get_quote(symbol).await {
                Some(quote) => print_quote(&quote),
                None => println!("{}: no data", display_symbol(symbol)),
            }
        }
        Commands::Quotes {
            ref symbols,
            ref csv,
        } => {
            if symbols.is_empty() {
                return Err(AppError::message("No symbols given").into());
            }
            let results = service.resolve_quotes(symbols).await;
            for (symbol, quote) in &results {
                match quote {
                    Some(quote) => print_quote(quote),
                    None => println!("{}: no data", symbol),
                }
            }
            if let Some(path) = csv {
                save_quotes_csv(path, &results)?;
                println!("Saved {} rows to {:?}", results.len(), path);
            }
        }
        Commands::Movers { ref category } => {
            let category = parse_category(category).ok_or_else(|| {
                AppError::message(format!(
                    "Unknown category `{}` (expected gainers, losers or actives)",
                    category
                ))
            })?;
            let symbols = service.movers_symbols(category).await;
            if symbols.is_empty() {
                println!("{}: no data", category.label());
            } else {
                println!("{}:", category.label());
                for (rank, symbol) in symbols.iter().enumerate() {
                    println!("  {}. {}", rank + 1, symbol);
                }
            }
        }
        Commands::Trending => {
            let trending = service.trending().await;
            if trending.is_empty() {
                println!("Trending: no data");
            } else {
                for quote in &trending {
                    print_quote(quote);
                }
            }
        }
        Commands::Prewarm => {
            let report = service.prewarm().await;
            for label in &report.warmed {
                println!("warmed {}", label);
            }
            for error in &report.errors {
                println!("failed {}", error);
            }
        }
        Commands::ExitDemo => {
            service.exit_demo();
            println!("Demo mode cleared; next calls will use live data.");
        }
        Commands::Status => {
            let state = service.demo_state();
            println!(
                "demo: {} | consecutive failures: {} | day: {}",
                if state.active { "active" } else { "inactive" },
                state.consecutive_failures,
                state.date_stamp
            );
        }
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    let name = if quote.name.is_empty() {
        "-"
    } else {
        quote.name.as_str()
    };
    println!(
        "{:<8} {:<32} {:>10.2} {:>+9.2} {:>+7.2}%",
        display_symbol(&quote.symbol),
        name,
        quote.price,
        quote.price_change,
        quote.percent_change
    );
}
