//! Cointrage - exchange market discovery CLI
//!
//! Lists markets and fetches normalized order book snapshots from the
//! built-in exchange catalog.

mod config;

use clap::{Parser, Subcommand};
use config::{AppConfig, ConfigError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cointrage_core::{CanonicalSymbol, MarketPair, QuoteAllowList};
use cointrage_exchanges::{
    first_non_empty_book, list_all, AdapterRegistry, ExchangeError, FailurePolicy, ReqwestTransport,
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("invalid market {input:?}: {reason}")]
    InvalidMarket { input: String, reason: String },

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Cointrage CLI
#[derive(Parser, Debug)]
#[command(name = "cointrage")]
#[command(about = "Crypto exchange market discovery and order book snapshots", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "cointrage.json")]
    config: PathBuf,

    /// Log level: trace, debug, info, warn, error (overrides config)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Restrict to these exchanges (repeatable, overrides config)
    #[arg(short, long = "exchange")]
    exchanges: Vec<String>,

    /// Comma-separated quote allow-list (overrides config)
    #[arg(short, long, value_delimiter = ',')]
    quotes: Vec<String>,

    /// Abort on the first failing exchange or market
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the enabled exchange names
    Exchanges,
    /// List markets on every enabled exchange, grouped by quote
    Markets,
    /// Fetch one order book snapshot
    Book {
        exchange: String,
        /// Market as BASE/QUOTE, e.g. ETH/BTC
        market: String,
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Fetch the first two-sided book among several bases of one quote
    FirstBook {
        exchange: String,
        #[arg(long)]
        quote: String,
        #[arg(required = true)]
        bases: Vec<String>,
        #[arg(short, long)]
        depth: Option<usize>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn parse_symbol(input: &str) -> Result<CanonicalSymbol, CliError> {
    CanonicalSymbol::parse(input).map_err(|e| CliError::InvalidMarket {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parse `BASE/QUOTE` into a pair.
fn parse_market(input: &str) -> Result<MarketPair, CliError> {
    let (base, quote) = input.split_once('/').ok_or_else(|| CliError::InvalidMarket {
        input: input.to_string(),
        reason: "expected BASE/QUOTE".to_string(),
    })?;
    Ok(MarketPair::new(parse_symbol(quote)?, parse_symbol(base)?))
}

/// Fold command-line overrides into the file configuration.
fn apply_overrides(mut config: AppConfig, args: &Args) -> Result<AppConfig, ConfigError> {
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if !args.exchanges.is_empty() {
        config.exchanges = args.exchanges.clone();
    }
    if !args.quotes.is_empty() {
        config.quotes = QuoteAllowList::new(&args.quotes);
    }
    if args.fail_fast {
        config.failure_policy = FailurePolicy::FailFast;
    }
    config.validate()?;
    Ok(config)
}

fn build_registry(config: &AppConfig) -> Result<AdapterRegistry, CliError> {
    let transport = Arc::new(ReqwestTransport::new(config.request_timeout(), &config.user_agent)?);
    let mut registry = AdapterRegistry::from_profiles(config.profiles()?, transport, &config.adapter_settings())?;
    if !config.exchanges.is_empty() {
        registry.retain_named(&config.exchanges)?;
    }
    debug!("Enabled exchanges: {:?}", registry.names());
    Ok(registry)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> Result<(), CliError> {
    let registry = build_registry(config)?;

    match command {
        Command::Exchanges => {
            for name in registry.names() {
                println!("{}", name);
            }
        }
        Command::Markets => {
            let listings = list_all(&registry, config.failure_policy).await?;
            print_json(&listings)?;
        }
        Command::Book {
            exchange,
            market,
            depth,
        } => {
            let pair = parse_market(&market)?;
            let adapter = registry.get(&exchange)?;
            let book = adapter.get_order_book(&pair, depth).await?;
            info!(
                "{}: {} has {} asks, {} bids",
                adapter.name(),
                pair,
                book.asks.len(),
                book.bids.len()
            );
            print_json(&book)?;
        }
        Command::FirstBook {
            exchange,
            quote,
            bases,
            depth,
        } => {
            let quote = parse_symbol(&quote)?;
            let bases = bases
                .iter()
                .map(|b| parse_symbol(b))
                .collect::<Result<Vec<_>, _>>()?;
            let adapter = registry.get(&exchange)?;
            let book = first_non_empty_book(adapter.as_ref(), &quote, &bases, depth, config.failure_policy).await?;
            match book {
                Some(book) => print_json(&book)?,
                None => info!("{}: No two-sided book among {} markets", adapter.name(), bases.len()),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let config = match AppConfig::load_or_default(&args.config).and_then(|c| apply_overrides(c, &args)) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_level);
    debug!("Configuration: {:?}", config);

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_market() {
        assert_eq!(parse_market("eth/btc").unwrap(), MarketPair::from_strs("BTC", "ETH"));
        assert!(matches!(parse_market("ETHBTC"), Err(CliError::InvalidMarket { .. })));
        assert!(matches!(parse_market("/BTC"), Err(CliError::InvalidMarket { .. })));
    }

    #[test]
    fn test_args_book_command() {
        let args = Args::try_parse_from(["cointrage", "-q", "btc,eth", "book", "binance", "ETH/BTC", "--depth", "5"])
            .unwrap();
        assert_eq!(args.quotes, vec!["btc".to_string(), "eth".to_string()]);
        assert_eq!(
            args.command,
            Command::Book {
                exchange: "binance".to_string(),
                market: "ETH/BTC".to_string(),
                depth: Some(5),
            }
        );
    }

    #[test]
    fn test_first_book_requires_bases() {
        assert!(Args::try_parse_from(["cointrage", "first-book", "binance", "--quote", "BTC"]).is_err());
        let args = Args::try_parse_from(["cointrage", "first-book", "binance", "--quote", "BTC", "ETH", "LTC"]).unwrap();
        assert!(matches!(args.command, Command::FirstBook { ref bases, .. } if bases.len() == 2));
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "cointrage",
            "-e",
            "gdax",
            "-q",
            "usd",
            "--fail-fast",
            "-l",
            "debug",
            "markets",
        ])
        .unwrap();
        let config = apply_overrides(AppConfig::default(), &args).unwrap();
        assert_eq!(config.exchanges, vec!["gdax".to_string()]);
        assert_eq!(config.quotes, QuoteAllowList::new(["USD"]));
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_build_registry_filters_exchanges() {
        let config = AppConfig {
            exchanges: vec!["Bittrex".to_string(), "okex".to_string()],
            ..AppConfig::default()
        };
        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.names(), vec!["bittrex".to_string(), "okex".to_string()]);

        let config = AppConfig {
            exchanges: vec!["mtgox".to_string()],
            ..AppConfig::default()
        };
        assert!(matches!(build_registry(&config), Err(CliError::Exchange(_))));
    }
}
