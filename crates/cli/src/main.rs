mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricemath_core::{IndicatorConfig, PriceSeries, PriceSource};
use pricemath_data::{csv_loader, CsvPriceSource};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pricemath")]
#[command(about = "Technical indicators (SMA, EMA, RSI, steepness) over closing prices")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Indicator config file (TOML)
    #[arg(short, long, env = "PRICEMATH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an indicator report for one CSV file
    Report {
        /// Path to CSV data file
        #[arg(short, long)]
        data: PathBuf,

        /// Symbol to show (defaults to the file name)
        #[arg(short, long)]
        symbol: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        periods: PeriodOverrides,
    },

    /// List symbols available in a directory of CSV files
    Symbols {
        /// Directory holding <SYMBOL>.csv files
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// List available indicators and the closes each one needs
    Indicators {
        #[command(flatten)]
        periods: PeriodOverrides,
    },
}

/// Per-run period overrides; these win over the config file.
#[derive(clap::Args)]
struct PeriodOverrides {
    /// SMA period
    #[arg(long)]
    sma: Option<usize>,

    /// EMA period
    #[arg(long)]
    ema: Option<usize>,

    /// RSI period
    #[arg(long)]
    rsi: Option<usize>,

    /// Steepness period
    #[arg(long)]
    steep: Option<usize>,
}

impl PeriodOverrides {
    fn apply(&self, mut config: IndicatorConfig) -> Result<IndicatorConfig> {
        if let Some(p) = self.sma {
            config.sma_period = p;
        }
        if let Some(p) = self.ema {
            config.ema_period = p;
        }
        if let Some(p) = self.rsi {
            config.rsi_period = p;
        }
        if let Some(p) = self.steep {
            config.steep_period = p;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            data,
            symbol,
            json,
            periods,
        } => {
            let config = periods.apply(config)?;
            run_report(&config, &data, symbol, json)?;
        }
        Commands::Symbols { dir } => {
            let source = CsvPriceSource::new(&dir);
            let symbols = source
                .available_symbols()
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            if symbols.is_empty() {
                println!("No CSV files in {}", dir.display());
            }
            for symbol in symbols {
                println!("  {symbol}");
            }
        }
        Commands::Indicators { periods } => {
            let config = periods.apply(config)?;
            println!("Available indicators:");
            for ind in report::configured_indicators(&config)? {
                println!(
                    "  {:<6} period {:<4} needs {} closes",
                    ind.kind().to_string(),
                    ind.period(),
                    ind.min_len()
                );
            }
            println!(
                "  Quantile q={} and {}-period change are always reported",
                config.quantile, config.change_period
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<IndicatorConfig> {
    match path {
        Some(path) => {
            let config = IndicatorConfig::load(path)?;
            tracing::info!(path = %path.display(), "Using indicator config");
            Ok(config)
        }
        None => Ok(IndicatorConfig::default()),
    }
}

fn run_report(
    config: &IndicatorConfig,
    data_path: &Path,
    symbol: Option<String>,
    json: bool,
) -> Result<()> {
    tracing::info!(data = %data_path.display(), "Building indicator report");

    let bars = csv_loader::load_bars_from_csv(data_path)?;
    if bars.is_empty() {
        anyhow::bail!("No bars loaded from CSV file");
    }

    let name = symbol.unwrap_or_else(|| bars[0].symbol.clone());
    let series = PriceSeries::from_bars(name, &bars)?;
    let report = report::build_report(config, &series)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(args: &[&str]) -> PeriodOverrides {
        let argv = ["pricemath", "indicators"].iter().chain(args.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Indicators { periods } => periods,
            _ => panic!("expected the indicators command"),
        }
    }

    fn config_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricemath.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_flag_beats_config_file() {
        let (_dir, path) = config_file("rsi_period = 5\n");
        let config = load_config(Some(path.as_path())).unwrap();
        let config = overrides(&["--rsi", "9"]).apply(config).unwrap();
        assert_eq!(config.rsi_period, 9);
    }

    #[test]
    fn test_config_file_beats_defaults() {
        let (_dir, path) = config_file("rsi_period = 5\nsma_period = 50\n");
        let config = load_config(Some(path.as_path())).unwrap();
        let config = overrides(&[]).apply(config).unwrap();
        assert_eq!(config.rsi_period, 5);
        assert_eq!(config.sma_period, 50);
        assert_eq!(config.ema_period, IndicatorConfig::default().ema_period);
    }

    #[test]
    fn test_no_config_file_uses_defaults() {
        let config = overrides(&["--ema", "12"]).apply(load_config(None).unwrap()).unwrap();
        assert_eq!(config.ema_period, 12);
        assert_eq!(config.rsi_period, 14);
    }

    #[test]
    fn test_zero_period_flag_rejected() {
        let err = overrides(&["--steep", "0"])
            .apply(IndicatorConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("steep_period"));
    }
}
