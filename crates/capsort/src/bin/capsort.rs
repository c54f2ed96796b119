//! Command-line interface for size-sorted portfolio formation.
//!
//! Usage: `capsort run --input crsp.csv --out-dir out/ [--config engine.json]`
//! Example: `capsort run --input crsp.csv --exchange-codes 1,2,3 --share-codes 10,11`
//! Example: `capsort portfolios --cadences annual --weightings vw --schemes top`

use std::{
    fs,
    path::{Path, PathBuf},
};

use capsort::{
    math::GapPolicy,
    model::{EngineConfig, PortfolioEngine, SeriesSummary},
    panel::panel_from_frame,
    primitives::{Cadence, Scheme, Weighting},
    utils::{UniverseFilter, filter_universe},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use polars::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "capsort")]
#[command(about = "Size-sorted equity portfolio formation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Form portfolios from a CSV panel and write returns and prices
    Run {
        /// Input CSV with one row per (date, security)
        #[arg(long)]
        input: PathBuf,
        /// Output directory for returns.csv and prices.csv
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
        /// JSON engine configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// First output date (inclusive)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last output date (inclusive)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Accepted exchange codes, comma separated
        #[arg(long, value_delimiter = ',')]
        exchange_codes: Vec<i64>,
        /// Accepted share codes, comma separated
        #[arg(long, value_delimiter = ',')]
        share_codes: Vec<i64>,
        /// Treatment of interior gaps when compounding
        #[arg(long, value_enum)]
        gap_policy: Option<GapArg>,
        #[command(flatten)]
        selection: Selection,
    },
    /// List the portfolios a configuration defines
    Portfolios {
        /// JSON engine configuration
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        selection: Selection,
    },
}

/// Overrides for the portfolio definitions of a configuration.
#[derive(Args)]
struct Selection {
    /// Rebalancing cadences, comma separated (period, monthly, yearly)
    #[arg(long, value_delimiter = ',')]
    cadences: Vec<Cadence>,
    /// Weightings, comma separated (ew, vw)
    #[arg(long, value_delimiter = ',')]
    weightings: Vec<Weighting>,
    /// Portfolio schemes, comma separated (decile, top-n)
    #[arg(long, value_delimiter = ',')]
    schemes: Vec<Scheme>,
}

impl Selection {
    fn apply(self, config: &mut EngineConfig) {
        if !self.cadences.is_empty() {
            config.cadences = self.cadences;
        }
        if !self.weightings.is_empty() {
            config.weightings = self.weightings;
        }
        if !self.schemes.is_empty() {
            config.schemes = self.schemes;
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GapArg {
    Reject,
    ForwardFill,
}

impl From<GapArg> for GapPolicy {
    fn from(arg: GapArg) -> Self {
        match arg {
            GapArg::Reject => Self::Reject,
            GapArg::ForwardFill => Self::ForwardFill,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            input,
            out_dir,
            config,
            start,
            end,
            exchange_codes,
            share_codes,
            gap_policy,
            selection,
        } => load_config(config.as_deref()).and_then(|mut config| {
            selection.apply(&mut config);
            config.start = start.or(config.start);
            config.end = end.or(config.end);
            if let Some(policy) = gap_policy {
                config.gap_policy = policy.into();
            }
            let filter = UniverseFilter::new()
                .with_exchange_codes(exchange_codes)
                .with_share_codes(share_codes);
            run(&input, &out_dir, config, &filter)
        }),
        Commands::Portfolios { config, selection } => {
            load_config(config.as_deref()).and_then(|mut config| {
                selection.apply(&mut config);
                list_portfolios(config)
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let config = serde_json::from_str(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn run(
    input: &Path,
    out_dir: &Path,
    config: EngineConfig,
    filter: &UniverseFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PortfolioEngine::new(config)?;

    // Full-file inference keeps flag-bearing numeric columns (e.g. RET = "C") as strings.
    let mut lf =
        LazyCsvReader::new(input).with_has_header(true).with_infer_schema_length(None).finish()?;
    if !filter.is_unrestricted() {
        lf = filter_universe(lf, filter);
    }
    let df = lf.collect()?;
    info!(rows = df.height(), input = %input.display(), "loaded input");

    let (panel, report) = panel_from_frame(&df, &engine.config().panel)?;
    if report.corrections() > 0 {
        warn!(
            extreme_returns = report.extreme_returns,
            unparsable_returns = report.unparsable_returns,
            unparsable_prices = report.unparsable_prices,
            duplicates = report.duplicates,
            rows_without_key = report.rows_without_key,
            "observations corrected to missing"
        );
    }

    let returns = engine.run(&panel)?;
    let prices = engine.prices(&returns)?;

    fs::create_dir_all(out_dir)?;
    write_csv(&mut returns.to_frame()?, &out_dir.join("returns.csv"))?;
    write_csv(&mut prices.to_frame()?, &out_dir.join("prices.csv"))?;
    info!(out_dir = %out_dir.display(), series = returns.n_series(), "wrote outputs");

    print_summary(&engine.summarize(&prices));
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

fn list_portfolios(config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let portfolios = config.portfolios();
    println!("Portfolios ({} total)\n", portfolios.len());
    for id in portfolios {
        println!("  {:<22} {} {} {}", id.name(), id.cadence, id.weighting, id.scheme());
    }
    Ok(())
}

fn fmt_stat(value: Option<f64>, pct: bool) -> String {
    match value {
        Some(v) if pct => format!("{:>9.2}%", v * 100.0),
        Some(v) => format!("{v:>10.2}"),
        None => format!("{:>10}", "n/a"),
    }
}

fn print_summary(summaries: &[SeriesSummary]) {
    println!("\n{:<22} {:>10} {:>10} {:>10} {:>10}", "series", "final", "cagr", "vol", "sharpe");
    println!("{}", "-".repeat(66));
    for s in summaries {
        println!(
            "{:<22} {:>10.4} {} {} {}",
            s.name,
            s.final_price,
            fmt_stat(s.cagr, true),
            fmt_stat(s.volatility, true),
            fmt_stat(s.sharpe, false)
        );
    }
}

#[cfg(test)]
mod tests {
    use capsort::primitives::PortfolioId;

    use super::*;

    #[test]
    fn selection_flags_accept_aliases() {
        let cli = Cli::try_parse_from([
            "capsort",
            "portfolios",
            "--cadences",
            "annual",
            "--weightings",
            "vw",
            "--schemes",
            "top",
        ])
        .unwrap();
        let Commands::Portfolios { selection, .. } = cli.command else {
            panic!("expected the portfolios subcommand");
        };

        let mut config = EngineConfig { top_n_sizes: vec![50], ..Default::default() };
        selection.apply(&mut config);
        let names: Vec<String> = config.portfolios().iter().map(PortfolioId::name).collect();
        assert_eq!(names, vec!["yearly_vw_top50".to_string()]);
    }

    #[test]
    fn unknown_cadence_is_rejected() {
        assert!(Cli::try_parse_from(["capsort", "portfolios", "--cadences", "hourly"]).is_err());
    }
}
