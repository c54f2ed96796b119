//! Panel loading from a polars `DataFrame`.

use capsort_primitives::{SecurityId, Ticker};
use capsort_utils::parse_date_column;
use polars::prelude::*;
use tracing::debug;

use crate::{CleaningReport, Observation, Panel, PanelBuilder, PanelConfig, PanelError};

/// Build a panel from a long-format frame with one row per (date, security).
///
/// Column names come from `config.columns`. Numeric columns may be stored as
/// strings (CRSP flags such as `"C"` or `"B"` in `RET`); such cells count as
/// unparsable and become missing. Rows without a valid date or security id
/// are dropped.
///
/// # Errors
/// Returns an error if a required column is absent or has an unusable type,
/// or if no row survives cleaning.
pub fn panel_from_frame(
    df: &DataFrame,
    config: &PanelConfig,
) -> Result<(Panel, CleaningReport), PanelError> {
    config.validate()?;
    let cols = &config.columns;

    let dates = parse_date_column(column(df, &cols.date)?)?;
    let ids = security_ids(column(df, &cols.security_id)?)?;
    let (returns, bad_returns) = numeric(column(df, &cols.ret)?)?;

    let (market_caps, prices, shares, bad_prices) = match &cols.market_cap {
        Some(name) => {
            let (caps, bad) = numeric(column(df, name)?)?;
            (Some(caps), None, None, bad)
        }
        None => {
            let (prices, bad) = numeric(column(df, &cols.price)?)?;
            let (shares, _) = numeric(column(df, &cols.shares_outstanding)?)?;
            (None, Some(prices), Some(shares), bad)
        }
    };

    let tickers = match &cols.ticker {
        Some(name) if df.get_column_index(name).is_some() => Some(strings(column(df, name)?)?),
        _ => None,
    };

    let benchmarks = config
        .benchmark_columns
        .iter()
        .map(|name| -> Result<_, PanelError> { Ok((name.as_str(), numeric(column(df, name)?)?.0)) })
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = PanelBuilder::with_config(config.clone());
    builder.record_unparsable_returns(bad_returns);
    builder.record_unparsable_prices(bad_prices);

    let mut unkeyed = 0;
    for row in 0..df.height() {
        let (Some(date), Some(id)) = (dates[row], ids[row]) else {
            unkeyed += 1;
            continue;
        };
        let mut obs = Observation::new(date, id).with_return(returns[row]);
        obs = match (&market_caps, &prices, &shares) {
            (Some(caps), _, _) => obs.with_market_cap(caps[row]),
            (None, Some(p), Some(s)) => obs.with_price(p[row], s[row]),
            _ => obs,
        };
        if let Some(ticker) = tickers.as_ref().and_then(|t| t[row].clone()) {
            obs = obs.with_ticker(ticker);
        }
        builder.push(obs);
        for (name, values) in &benchmarks {
            builder.push_benchmark(name, date, values[row]);
        }
    }
    builder.record_unkeyed(unkeyed);
    debug!(rows = df.height(), unkeyed, "frame rows pushed");

    builder.build()
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, PanelError> {
    df.column(name).map_err(|_| PanelError::MissingColumn(name.to_string()))
}

fn unsupported(column: &Column) -> PanelError {
    PanelError::UnsupportedType {
        column: column.name().to_string(),
        dtype: column.dtype().to_string(),
    }
}

/// Read a numeric column, returning values and the count of unparsable cells.
fn numeric(column: &Column) -> Result<(Vec<Option<f64>>, usize), PanelError> {
    match column.dtype() {
        DataType::String => {
            let mut bad = 0;
            let values = column
                .str()?
                .into_iter()
                .map(|cell| {
                    let cell = cell?.trim();
                    if cell.is_empty() {
                        return None;
                    }
                    let parsed = cell.parse::<f64>().ok().filter(|v| v.is_finite());
                    if parsed.is_none() {
                        bad += 1;
                    }
                    parsed
                })
                .collect();
            Ok((values, bad))
        }
        dtype if dtype.is_primitive_numeric() => {
            let values = column.cast(&DataType::Float64)?;
            Ok((values.f64()?.into_iter().collect(), 0))
        }
        _ => Err(unsupported(column)),
    }
}

fn security_ids(column: &Column) -> Result<Vec<Option<SecurityId>>, PanelError> {
    match column.dtype() {
        DataType::String => Ok(column
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(|s| s.trim().parse::<u64>().ok()).map(SecurityId))
            .collect()),
        dtype if dtype.is_integer() => {
            let values = column.cast(&DataType::Int64)?;
            Ok(values
                .i64()?
                .into_iter()
                .map(|v| v.and_then(|v| u64::try_from(v).ok()).map(SecurityId))
                .collect())
        }
        _ => Err(unsupported(column)),
    }
}

fn strings(column: &Column) -> Result<Vec<Option<Ticker>>, PanelError> {
    let values = column.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::trim).filter(|s| !s.is_empty()).map(Ticker::from))
        .collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn crsp_frame() -> DataFrame {
        df! {
            "date" => [20_240_131i64, 20_240_131, 20_240_131, 20_240_229, 20_240_229, 20_240_229],
            "PERMNO" => [10_001i64, 10_002, 10_003, 10_001, 10_002, 10_003],
            "TICKER" => ["AAA", "BBB", "CCC", "AAA", "BBB", ""],
            "PRC" => ["10.0", "-20.0", "5", "11.0", "C", "5.5"],
            "SHROUT" => [100.0, 100.0, 100.0, 100.0, 100.0, 100.0],
            "RET" => ["0.01", "B", "-0.02", "0.10", "-0.05", "0.10"],
        }
        .unwrap()
    }

    #[test]
    fn loads_crsp_layout() {
        let (panel, report) = panel_from_frame(&crsp_frame(), &PanelConfig::default()).unwrap();

        assert_eq!(panel.n_dates(), 2);
        assert_eq!(panel.n_securities(), 3);
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.unparsable_returns, 1);
        assert_eq!(report.unparsable_prices, 1);

        let jan = panel.cross_section(0);
        assert_eq!(jan.ret(SecurityId(10_002)), None);
        assert!(jan.is_observed(SecurityId(10_002)));
        assert_relative_eq!(jan.market_cap(SecurityId(10_002)).unwrap(), 2_000.0);
        assert_eq!(jan.ticker(SecurityId(10_001)).map(Ticker::as_str), Some("AAA"));

        let feb = panel.cross_section(1);
        assert_eq!(feb.market_cap(SecurityId(10_002)), None);
        assert_eq!(feb.ticker(SecurityId(10_003)), None);
    }

    #[test]
    fn rows_without_key_are_dropped() {
        let df = df! {
            "date" => [Some(20_240_131i64), None, Some(20_240_131)],
            "PERMNO" => [Some(1i64), Some(2), None],
            "PRC" => [1.0, 1.0, 1.0],
            "SHROUT" => [1.0, 1.0, 1.0],
            "RET" => [0.1, 0.2, 0.3],
        }
        .unwrap();
        let (panel, report) = panel_from_frame(&df, &PanelConfig::default()).unwrap();

        assert_eq!(panel.n_securities(), 1);
        assert_eq!(report.rows_without_key, 2);
        assert_eq!(report.rows_read, 3);
    }

    #[test]
    fn precomputed_market_cap_column() {
        let mut config = PanelConfig::default();
        config.columns.market_cap = Some("cap".to_string());
        config.columns.ticker = None;
        let df = df! {
            "date" => ["2024-01-31"],
            "PERMNO" => ["7"],
            "cap" => [123.0],
            "RET" => [0.5],
        }
        .unwrap();
        let (panel, _) = panel_from_frame(&df, &config).unwrap();
        assert_eq!(panel.cross_section(0).market_cap(SecurityId(7)), Some(123.0));
    }

    #[test]
    fn benchmark_columns_are_carried() {
        let config = PanelConfig { benchmark_columns: vec!["vwretd".into()], ..Default::default() };
        let df = df! {
            "date" => [20_240_131i64, 20_240_131],
            "PERMNO" => [1i64, 2],
            "PRC" => [1.0, 1.0],
            "SHROUT" => [1.0, 1.0],
            "RET" => [0.1, 0.2],
            "vwretd" => [None, Some(0.7)],
        }
        .unwrap();
        let (panel, _) = panel_from_frame(&df, &config).unwrap();
        assert_eq!(panel.benchmark("vwretd"), Some(&[Some(0.7)][..]));
    }

    #[test]
    fn missing_column_reported() {
        let df = df! { "date" => [20_240_131i64] }.unwrap();
        assert!(matches!(
            panel_from_frame(&df, &PanelConfig::default()),
            Err(PanelError::MissingColumn(name)) if name == "PERMNO"
        ));
    }
}
