//! Panel construction from raw observations.

use std::collections::{BTreeMap, BTreeSet, HashMap, btree_map::Entry};

use capsort_primitives::{Date, SecurityId, Ticker};
use ndarray::Array2;
use tracing::{info, warn};

use crate::{Observation, Panel, PanelConfig, PanelError};

/// Data-quality corrections made while building a panel.
///
/// Every count is a correction to "missing"; none of them aborts the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Rows pushed into the builder.
    pub rows_read: usize,
    /// Returns below the validity floor.
    pub extreme_returns: usize,
    /// Return cells that were present but not numeric.
    pub unparsable_returns: usize,
    /// Price cells that were present but not numeric.
    pub unparsable_prices: usize,
    /// Rows dropped as repeated (date, security) keys.
    pub duplicates: usize,
    /// Rows dropped for lacking a date or security id.
    pub rows_without_key: usize,
}

impl CleaningReport {
    /// Total number of corrections.
    #[must_use]
    pub const fn corrections(&self) -> usize {
        self.extreme_returns
            + self.unparsable_returns
            + self.unparsable_prices
            + self.duplicates
            + self.rows_without_key
    }
}

#[derive(Debug)]
struct Row {
    ret: Option<f64>,
    market_cap: Option<f64>,
    ticker: Option<Ticker>,
}

/// Accumulates observations and builds an immutable [`Panel`].
///
/// Rows are cleaned as they are pushed; the first row seen for a
/// (date, security) key wins.
#[derive(Debug)]
pub struct PanelBuilder {
    config: PanelConfig,
    rows: BTreeMap<(Date, SecurityId), Row>,
    benchmarks: BTreeMap<String, BTreeMap<Date, f64>>,
    report: CleaningReport,
}

impl PanelBuilder {
    /// Create a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PanelConfig::default())
    }

    /// Create a builder with custom configuration.
    #[must_use]
    pub fn with_config(config: PanelConfig) -> Self {
        let benchmarks =
            config.benchmark_columns.iter().map(|name| (name.clone(), BTreeMap::new())).collect();
        Self { config, rows: BTreeMap::new(), benchmarks, report: CleaningReport::default() }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Corrections made so far.
    #[must_use]
    pub const fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Add one observation.
    pub fn push(&mut self, obs: Observation) {
        self.report.rows_read += 1;

        let ret = match obs.ret {
            Some(r) if !r.is_finite() => {
                self.report.unparsable_returns += 1;
                None
            }
            Some(r) if r < self.config.min_valid_return => {
                self.report.extreme_returns += 1;
                None
            }
            other => other,
        };
        let market_cap = obs.resolved_market_cap();

        match self.rows.entry((obs.date, obs.security)) {
            Entry::Occupied(_) => self.report.duplicates += 1,
            Entry::Vacant(slot) => {
                slot.insert(Row { ret, market_cap, ticker: obs.ticker });
            }
        }
    }

    /// Record a benchmark value; the first valid value of a date wins.
    ///
    /// Names not listed in the configuration are ignored.
    pub fn push_benchmark(&mut self, name: &str, date: Date, value: Option<f64>) {
        let Some(series) = self.benchmarks.get_mut(name) else {
            return;
        };
        if let Some(v) = value.filter(|v| v.is_finite()) {
            series.entry(date).or_insert(v);
        }
    }

    /// Count rows the loader could not key and did not push.
    pub const fn record_unkeyed(&mut self, n: usize) {
        self.report.rows_read += n;
        self.report.rows_without_key += n;
    }

    /// Count return cells the loader could not parse.
    pub const fn record_unparsable_returns(&mut self, n: usize) {
        self.report.unparsable_returns += n;
    }

    /// Count price cells the loader could not parse.
    pub const fn record_unparsable_prices(&mut self, n: usize) {
        self.report.unparsable_prices += n;
    }

    /// Build the panel.
    ///
    /// # Returns
    /// The panel and the cleaning report.
    ///
    /// # Errors
    /// Returns `PanelError::Empty` if no row was kept.
    pub fn build(self) -> Result<(Panel, CleaningReport), PanelError> {
        if self.rows.is_empty() {
            return Err(PanelError::Empty);
        }

        let dates: Vec<Date> =
            self.rows.keys().map(|(d, _)| *d).collect::<BTreeSet<_>>().into_iter().collect();
        let securities: Vec<SecurityId> =
            self.rows.keys().map(|(_, s)| *s).collect::<BTreeSet<_>>().into_iter().collect();
        let date_pos: HashMap<Date, usize> =
            dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();
        let sec_pos: HashMap<SecurityId, usize> =
            securities.iter().enumerate().map(|(i, &s)| (s, i)).collect();

        let shape = (dates.len(), securities.len());
        let mut returns = Array2::from_elem(shape, None);
        let mut market_caps = Array2::from_elem(shape, None);
        let mut observed = Array2::from_elem(shape, false);
        let mut tickers = HashMap::new();

        for ((date, security), row) in self.rows {
            let cell = (date_pos[&date], sec_pos[&security]);
            returns[[cell.0, cell.1]] = row.ret;
            market_caps[[cell.0, cell.1]] = row.market_cap;
            observed[[cell.0, cell.1]] = true;
            if let Some(ticker) = row.ticker {
                tickers.insert(cell, ticker);
            }
        }

        let benchmarks = self
            .benchmarks
            .into_iter()
            .map(|(name, values)| {
                let aligned = dates.iter().map(|d| values.get(d).copied()).collect();
                (name, aligned)
            })
            .collect();

        let report = self.report;
        info!(
            dates = dates.len(),
            securities = securities.len(),
            rows = report.rows_read,
            extreme_returns = report.extreme_returns,
            unparsable_returns = report.unparsable_returns,
            duplicates = report.duplicates,
            "panel built"
        );
        if report.extreme_returns > 0 {
            warn!(
                count = report.extreme_returns,
                floor = self.config.min_valid_return,
                "returns below floor set to missing"
            );
        }

        let panel = Panel::from_parts(
            dates,
            securities,
            returns,
            market_caps,
            observed,
            tickers,
            benchmarks,
        );
        Ok((panel, report))
    }
}

impl Default for PanelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Observation> for PanelBuilder {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        for obs in iter {
            self.push(obs);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn d(month: u32, day: u32) -> Date {
        Date::from_ymd_opt(2024, month, day).unwrap()
    }

    fn obs(date: Date, id: u64, ret: Option<f64>, cap: Option<f64>) -> Observation {
        Observation::new(date, SecurityId(id)).with_return(ret).with_market_cap(cap)
    }

    #[test]
    fn axes_are_outer_union() {
        let mut builder = PanelBuilder::new();
        builder.push(obs(d(1, 2), 3, Some(1.0), Some(10.0)));
        builder.push(obs(d(1, 3), 1, Some(2.0), Some(20.0)));
        let (panel, _) = builder.build().unwrap();

        assert_eq!(panel.dates(), &[d(1, 2), d(1, 3)]);
        assert_eq!(panel.securities(), &[SecurityId(1), SecurityId(3)]);

        let first = panel.cross_section(0);
        assert!(first.is_observed(SecurityId(3)));
        assert!(!first.is_observed(SecurityId(1)));
        assert_eq!(first.ret(SecurityId(1)), None);
        assert_eq!(panel.n_observed(), 2);
    }

    #[test]
    fn extreme_returns_become_missing_and_are_counted() {
        let mut builder = PanelBuilder::new();
        builder.extend([
            obs(d(1, 2), 1, Some(-60.0), Some(1.0)),
            obs(d(1, 2), 2, Some(-60.5), Some(1.0)),
            obs(d(1, 2), 3, Some(-99.0), Some(1.0)),
        ]);
        let (panel, report) = builder.build().unwrap();

        assert_eq!(report.extreme_returns, 2);
        let xs = panel.cross_section(0);
        assert_eq!(xs.ret(SecurityId(1)), Some(-60.0));
        assert_eq!(xs.ret(SecurityId(2)), None);
        // still observed: the row exists, the value does not
        assert!(xs.is_observed(SecurityId(2)));
    }

    #[test]
    fn duplicates_keep_first_row() {
        let mut builder = PanelBuilder::new();
        builder.push(obs(d(1, 2), 1, Some(1.0), Some(5.0)).with_ticker("MSFT"));
        builder.push(obs(d(1, 2), 1, Some(9.0), Some(7.0)).with_ticker("XXXX"));
        let (panel, report) = builder.build().unwrap();

        assert_eq!(report.duplicates, 1);
        let xs = panel.cross_section(0);
        assert_eq!(xs.ret(SecurityId(1)), Some(1.0));
        assert_eq!(xs.market_cap(SecurityId(1)), Some(5.0));
        assert_eq!(xs.ticker(SecurityId(1)).map(Ticker::as_str), Some("MSFT"));
    }

    #[test]
    fn market_cap_uses_absolute_price() {
        let mut builder = PanelBuilder::new();
        builder.push(
            Observation::new(d(1, 2), SecurityId(1))
                .with_return(Some(0.5))
                .with_price(Some(-12.5), Some(1000.0)),
        );
        let (panel, _) = builder.build().unwrap();
        assert_relative_eq!(panel.cross_section(0).market_cap(SecurityId(1)).unwrap(), 12_500.0);
    }

    #[test]
    fn missing_is_not_zero() {
        let mut builder = PanelBuilder::new();
        builder.push(obs(d(1, 2), 1, None, None));
        builder.push(obs(d(1, 2), 2, Some(0.0), Some(0.0)));
        let (panel, _) = builder.build().unwrap();

        let xs = panel.cross_section(0);
        assert_eq!(xs.ret(SecurityId(1)), None);
        assert_eq!(xs.ret(SecurityId(2)), Some(0.0));
        assert_eq!(xs.eligible_market_caps(), vec![(SecurityId(2), 0.0)]);
    }

    #[test]
    fn benchmarks_take_first_valid_value() {
        let config = PanelConfig { benchmark_columns: vec!["vwretd".into()], ..Default::default() };
        let mut builder = PanelBuilder::with_config(config);
        builder.push(obs(d(1, 2), 1, Some(1.0), Some(1.0)));
        builder.push(obs(d(1, 3), 1, Some(1.0), Some(1.0)));
        builder.push_benchmark("vwretd", d(1, 2), None);
        builder.push_benchmark("vwretd", d(1, 2), Some(0.4));
        builder.push_benchmark("vwretd", d(1, 2), Some(0.9));
        builder.push_benchmark("ewretd", d(1, 2), Some(0.1));
        let (panel, _) = builder.build().unwrap();

        assert_eq!(panel.benchmark("vwretd"), Some(&[Some(0.4), None][..]));
        assert_eq!(panel.benchmark("ewretd"), None);
        assert_eq!(panel.cross_section(0).benchmark("vwretd"), Some(0.4));
    }

    #[test]
    fn empty_builder_fails() {
        assert!(matches!(PanelBuilder::new().build(), Err(PanelError::Empty)));
    }
}
