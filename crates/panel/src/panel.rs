//! The aligned date × security panel.

use std::collections::{BTreeMap, HashMap};

use capsort_primitives::{Date, SecurityId, Ticker};
use ndarray::{Array2, ArrayView1};

/// Date × security panel of returns, market caps and tickers.
///
/// All mappings share one date axis and one security axis (both ascending,
/// outer union of the input). A cell without an input row is unobserved; a
/// cell with a row but no valid value holds `None`. Neither is ever zero.
#[derive(Debug, Clone)]
pub struct Panel {
    dates: Vec<Date>,
    securities: Vec<SecurityId>,
    index: HashMap<SecurityId, usize>,
    returns: Array2<Option<f64>>,
    market_caps: Array2<Option<f64>>,
    observed: Array2<bool>,
    tickers: HashMap<(usize, usize), Ticker>,
    benchmarks: BTreeMap<String, Vec<Option<f64>>>,
}

impl Panel {
    /// Assemble a panel from aligned parts.
    ///
    /// Matrices are (n_dates × n_securities); benchmark vectors have one
    /// entry per date.
    pub(crate) fn from_parts(
        dates: Vec<Date>,
        securities: Vec<SecurityId>,
        returns: Array2<Option<f64>>,
        market_caps: Array2<Option<f64>>,
        observed: Array2<bool>,
        tickers: HashMap<(usize, usize), Ticker>,
        benchmarks: BTreeMap<String, Vec<Option<f64>>>,
    ) -> Self {
        let shape = (dates.len(), securities.len());
        debug_assert_eq!(returns.dim(), shape);
        debug_assert_eq!(market_caps.dim(), shape);
        debug_assert_eq!(observed.dim(), shape);
        debug_assert!(benchmarks.values().all(|b| b.len() == dates.len()));

        let index = securities.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { dates, securities, index, returns, market_caps, observed, tickers, benchmarks }
    }

    /// Date axis.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Security axis.
    #[must_use]
    pub fn securities(&self) -> &[SecurityId] {
        &self.securities
    }

    /// Number of dates.
    #[must_use]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of securities.
    #[must_use]
    pub fn n_securities(&self) -> usize {
        self.securities.len()
    }

    /// Position of a date on the date axis.
    #[must_use]
    pub fn date_index(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Position of a security on the security axis.
    #[must_use]
    pub fn security_index(&self, id: SecurityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Cross-section at date position `t`.
    ///
    /// # Panics
    /// Panics if `t` is out of range.
    #[must_use]
    pub fn cross_section(&self, t: usize) -> CrossSection<'_> {
        assert!(t < self.dates.len(), "date position {t} out of range");
        CrossSection { panel: self, t }
    }

    /// Iterate over all cross-sections in date order.
    pub fn cross_sections(&self) -> impl Iterator<Item = CrossSection<'_>> {
        (0..self.dates.len()).map(|t| CrossSection { panel: self, t })
    }

    /// Names of the carried benchmark series.
    pub fn benchmark_names(&self) -> impl Iterator<Item = &str> {
        self.benchmarks.keys().map(String::as_str)
    }

    /// A benchmark series, one value per date.
    #[must_use]
    pub fn benchmark(&self, name: &str) -> Option<&[Option<f64>]> {
        self.benchmarks.get(name).map(Vec::as_slice)
    }

    /// Number of observed (date, security) cells.
    #[must_use]
    pub fn n_observed(&self) -> usize {
        self.observed.iter().filter(|&&o| o).count()
    }
}

/// View of one date of a [`Panel`].
#[derive(Debug, Clone, Copy)]
pub struct CrossSection<'a> {
    panel: &'a Panel,
    t: usize,
}

impl<'a> CrossSection<'a> {
    /// Position on the date axis.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.t
    }

    /// Date of the cross-section.
    #[must_use]
    pub fn date(&self) -> Date {
        self.panel.dates[self.t]
    }

    /// Returns of all securities, in security-axis order.
    #[must_use]
    pub fn returns(&self) -> ArrayView1<'a, Option<f64>> {
        self.panel.returns.row(self.t)
    }

    /// Market caps of all securities, in security-axis order.
    #[must_use]
    pub fn market_caps(&self) -> ArrayView1<'a, Option<f64>> {
        self.panel.market_caps.row(self.t)
    }

    /// Return of a security, if observed and valid.
    #[must_use]
    pub fn ret(&self, id: SecurityId) -> Option<f64> {
        self.panel.security_index(id).and_then(|s| self.panel.returns[[self.t, s]])
    }

    /// Market cap of a security, if observed and valid.
    #[must_use]
    pub fn market_cap(&self, id: SecurityId) -> Option<f64> {
        self.panel.security_index(id).and_then(|s| self.panel.market_caps[[self.t, s]])
    }

    /// Ticker of a security on this date.
    #[must_use]
    pub fn ticker(&self, id: SecurityId) -> Option<&'a Ticker> {
        let s = self.panel.security_index(id)?;
        self.panel.tickers.get(&(self.t, s))
    }

    /// Whether the security had an input row on this date.
    #[must_use]
    pub fn is_observed(&self, id: SecurityId) -> bool {
        self.panel.security_index(id).is_some_and(|s| self.panel.observed[[self.t, s]])
    }

    /// Securities with an input row on this date, in security-axis order.
    pub fn observed(&self) -> impl Iterator<Item = SecurityId> + 'a {
        let panel = self.panel;
        let row = panel.observed.row(self.t);
        panel.securities.iter().zip(row).filter(|(_, o)| **o).map(|(&id, _)| id)
    }

    /// (security, market cap) for every security with a valid market cap,
    /// in security-axis order.
    #[must_use]
    pub fn eligible_market_caps(&self) -> Vec<(SecurityId, f64)> {
        self.panel
            .securities
            .iter()
            .zip(self.market_caps())
            .filter_map(|(&id, cap)| cap.map(|c| (id, c)))
            .collect()
    }

    /// Value of a benchmark series on this date.
    #[must_use]
    pub fn benchmark(&self, name: &str) -> Option<f64> {
        self.panel.benchmark(name).and_then(|b| b[self.t])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Observation, PanelBuilder};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sample() -> Panel {
        let mut builder = PanelBuilder::new();
        for (date, id, cap) in [(d(1), 5, Some(1.0)), (d(1), 2, None), (d(4), 2, Some(3.0))] {
            builder.push(
                Observation::new(date, SecurityId(id)).with_return(Some(0.1)).with_market_cap(cap),
            );
        }
        builder.build().unwrap().0
    }

    #[test]
    fn lookups_by_axis() {
        let panel = sample();
        assert_eq!(panel.date_index(d(4)), Some(1));
        assert_eq!(panel.date_index(d(2)), None);
        assert_eq!(panel.security_index(SecurityId(5)), Some(1));
        let dates: Vec<Date> = panel.cross_sections().map(|xs| xs.date()).collect();
        assert_eq!(dates, vec![d(1), d(4)]);
    }

    #[test]
    fn observed_and_eligible_differ() {
        let panel = sample();
        let first = panel.cross_section(0);
        assert_eq!(first.observed().collect::<Vec<_>>(), vec![SecurityId(2), SecurityId(5)]);
        assert_eq!(first.eligible_market_caps(), vec![(SecurityId(5), 1.0)]);

        let second = panel.cross_section(1);
        assert_eq!(second.observed().collect::<Vec<_>>(), vec![SecurityId(2)]);
        assert!(!second.is_observed(SecurityId(5)));
        assert_eq!(second.ret(SecurityId(99)), None);
    }
}
