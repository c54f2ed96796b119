//! Merged return and price tables.

use std::collections::{BTreeSet, HashSet};

use capsort_math::{GapPolicy, MathError, compound};
use capsort_primitives::{Date, MissingReason, PeriodReturn, ReturnSeries};
use polars::prelude::*;

use crate::{ModelError, ReturnUnit};

/// Return series outer-joined on the union of their dates.
///
/// Cells a series does not cover hold `Missing(NotCovered)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    dates: Vec<Date>,
    names: Vec<String>,
    columns: Vec<Vec<PeriodReturn>>,
}

impl ReturnTable {
    /// Outer-join series into one table; columns keep the input order.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateSeries` if two series share a name.
    pub fn from_series(series: Vec<ReturnSeries>) -> Result<Self, ModelError> {
        let mut seen = HashSet::with_capacity(series.len());
        if let Some(dup) = series.iter().find(|s| !seen.insert(s.name.as_str())) {
            return Err(ModelError::DuplicateSeries(dup.name.clone()));
        }

        let dates: Vec<Date> = series
            .iter()
            .flat_map(|s| s.dates.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut names = Vec::with_capacity(series.len());
        let mut columns = Vec::with_capacity(series.len());
        for s in series {
            let column = dates
                .iter()
                .map(|&d| s.get(d).unwrap_or(PeriodReturn::Missing(MissingReason::NotCovered)))
                .collect();
            names.push(s.name);
            columns.push(column);
        }
        Ok(Self { dates, names, columns })
    }

    /// Date axis.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Series names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of series.
    #[must_use]
    pub fn n_series(&self) -> usize {
        self.names.len()
    }

    /// Check if the table has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Values of a series, aligned with [`Self::dates`].
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[PeriodReturn]> {
        let i = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[i])
    }

    /// Iterate over (name, values) in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PeriodReturn])> {
        self.names.iter().map(String::as_str).zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Rows with `start <= date <= end`; open bounds are unbounded.
    #[must_use]
    pub fn between(&self, start: Option<Date>, end: Option<Date>) -> Self {
        let lo = start.map_or(0, |s| self.dates.partition_point(|&d| d < s));
        let hi = end.map_or(self.dates.len(), |e| self.dates.partition_point(|&d| d <= e));
        let hi = hi.max(lo);
        Self {
            dates: self.dates[lo..hi].to_vec(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[lo..hi].to_vec()).collect(),
        }
    }

    /// Convert to a frame with a `date` column and one nullable `f64`
    /// column per series.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.names.len() + 1);
        columns.push(Column::new("date".into(), &self.dates));
        for (name, values) in self.iter() {
            let values: Vec<Option<f64>> = values.iter().map(|v| v.value()).collect();
            columns.push(Column::new(name.into(), values));
        }
        DataFrame::new(columns)
    }
}

/// Cumulative price indices anchored at 1.0, one per return series.
///
/// Prices before a series' first realized return are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<Date>,
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Compound every series of a return table.
    ///
    /// Returns are converted from `unit` to decimal fractions first.
    ///
    /// # Errors
    /// Returns `ModelError::MissingReturn` naming the series and date of the
    /// first interior gap under `GapPolicy::Reject`, or a math error for an
    /// empty table.
    pub fn from_returns(
        returns: &ReturnTable,
        unit: ReturnUnit,
        policy: GapPolicy,
    ) -> Result<Self, ModelError> {
        let scale = unit.to_decimal();
        let columns = returns
            .iter()
            .map(|(name, values)| {
                let decimal: Vec<Option<f64>> =
                    values.iter().map(|v| v.value().map(|r| r * scale)).collect();
                compound(&decimal, policy).map_err(|e| match e {
                    MathError::MissingReturn { index } => ModelError::MissingReturn {
                        series: name.to_string(),
                        date: returns.dates[index],
                    },
                    other => ModelError::Math(other),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dates: returns.dates.clone(), names: returns.names.clone(), columns })
    }

    /// Date axis.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Series names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Prices of a series.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let i = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[i])
    }

    /// Iterate over (name, prices) in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.names.iter().map(String::as_str).zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Convert to a frame shaped like [`ReturnTable::to_frame`].
    ///
    /// # Errors
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.names.len() + 1);
        columns.push(Column::new("date".into(), &self.dates));
        for (name, values) in self.iter() {
            columns.push(Column::new(name.into(), values));
        }
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn realized(values: &[f64]) -> Vec<PeriodReturn> {
        values.iter().map(|&v| PeriodReturn::Realized(v)).collect()
    }

    fn table() -> ReturnTable {
        ReturnTable::from_series(vec![
            ReturnSeries::new("a", vec![d(1), d(2), d(5)], realized(&[0.0, 10.0, -10.0])),
            ReturnSeries::new("b", vec![d(2), d(3)], realized(&[1.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn outer_join_marks_uncovered_cells() {
        let t = table();
        assert_eq!(t.dates(), &[d(1), d(2), d(3), d(5)]);
        assert_eq!(t.column("a").unwrap()[2], PeriodReturn::Missing(MissingReason::NotCovered));
        assert_eq!(t.column("b").unwrap()[0], PeriodReturn::Missing(MissingReason::NotCovered));
        assert_eq!(t.column("b").unwrap()[2], PeriodReturn::Realized(2.0));
    }

    #[test]
    fn duplicate_names_rejected() {
        let s = ReturnSeries::new("a", vec![d(1)], realized(&[0.0]));
        let err = ReturnTable::from_series(vec![s.clone(), s]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateSeries(name) if name == "a"));
    }

    #[test]
    fn between_is_inclusive() {
        let t = table().between(Some(d(2)), Some(d(3)));
        assert_eq!(t.dates(), &[d(2), d(3)]);
        assert_eq!(t.column("a").unwrap().len(), 2);
        assert!(table().between(Some(d(9)), None).is_empty());
        assert!(table().between(Some(d(3)), Some(d(2))).is_empty());
    }

    #[test]
    fn percent_returns_compound_as_fractions() {
        let t = table().between(None, Some(d(2)));
        let prices = PriceTable::from_returns(&t, ReturnUnit::Percent, GapPolicy::Reject).unwrap();
        let a = prices.column("a").unwrap();
        assert_eq!(a[0], Some(1.0));
        assert_relative_eq!(a[1].unwrap(), 1.1, epsilon = 1e-12);
        let b = prices.column("b").unwrap();
        assert_eq!(b[0], Some(1.0));
        assert_relative_eq!(b[1].unwrap(), 1.01, epsilon = 1e-12);
    }

    #[test]
    fn late_series_has_no_price_before_it_goes_live() {
        let late = ReturnSeries::new("late", vec![d(3)], realized(&[5.0]));
        let early = ReturnSeries::new("early", vec![d(1), d(2), d(3)], realized(&[0.0, 1.0, 1.0]));
        let t = ReturnTable::from_series(vec![early, late]).unwrap();
        assert_eq!(t.column("late").unwrap()[1], PeriodReturn::Missing(MissingReason::NotCovered));

        let prices = PriceTable::from_returns(&t, ReturnUnit::Percent, GapPolicy::Reject).unwrap();
        let p = prices.column("late").unwrap();
        assert_eq!(p[..2], [Some(1.0), None]);
        assert_relative_eq!(p[2].unwrap(), 1.05, epsilon = 1e-12);

        let frame = prices.to_frame().unwrap();
        assert_eq!(frame.column("late").unwrap().null_count(), 1);
    }

    #[test]
    fn interior_gap_names_series_and_date() {
        let err = PriceTable::from_returns(&table(), ReturnUnit::Percent, GapPolicy::Reject)
            .unwrap_err();
        match err {
            ModelError::MissingReturn { series, date } => {
                assert_eq!(series, "a");
                assert_eq!(date, d(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn forward_fill_carries_price() {
        let policy = GapPolicy::ForwardFill;
        let prices = PriceTable::from_returns(&table(), ReturnUnit::Percent, policy).unwrap();
        let a = prices.column("a").unwrap();
        assert_relative_eq!(a[2].unwrap(), 1.1, epsilon = 1e-12);
        assert_relative_eq!(a[3].unwrap(), 0.99, epsilon = 1e-12);
    }

    #[test]
    fn frames_have_identical_shape() {
        let t = table().between(None, Some(d(2)));
        let prices = PriceTable::from_returns(&t, ReturnUnit::Percent, GapPolicy::Reject).unwrap();
        let rf = t.to_frame().unwrap();
        let pf = prices.to_frame().unwrap();
        assert_eq!(rf.shape(), (2, 3));
        assert_eq!(rf.shape(), pf.shape());
        assert_eq!(rf.column("b").unwrap().null_count(), 1);
    }
}
