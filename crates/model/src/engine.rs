//! Portfolio engine: runs every configured portfolio over a panel.

use std::collections::{BTreeMap, BTreeSet};

use capsort_panel::{Panel, panel_from_frame};
use capsort_primitives::{
    Bucket, MissingReason, PeriodReturn, PortfolioId, RankKind, RankingSnapshot, ReturnSeries,
    Scheme, SecurityId,
};
use capsort_traits::{BuildError, PortfolioBuilder, RankError, Ranker, WeightingScheme};
use polars::prelude::*;
use tracing::{debug, info};

use crate::{
    EngineConfig, ModelError, PriceTable, RankingSchedule, ReturnTable, SeriesSummary, aggregate,
    config::unique, ranker_for, resolve, summarize, weighting_scheme,
};

/// Forward walk over the date axis for one cadence and scheme.
///
/// Each step yields one return per (bucket, weighting), bucket-major. The
/// ranking snapshot is carried from step to step and recomputed only when
/// the schedule moves to a new ranking date.
struct Formation<'a> {
    panel: &'a Panel,
    schedule: &'a RankingSchedule,
    ranker: &'static dyn Ranker,
    buckets: &'a [Bucket],
    schemes: Vec<&'static dyn WeightingScheme>,
    t: usize,
    snapshot: Option<(usize, RankingSnapshot)>,
}

impl Formation<'_> {
    fn width(&self) -> usize {
        self.buckets.len() * self.schemes.len()
    }

    fn snapshot_at(&mut self, j: usize) -> Result<RankingSnapshot, RankError> {
        match self.snapshot.take() {
            Some((k, snapshot)) if k == j => Ok(snapshot),
            _ => {
                let xs = self.panel.cross_section(j);
                self.ranker.snapshot(xs.date(), &xs.eligible_market_caps())
            }
        }
    }
}

impl Iterator for Formation<'_> {
    type Item = Result<Vec<PeriodReturn>, RankError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.t >= self.panel.n_dates() {
            return None;
        }
        let t = self.t;
        self.t += 1;

        let missing = |reason| vec![PeriodReturn::Missing(reason); self.width()];
        if t == 0 {
            return Some(Ok(missing(MissingReason::NoPriorPeriod)));
        }
        let Some(j) = self.schedule.ranking_index(t) else {
            return Some(Ok(missing(MissingReason::NoRanking)));
        };
        let snapshot = match self.snapshot_at(j) {
            Ok(snapshot) => snapshot,
            Err(e) => return Some(Err(e)),
        };

        let current = self.panel.cross_section(t);
        let prior = self.panel.cross_section(t - 1);
        let available: BTreeSet<SecurityId> = current.observed().collect();

        let mut row = Vec::with_capacity(self.width());
        for &bucket in self.buckets {
            match resolve(&snapshot, &available, bucket) {
                Ok(held) => row.extend(
                    self.schemes.iter().map(|&scheme| aggregate(&held, &current, &prior, scheme)),
                ),
                Err(reason) => row.extend(
                    std::iter::repeat_n(PeriodReturn::Missing(reason), self.schemes.len()),
                ),
            }
        }

        self.snapshot = Some((j, snapshot));
        Some(Ok(row))
    }
}

/// Forms and evaluates size-sorted portfolios.
///
/// Every (cadence, weighting, bucket) definition is evaluated as a forward
/// pass over the panel: the ranking applied at a period is always taken on an
/// earlier date, and value weights are the market caps of the preceding
/// period.
#[derive(Debug, Clone)]
pub struct PortfolioEngine {
    config: EngineConfig,
}

impl PortfolioEngine {
    /// Create an engine after validating its configuration.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every configured portfolio over the panel.
    ///
    /// # Returns
    /// One series per portfolio (plus benchmarks when enabled), outer-joined
    /// and restricted to the configured date range.
    ///
    /// # Errors
    /// Returns `ModelError` if ranking fails or series names collide.
    pub fn run(&self, panel: &Panel) -> Result<ReturnTable, ModelError> {
        let weightings = unique(&self.config.weightings);
        let schemes: Vec<_> = weightings.iter().map(|&w| weighting_scheme(w)).collect();

        let mut results: BTreeMap<PortfolioId, Vec<PeriodReturn>> = BTreeMap::new();
        for cadence in unique(&self.config.cadences) {
            let schedule = RankingSchedule::new(panel.dates(), cadence);
            for scheme in unique(&self.config.schemes) {
                let buckets = self.config.buckets(scheme);
                let formation = Formation {
                    panel,
                    schedule: &schedule,
                    ranker: ranker_for(rank_kind(scheme)),
                    buckets: &buckets,
                    schemes: schemes.clone(),
                    t: 0,
                    snapshot: None,
                };
                let rows = formation.collect::<Result<Vec<_>, _>>()?;

                for (b, &bucket) in buckets.iter().enumerate() {
                    for (w, &weighting) in weightings.iter().enumerate() {
                        let k = b * weightings.len() + w;
                        let values = rows.iter().map(|row| row[k]).collect();
                        results.insert(PortfolioId::new(cadence, weighting, bucket), values);
                    }
                }
            }
        }

        let mut series = Vec::with_capacity(results.len());
        for id in self.config.portfolios() {
            if let Some(values) = results.remove(&id) {
                let s = ReturnSeries::new(id.name(), panel.dates().to_vec(), values);
                debug!(portfolio = %id, realized = s.n_realized(), periods = s.len(), "formed");
                series.push(s);
            }
        }
        if self.config.include_benchmarks {
            series.extend(benchmark_series(panel));
        }

        let table = ReturnTable::from_series(series)?.between(self.config.start, self.config.end);
        info!(series = table.n_series(), dates = table.dates().len(), "portfolio returns formed");
        Ok(table)
    }

    /// Compound a return table with the configured unit and gap policy.
    ///
    /// # Errors
    /// Returns `ModelError::MissingReturn` for a gap the policy rejects.
    pub fn prices(&self, returns: &ReturnTable) -> Result<PriceTable, ModelError> {
        PriceTable::from_returns(returns, self.config.return_unit, self.config.gap_policy)
    }

    /// Summary statistics of every price series.
    #[must_use]
    pub fn summarize(&self, prices: &PriceTable) -> Vec<SeriesSummary> {
        summarize(prices, &self.config.summary)
    }
}

impl PortfolioBuilder for PortfolioEngine {
    fn build(&self, observations: LazyFrame) -> Result<(DataFrame, DataFrame), BuildError> {
        let df = observations.collect()?;
        let (panel, report) = panel_from_frame(&df, &self.config.panel).map_err(ModelError::from)?;
        debug!(corrections = report.corrections(), "panel cleaned");

        let returns = self.run(&panel)?;
        let prices = self.prices(&returns)?;
        Ok((returns.to_frame()?, prices.to_frame()?))
    }

    fn portfolios(&self) -> Vec<PortfolioId> {
        self.config.portfolios()
    }
}

const fn rank_kind(scheme: Scheme) -> RankKind {
    match scheme {
        Scheme::Decile => RankKind::Decile,
        Scheme::TopN => RankKind::Ordinal,
    }
}

fn benchmark_series(panel: &Panel) -> Vec<ReturnSeries> {
    panel
        .benchmark_names()
        .filter_map(|name| {
            let values: Vec<PeriodReturn> = panel
                .benchmark(name)?
                .iter()
                .map(|v| v.ok_or(MissingReason::NotCovered).into())
                .collect();
            Some(ReturnSeries::new(name, panel.dates().to_vec(), values))
        })
        .collect()
}
