//! Engine configuration.

use capsort_math::GapPolicy;
use capsort_panel::PanelConfig;
use capsort_primitives::{Bucket, Cadence, Date, PortfolioId, Scheme, Weighting};
use serde::{Deserialize, Serialize};

use crate::{ModelError, SummaryConfig};

/// Unit of the returns in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnUnit {
    /// Percent, e.g. `1.5` for 1.5%.
    #[default]
    Percent,
    /// Decimal fraction, e.g. `0.015`.
    Decimal,
}

impl ReturnUnit {
    /// Factor converting a return in this unit to a decimal fraction.
    #[must_use]
    pub const fn to_decimal(self) -> f64 {
        match self {
            Self::Percent => 0.01,
            Self::Decimal => 1.0,
        }
    }
}

/// Configuration for the portfolio engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rebalancing cadences to run.
    pub cadences: Vec<Cadence>,
    /// Weighting conventions to run.
    pub weightings: Vec<Weighting>,
    /// Partition schemes to run.
    pub schemes: Vec<Scheme>,
    /// Sizes of the top-N portfolios.
    pub top_n_sizes: Vec<usize>,
    /// Unit of panel returns.
    pub return_unit: ReturnUnit,
    /// Treatment of interior gaps when compounding.
    pub gap_policy: GapPolicy,
    /// First date kept in the output (inclusive).
    pub start: Option<Date>,
    /// Last date kept in the output (inclusive).
    pub end: Option<Date>,
    /// Whether panel benchmark series are merged into the output.
    pub include_benchmarks: bool,
    /// Panel builder settings.
    pub panel: PanelConfig,
    /// Summary statistic settings.
    pub summary: SummaryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cadences: Cadence::ALL.to_vec(),
            weightings: Weighting::ALL.to_vec(),
            schemes: vec![Scheme::Decile, Scheme::TopN],
            top_n_sizes: vec![50, 100, 500, 1000],
            return_unit: ReturnUnit::Percent,
            gap_policy: GapPolicy::Reject,
            start: None,
            end: None,
            include_benchmarks: true,
            panel: PanelConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check the configuration before any computation.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` for an empty cadence, weighting or
    /// scheme set, a top-N scheme without sizes, a zero size, an inverted
    /// date range, or an invalid panel configuration.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: &str| Err(ModelError::InvalidConfig(msg.to_string()));
        if self.cadences.is_empty() {
            return invalid("at least one cadence is required");
        }
        if self.weightings.is_empty() {
            return invalid("at least one weighting is required");
        }
        if self.schemes.is_empty() {
            return invalid("at least one scheme is required");
        }
        if self.schemes.contains(&Scheme::TopN) {
            if self.top_n_sizes.is_empty() {
                return invalid("top-n scheme requires at least one portfolio size");
            }
            if self.top_n_sizes.contains(&0) {
                return invalid("portfolio sizes must be positive");
            }
        }
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(ModelError::InvalidConfig(format!(
                "start {start} is after end {end}"
            )));
        }
        self.summary.validate()?;
        self.panel.validate().map_err(|e| ModelError::InvalidConfig(e.to_string()))
    }

    /// Buckets of a scheme, ascending and without repeats.
    #[must_use]
    pub fn buckets(&self, scheme: Scheme) -> Vec<Bucket> {
        match scheme {
            Scheme::Decile => Bucket::deciles().collect(),
            Scheme::TopN => {
                let mut sizes = self.top_n_sizes.clone();
                sizes.sort_unstable();
                sizes.dedup();
                sizes.into_iter().map(Bucket::Top).collect()
            }
        }
    }

    /// Every portfolio the configuration defines, in output column order.
    #[must_use]
    pub fn portfolios(&self) -> Vec<PortfolioId> {
        let mut ids = Vec::new();
        for &cadence in &unique(&self.cadences) {
            for &weighting in &unique(&self.weightings) {
                for &scheme in &unique(&self.schemes) {
                    ids.extend(
                        self.buckets(scheme)
                            .into_iter()
                            .map(|b| PortfolioId::new(cadence, weighting, b)),
                    );
                }
            }
        }
        ids
    }
}

pub(crate) fn unique<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for &item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        // 3 cadences × 2 weightings × (10 deciles + 4 sizes)
        assert_eq!(config.portfolios().len(), 84);
        assert_eq!(config.portfolios()[0].name(), "period_ew_d1");
    }

    #[rstest]
    #[case(EngineConfig { cadences: vec![], ..Default::default() })]
    #[case(EngineConfig { weightings: vec![], ..Default::default() })]
    #[case(EngineConfig { top_n_sizes: vec![], ..Default::default() })]
    #[case(EngineConfig { top_n_sizes: vec![50, 0], ..Default::default() })]
    #[case(EngineConfig {
        start: Date::from_ymd_opt(2020, 1, 1),
        end: Date::from_ymd_opt(2019, 1, 1),
        ..Default::default()
    })]
    fn invalid_configs_rejected(#[case] config: EngineConfig) {
        assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn decile_only_needs_no_sizes() {
        let config = EngineConfig {
            schemes: vec![Scheme::Decile],
            top_n_sizes: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sizes_sorted_and_deduplicated() {
        let config = EngineConfig { top_n_sizes: vec![500, 50, 500], ..Default::default() };
        assert_eq!(config.buckets(Scheme::TopN), vec![Bucket::Top(50), Bucket::Top(500)]);
    }

    #[test]
    fn json_config_with_names() {
        let json = r#"{
            "cadences": ["yearly"],
            "weightings": ["value"],
            "schemes": ["top-n"],
            "top_n_sizes": [2],
            "return_unit": "decimal",
            "gap_policy": "forward-fill",
            "start": "2001-01-01"
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.gap_policy, GapPolicy::ForwardFill);
        assert_eq!(config.return_unit.to_decimal(), 1.0);
        let names: Vec<String> = config.portfolios().iter().map(PortfolioId::name).collect();
        assert_eq!(names, vec!["yearly_vw_top2".to_string()]);
    }

    #[test]
    fn unknown_cadence_fails_to_parse() {
        let json = r#"{ "cadences": ["hourly"] }"#;
        assert!(serde_json::from_str::<EngineConfig>(json).is_err());
    }
}
