#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ranking;
pub use ranking::{DecileRanker, OrdinalRanker, RankingSchedule, rank, ranker_for};

mod membership;
pub use membership::{bucket_members, members, resolve};

mod aggregate;
pub use aggregate::{EqualWeight, ValueWeight, aggregate, weighting_scheme};

mod table;
pub use table::{PriceTable, ReturnTable};

mod summary;
pub use summary::{SeriesSummary, SummaryConfig, summarize, summarize_series};

mod config;
pub use config::{EngineConfig, ReturnUnit};

mod engine;
pub use engine::PortfolioEngine;

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use capsort_traits::{PortfolioBuilder, Ranker, WeightingScheme};

    pub use super::{EngineConfig, ModelError, PortfolioEngine, PriceTable, ReturnTable};
}
