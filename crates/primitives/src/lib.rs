#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod security;
pub use security::{SecurityId, Ticker};

mod portfolio;
pub use portfolio::{Bucket, Cadence, N_DECILES, PortfolioId, Scheme, Weighting};

mod snapshot;
pub use snapshot::{RankKind, RankingSnapshot};

mod returns;
pub use returns::{MissingReason, PeriodReturn, ReturnSeries};

mod error;
pub use error::ParseError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
