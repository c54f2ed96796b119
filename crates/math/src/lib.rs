#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Number of buckets in a decile cut.
const N_BUCKETS: usize = 10;

mod ordering;
pub use ordering::{decile_bucket, deciles, stable_order};

mod weights;
pub use weights::{equal_weighted_mean, value_weighted_mean};

mod compound;
pub use compound::{GapPolicy, compound};

mod stats;
pub use stats::{annualized_volatility, cagr, sharpe_ratio};

mod error;
pub use error::MathError;
