#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod ranker;
pub use ranker::{RankError, Ranker};

mod weighting;
pub use weighting::{MemberObservation, WeightingScheme};

mod builder;
pub use builder::{BuildError, PortfolioBuilder};
