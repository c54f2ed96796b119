#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod dates;
pub use dates::{date_from_epoch_days, date_from_yyyymmdd, parse_date, parse_date_column};

mod filter;
pub use filter::{UniverseFilter, filter_universe};

mod error;
pub use error::UtilsError;
