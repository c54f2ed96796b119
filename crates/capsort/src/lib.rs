//! # capsort
//!
//! Size-sorted equity portfolios from a panel of security observations.
//!
//! This crate provides a unified interface to the capsort workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Identifiers, portfolio definitions and return values
//! - `traits`: Ranking, weighting and builder abstractions
//! - `math`: Ordering, weighted means, compounding and statistics
//! - `utils`: Loader-side helpers (date parsing, universe filter)
//! - `panel`: Panel construction and cleaning
//! - `model`: Ranking, membership, aggregation and the portfolio engine
//! - `cli`: The `capsort` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use capsort::{model::{EngineConfig, PortfolioEngine}, panel::PanelBuilder};
//!
//! let (panel, report) = builder.build()?;
//! let engine = PortfolioEngine::new(EngineConfig::default())?;
//! let returns = engine.run(&panel)?;
//! let prices = engine.prices(&returns)?;
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use capsort_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use capsort_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use capsort_math as math;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use capsort_utils as utils;
#[cfg(feature = "panel")]
#[doc(inline)]
pub use capsort_panel as panel;
#[cfg(feature = "model")]
#[doc(inline)]
pub use capsort_model as model;
