#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capsort/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod observation;
pub use observation::Observation;

mod config;
pub use config::{ColumnMap, PanelConfig};

mod panel;
pub use panel::{CrossSection, Panel};

mod builder;
pub use builder::{CleaningReport, PanelBuilder};

mod frame;
pub use frame::panel_from_frame;

mod error;
pub use error::PanelError;
