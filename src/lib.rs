pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::SplitterConfig};
pub use crate::core::{
    batch::BatchCoordinator,
    engine::{RunOutcome, SplitEngine},
    pipeline::BillPipeline,
};
pub use crate::domain::model::{BatchReport, BillInput, BillOutput, OutputFormat, Participant, SplitItem};
pub use crate::domain::services::{format_as_text, split_bill, split_bill_with, SplitPolicy};
pub use crate::utils::error::{Result, SplitError};
