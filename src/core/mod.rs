pub mod batch;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{BillInput, BillOutput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
