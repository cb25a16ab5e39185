pub mod split_calculator;
pub mod text_report;

pub use split_calculator::{split_bill, split_bill_with, RemainderPolicy, SplitPolicy};
pub use text_report::{format_as_text, format_as_text_with_scale};
