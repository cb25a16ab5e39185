pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, SplitError};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::Path;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "bill-splitter", version)]
#[command(about = "Split a shared bill among its participants")]
pub struct CliConfig {
    /// 帳單 JSON 檔，或批次模式下的帳單目錄
    #[arg(long)]
    pub input: Option<String>,

    /// 結果檔，或批次模式下的結果目錄
    #[arg(long)]
    pub output: Option<String>,

    /// 輸出格式（預設 json，或設定檔 [output] format）
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// TOML 設定檔路徑
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn input_path(&self) -> Result<&Path> {
        required_path("--input", self.input.as_deref())
    }

    pub fn output_path(&self) -> Result<&Path> {
        required_path("--output", self.output.as_deref())
    }

    /// 命令列優先，其次設定檔，最後預設 json
    pub fn resolve_format(&self, config_default: Option<OutputFormat>) -> OutputFormat {
        self.format.or(config_default).unwrap_or_default()
    }
}

#[cfg(feature = "cli")]
fn required_path<'a>(flag: &str, value: Option<&'a str>) -> Result<&'a Path> {
    match value {
        Some(value) if !value.trim().is_empty() => {
            validate_path(flag, value)?;
            Ok(Path::new(value))
        }
        _ => Err(SplitError::usage(format!(
            "{} is required (both --input and --output must be provided)",
            flag
        ))),
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.input_path()?;
        self.output_path()?;
        if let Some(config) = &self.config {
            validate_path("--config", config)?;
        }
        Ok(())
    }
}
