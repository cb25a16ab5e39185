use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::domain::services::split_calculator::{DEFAULT_SCALE, MAX_SCALE};
use crate::domain::services::{RemainderPolicy, SplitPolicy};
use crate::utils::error::{FileOperation, Result, SplitError};
use crate::utils::logger::level_directive;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitterConfig {
    #[serde(default)]
    pub split: SplitSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitSection {
    pub scale: Option<u32>,
    pub remainder: Option<RemainderPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl SplitterConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SplitError::from_io(e, path, FileOperation::Read))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SplitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定路徑就載入，否則使用預設值
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default_format(&self) -> Option<OutputFormat> {
        self.output.format
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for SplitterConfig {
    fn validate(&self) -> Result<()> {
        if let Some(scale) = self.split.scale {
            validate_range("split.scale", scale, 0, MAX_SCALE)?;
        }
        if let Some(level) = &self.logging.level {
            validate_non_empty_string("logging.level", level)?;
            EnvFilter::try_new(level_directive(level)).map_err(|e| {
                SplitError::ConfigValidationError {
                    field: "logging.level".to_string(),
                    message: format!("invalid log level '{}': {}", level, e),
                }
            })?;
        }
        Ok(())
    }
}

impl ConfigProvider for SplitterConfig {
    fn split_policy(&self) -> SplitPolicy {
        SplitPolicy {
            scale: self.split.scale.unwrap_or(DEFAULT_SCALE),
            remainder: self.split.remainder.unwrap_or_default(),
        }
    }
}
