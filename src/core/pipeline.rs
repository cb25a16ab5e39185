use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{BillInput, BillOutput, OutputFormat};
use crate::domain::services::{format_as_text_with_scale, split_bill_with};
use crate::utils::error::{Result, SplitError};
use std::path::{Path, PathBuf};

/// 單一帳單檔的處理流程：讀取 JSON → 分帳 → 輸出 JSON 或文字報表
pub struct BillPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BillPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

fn malformed(path: &Path, message: impl Into<String>) -> SplitError {
    SplitError::MalformedInputError {
        path: path.display().to_string(),
        message: message.into(),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BillPipeline<S, C> {
    async fn extract(&self, input: &Path) -> Result<BillInput> {
        tracing::debug!("Reading bill from: {}", input.display());
        let raw = self.storage.read_file(input).await?;

        let content = String::from_utf8(raw)
            .map_err(|e| malformed(input, format!("file is not valid UTF-8: {}", e)))?;
        let bill: BillInput =
            serde_json::from_str(&content).map_err(|e| malformed(input, e.to_string()))?;

        tracing::debug!(
            "Parsed bill at '{}' with {} participants",
            bill.location,
            bill.participants.len()
        );
        Ok(bill)
    }

    async fn transform(&self, bill: BillInput) -> Result<BillOutput> {
        let policy = self.config.split_policy();
        let result = split_bill_with(&bill, &policy)?;
        tracing::debug!(
            "Split total {} among {} participants",
            result.total_amount,
            result.items.len()
        );
        Ok(result)
    }

    async fn load(&self, result: BillOutput, output: &Path, format: OutputFormat) -> Result<PathBuf> {
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&result)?,
            OutputFormat::Text => {
                format_as_text_with_scale(&result, self.config.split_policy().scale)
            }
        };

        tracing::debug!(
            "Writing {} output ({} bytes) to {}",
            format,
            rendered.len(),
            output.display()
        );
        self.storage.write_file(output, rendered.as_bytes()).await?;

        Ok(output.to_path_buf())
    }
}
