use crate::core::batch::BatchCoordinator;
use crate::core::{Pipeline, Storage};
use crate::domain::model::{BatchReport, OutputFormat};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Single { output_path: PathBuf },
    Batch(BatchReport),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::Single { .. } => true,
            RunOutcome::Batch(report) => report.is_success(),
        }
    }
}

pub struct SplitEngine<S: Storage, P: Pipeline> {
    storage: S,
    pipeline: P,
}

impl<S: Storage, P: Pipeline> SplitEngine<S, P> {
    pub fn new(storage: S, pipeline: P) -> Self {
        Self { storage, pipeline }
    }

    /// 輸入為目錄時進入批次模式，否則視為單一檔案
    pub async fn run(&self, input: &Path, output: &Path, format: OutputFormat) -> Result<RunOutcome> {
        if self.storage.is_dir(input).await? {
            tracing::info!(
                "📂 Batch mode: {} -> {} ({})",
                input.display(),
                output.display(),
                format
            );
            let report = BatchCoordinator::new(&self.storage, &self.pipeline)
                .process_batch(input, output, format)
                .await?;
            tracing::info!(
                "Batch finished: {} succeeded, {} failed",
                report.succeeded_count(),
                report.failed_count()
            );
            Ok(RunOutcome::Batch(report))
        } else {
            tracing::info!(
                "📄 Single file mode: {} -> {} ({})",
                input.display(),
                output.display(),
                format
            );
            let output_path = self.pipeline.process_file(input, output, format).await?;
            Ok(RunOutcome::Single { output_path })
        }
    }
}
