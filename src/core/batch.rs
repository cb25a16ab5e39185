use crate::core::{Pipeline, Storage};
use crate::domain::model::{BatchReport, FailedFile, OutputFormat, ProcessedFile};
use crate::utils::error::{Result, SplitError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 一個待處理的帳單檔
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTask {
    pub file_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// 把目錄中的檔案轉成處理任務。只收 `.json`（不分大小寫），
/// 輸出檔名為 `<stem>-result.json` 或 `<stem>-result.txt`
pub fn plan_tasks(files: &[PathBuf], output_dir: &Path, format: OutputFormat) -> Vec<BatchTask> {
    files
        .iter()
        .filter_map(|path| {
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                tracing::debug!("Skipping non-JSON file: {}", path.display());
                return None;
            }

            let file_name = path.file_name()?.to_string_lossy().into_owned();
            let stem = path.file_stem()?.to_string_lossy();
            let output_path = output_dir.join(format!("{}{}", stem, format.result_suffix()));

            Some(BatchTask {
                file_name,
                input_path: path.clone(),
                output_path,
            })
        })
        .collect()
}

pub struct BatchCoordinator<'a, S: Storage, P: Pipeline> {
    storage: &'a S,
    pipeline: &'a P,
}

impl<'a, S: Storage, P: Pipeline> BatchCoordinator<'a, S, P> {
    pub fn new(storage: &'a S, pipeline: &'a P) -> Self {
        Self { storage, pipeline }
    }

    pub async fn plan(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        format: OutputFormat,
    ) -> Result<Vec<BatchTask>> {
        let files = self.storage.list_files(input_dir).await?;
        Ok(plan_tasks(&files, output_dir, format))
    }

    /// 依序處理所有任務。列目錄或建立輸出目錄失敗時整批中止，
    /// 單一檔案失敗只記入報告
    pub async fn process_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        format: OutputFormat,
    ) -> Result<BatchReport> {
        let tasks = self.plan(input_dir, output_dir, format).await?;
        tracing::info!(
            "Found {} bill file(s) in {}",
            tasks.len(),
            input_dir.display()
        );

        self.storage.create_dir_all(output_dir).await?;

        let mut report = BatchReport::default();
        let mut claimed: HashSet<&Path> = HashSet::new();
        for task in &tasks {
            // 大小寫不同的同名檔會對應到同一個輸出，後到的不可覆蓋先前結果
            let result = if claimed.insert(task.output_path.as_path()) {
                self.pipeline
                    .process_file(&task.input_path, &task.output_path, format)
                    .await
            } else {
                Err(SplitError::validation(
                    "output",
                    format!(
                        "result file {} is already produced by another input",
                        task.output_path.display()
                    ),
                ))
            };

            match result {
                Ok(output_path) => {
                    tracing::info!("✅ {} -> {}", task.file_name, output_path.display());
                    report.succeeded.push(ProcessedFile {
                        file_name: task.file_name.clone(),
                        output_path,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Failed to process {}: {} (Category: {:?})",
                        task.file_name,
                        e,
                        e.category()
                    );
                    report.failed.push(FailedFile {
                        file_name: task.file_name.clone(),
                        category: e.category(),
                        reason: e.user_friendly_message(),
                    });
                }
            }
        }

        Ok(report)
    }
}
