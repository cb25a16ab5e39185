use crate::domain::model::{BillInput, BillOutput, OutputFormat};
use crate::domain::services::SplitPolicy;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>>> + Send;
    /// 寫入需為全有或全無：呼叫端不應看到寫到一半的檔案
    fn write_file(&self, path: &Path, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
    /// 列出目錄下的一般檔案（不遞迴），依檔名排序
    fn list_files(&self, dir: &Path) -> impl Future<Output = Result<Vec<PathBuf>>> + Send;
    fn create_dir_all(&self, dir: &Path) -> impl Future<Output = Result<()>> + Send;
    fn is_dir(&self, path: &Path) -> impl Future<Output = Result<bool>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn split_policy(&self) -> SplitPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, input: &Path) -> Result<BillInput>;
    async fn transform(&self, bill: BillInput) -> Result<BillOutput>;
    async fn load(&self, result: BillOutput, output: &Path, format: OutputFormat) -> Result<PathBuf>;

    /// 單一檔案的完整流程：讀取 → 計算 → 寫出
    async fn process_file(&self, input: &Path, output: &Path, format: OutputFormat) -> Result<PathBuf> {
        let bill = self.extract(input).await?;
        let result = self.transform(bill).await?;
        self.load(result, output, format).await
    }
}
