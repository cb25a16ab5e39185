//! 測試用的 Mock 實作

use crate::core::{ConfigProvider, Storage};
use crate::domain::services::SplitPolicy;
use crate::utils::error::{FileOperation, Result, SplitError};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 記憶體內的 Storage；目錄需先登記，才能在底下寫入檔案
#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::default(),
            dirs: Arc::new(Mutex::new(BTreeSet::from([PathBuf::new()]))),
        }
    }

    pub async fn with_dir(self, dir: &str) -> Self {
        self.dirs.lock().await.insert(PathBuf::from(dir));
        self
    }

    pub async fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .await
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
        self
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(Path::new(path)).cloned()
    }

    pub async fn file_count(&self) -> usize {
        self.files.lock().await.len()
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.lock().await.get(path).cloned().ok_or_else(|| {
            SplitError::from_io(io::Error::from(io::ErrorKind::NotFound), path, FileOperation::Read)
        })
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if !self.dirs.lock().await.contains(&parent_of(path)) {
            return Err(SplitError::from_io(
                io::Error::from(io::ErrorKind::NotFound),
                path,
                FileOperation::Write,
            ));
        }
        self.files
            .lock()
            .await
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.dirs.lock().await.contains(dir) {
            return Err(SplitError::from_io(
                io::Error::from(io::ErrorKind::NotFound),
                dir,
                FileOperation::List,
            ));
        }
        Ok(self
            .files
            .lock()
            .await
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect())
    }

    async fn create_dir_all(&self, dir: &Path) -> Result<()> {
        let mut dirs = self.dirs.lock().await;
        for ancestor in dir.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn is_dir(&self, path: &Path) -> Result<bool> {
        Ok(self.dirs.lock().await.contains(path))
    }
}

pub struct MockConfig {
    policy: SplitPolicy,
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            policy: SplitPolicy::default(),
        }
    }

    pub fn with_policy(policy: SplitPolicy) -> Self {
        Self { policy }
    }
}

impl ConfigProvider for MockConfig {
    fn split_policy(&self) -> SplitPolicy {
        self.policy
    }
}
