use crate::core::Storage;
use crate::utils::error::{FileOperation, Result, SplitError};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

/// 暫存檔放在目標旁邊，rename 才會是同一檔案系統內的原子操作
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let file_name = target.file_name().ok_or_else(|| SplitError::IoError {
        path: target.display().to_string(),
        operation: FileOperation::Write,
        source: io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
    })?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(".{}.tmp", std::process::id()));
    Ok(target.with_file_name(temp_name))
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path)
            .await
            .map_err(|e| SplitError::from_io(e, &full_path, FileOperation::Read))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let temp_path = temp_path_for(&full_path)?;

        if let Err(e) = fs::write(&temp_path, data).await {
            return Err(SplitError::from_io(e, &full_path, FileOperation::Write));
        }

        if let Err(e) = fs::rename(&temp_path, &full_path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                tracing::warn!(
                    "Failed to remove temporary file {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(SplitError::from_io(e, &full_path, FileOperation::Write));
        }

        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let full_path = self.resolve(dir);
        let mut entries = fs::read_dir(&full_path)
            .await
            .map_err(|e| SplitError::from_io(e, &full_path, FileOperation::List))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SplitError::from_io(e, &full_path, FileOperation::List))?
        {
            let path = entry.path();
            // metadata 會跟隨 symlink
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => files.push(path),
                Ok(_) => tracing::debug!("Skipping non-file entry: {}", path.display()),
                Err(e) => tracing::debug!("Skipping unreadable entry {}: {}", path.display(), e),
            }
        }

        files.sort();
        Ok(files)
    }

    async fn create_dir_all(&self, dir: &Path) -> Result<()> {
        let full_path = self.resolve(dir);
        fs::create_dir_all(&full_path)
            .await
            .map_err(|e| SplitError::from_io(e, &full_path, FileOperation::CreateDir))
    }

    async fn is_dir(&self, path: &Path) -> Result<bool> {
        let full_path = self.resolve(path);
        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SplitError::from_io(e, &full_path, FileOperation::Read)),
        }
    }
}
