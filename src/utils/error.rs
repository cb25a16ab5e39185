use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 檔案系統操作種類，用於把 `io::Error` 轉成對應的錯誤類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    List,
    CreateDir,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileOperation::Read => "reading",
            FileOperation::Write => "writing",
            FileOperation::List => "listing",
            FileOperation::CreateDir => "creating directory",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("File not found: {path}")]
    FileNotFoundError { path: String },

    #[error("Permission denied while {operation} {path}")]
    PermissionError {
        path: String,
        operation: FileOperation,
    },

    #[error("Malformed input in {path}: {message}")]
    MalformedInputError { path: String, message: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("IO error while {operation} {path}: {source}")]
    IoError {
        path: String,
        operation: FileOperation,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    FileSystem,
    Input,
    Validation,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SplitError {
    /// 依照操作種類分類 IO 錯誤
    ///
    /// 寫入時找不到路徑代表父目錄不存在，屬於一般 IO 錯誤而非輸入檔不存在。
    pub fn from_io(source: io::Error, path: &Path, operation: FileOperation) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound
                if matches!(operation, FileOperation::Read | FileOperation::List) =>
            {
                SplitError::FileNotFoundError { path }
            }
            io::ErrorKind::PermissionDenied => SplitError::PermissionError { path, operation },
            _ => SplitError::IoError {
                path,
                operation,
                source,
            },
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        SplitError::UsageError {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SplitError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SplitError::UsageError { .. } => ErrorCategory::Usage,
            SplitError::FileNotFoundError { .. }
            | SplitError::PermissionError { .. }
            | SplitError::IoError { .. } => ErrorCategory::FileSystem,
            SplitError::MalformedInputError { .. } => ErrorCategory::Input,
            SplitError::ValidationError { .. } => ErrorCategory::Validation,
            SplitError::ConfigValidationError { .. }
            | SplitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SplitError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Usage | ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::FileSystem => match self {
                SplitError::IoError { .. } => ErrorSeverity::Critical,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SplitError::UsageError { .. } => {
                "用法: bill-splitter --input=<檔案或目錄> --output=<檔案或目錄> [--format=json|text]"
            }
            SplitError::FileNotFoundError { .. } => "請確認輸入路徑是否正確、檔案是否存在",
            SplitError::PermissionError { .. } => "請確認目前使用者對該路徑有讀寫權限",
            SplitError::MalformedInputError { .. } => {
                "請確認輸入檔為合法 JSON，且包含 date、location、subTotal、tip、participants 欄位"
            }
            SplitError::ValidationError { .. } => {
                "小計與小費不可為負數，且至少需要一位有名字的參與者"
            }
            SplitError::IoError { .. } => "請確認輸出目錄存在且磁碟空間足夠",
            SplitError::ConfigValidationError { .. }
            | SplitError::InvalidConfigValueError { .. } => "請檢查設定檔內容是否為合法 TOML 及合理範圍",
            SplitError::SerializationError(_) => "請回報此問題並附上輸入檔",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SplitError::UsageError { message } => format!("參數錯誤: {}", message),
            SplitError::FileNotFoundError { path } => format!("找不到檔案: {}", path),
            SplitError::PermissionError { path, operation } => {
                format!("沒有權限存取 {} ({})", path, operation)
            }
            SplitError::MalformedInputError { path, message } => {
                format!("輸入檔格式錯誤 {}: {}", path, message)
            }
            SplitError::ValidationError { field, message } => {
                format!("帳單資料不合法 ({}): {}", field, message)
            }
            SplitError::IoError {
                path,
                operation,
                source,
            } => format!("檔案操作失敗 {} ({}): {}", path, operation, source),
            SplitError::ConfigValidationError { field, message } => {
                format!("設定檔錯誤 ({}): {}", field, message)
            }
            SplitError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("設定值不合法 {} = '{}': {}", field, value, reason),
            SplitError::SerializationError(e) => format!("輸出序列化失敗: {}", e),
        }
    }
}

#[cfg(feature = "cli")]
impl From<clap::Error> for SplitError {
    fn from(error: clap::Error) -> Self {
        let rendered = error.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        SplitError::UsageError { message }
    }
}
