use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod client;
pub mod config;
pub mod config_file;
pub mod error;
pub mod screen;
pub mod session;

// Re-export for convenience
pub use client::{Endpoints, HttpMaterialApi, HttpMaterialApiBuilder, MaterialApi};
pub use config::Settings;
pub use error::ApiError;
pub use screen::{RecordOrder, UploadScreen, filtered_indices};
pub use session::Session;

/// Where the bytes of a pending file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Read from disk when the batch is submitted.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Vec<u8>),
}

/// A locally selected file that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub content: FileContent,
}

impl PendingFile {
    /// Wrap a file on disk. The display name is the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            content: FileContent::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Bytes(bytes.into()),
        }
    }

    /// Load the file contents for upload.
    pub async fn read(&self) -> Result<Vec<u8>, ApiError> {
        match &self.content {
            FileContent::Bytes(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ApiError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Pending files plus metadata, snapshotted at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub files: Vec<PendingFile>,
    pub course: String,
    pub subject: String,
}

/// Server-side record of an uploaded file, as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    pub id: u64,
    pub file_name: String,
    pub uploaded_at: String,
}

impl RemoteFileRecord {
    /// Date part of `uploaded_at` (its first 10 characters).
    pub fn upload_date(&self) -> &str {
        match self.uploaded_at.char_indices().nth(10) {
            Some((end, _)) => &self.uploaded_at[..end],
            None => &self.uploaded_at,
        }
    }
}

/// User-visible outcome of an upload or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UploadSucceeded { files: usize },
    UploadFailed { reason: String },
    DeleteSucceeded { id: u64 },
    DeleteFailed { id: u64, reason: String },
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::UploadFailed { .. } | Self::DeleteFailed { .. })
    }

    /// Whether the authoritative list should be re-fetched after this outcome.
    pub fn requests_refresh(&self) -> bool {
        matches!(self, Self::UploadSucceeded { .. } | Self::DeleteSucceeded { .. })
    }

    /// Short headline for popups.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UploadSucceeded { .. } | Self::DeleteSucceeded { .. } => "Done",
            Self::UploadFailed { .. } | Self::DeleteFailed { .. } => "Error",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadSucceeded { files: 1 } => write!(f, "1 file uploaded successfully"),
            Self::UploadSucceeded { files } => write!(f, "{files} files uploaded successfully"),
            Self::UploadFailed { reason } => write!(f, "Error uploading files: {reason}"),
            Self::DeleteSucceeded { id } => write!(f, "File {id} deleted successfully"),
            Self::DeleteFailed { id, reason } => write!(f, "Error deleting file {id}: {reason}"),
        }
    }
}
