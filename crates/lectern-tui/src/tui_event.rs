use lectern_core::{ApiError, RemoteFileRecord, UploadBatch};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Fetch the uploaded-files list.
    Refresh,
    /// Send one batch to the upload endpoint.
    Upload(UploadBatch),
    /// Delete a single uploaded file.
    Delete { id: u64 },
}

/// Events flowing from backend tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// A list request completed.
    ListLoaded(Result<Vec<RemoteFileRecord>, ApiError>),
    /// An upload request completed.
    UploadFinished(Result<serde_json::Value, ApiError>),
    /// A delete request completed.
    DeleteFinished { id: u64, result: Result<(), ApiError> },
}
