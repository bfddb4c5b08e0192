use std::sync::Arc;

use lectern_core::MaterialApi;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands from the UI and run each one as its own task.
///
/// Commands are not serialized against each other: a refresh may overlap an
/// upload or a delete, and whichever finishes last is applied last.
pub async fn listen<A: MaterialApi + 'static>(
    api: Arc<A>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        tracing::debug!(?cmd, "backend command");

        let api = api.clone();
        let tx = event_tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let event = tokio::select! {
                _ = cancel.cancelled() => return,
                event = run_command(api.as_ref(), cmd) => event,
            };
            // The UI may already be gone; late results are dropped.
            let _ = tx.send(event);
        });
    }
}

/// Execute a single command against the API and wrap its outcome.
pub async fn run_command<A: MaterialApi>(api: &A, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::Refresh => BackendEvent::ListLoaded(api.list_files().await),
        BackendCommand::Upload(batch) => BackendEvent::UploadFinished(api.upload(&batch).await),
        BackendCommand::Delete { id } => BackendEvent::DeleteFinished {
            id,
            result: api.delete_file(id).await,
        },
    }
}
