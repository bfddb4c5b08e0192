use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ListLoaded(result) => {
                self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
                self.upload.apply_refresh(result);
                self.clamp_cursors();
            }
            BackendEvent::UploadFinished(result) => {
                let notice = self.upload.finish_upload(result);
                if notice.requests_refresh() {
                    self.selected_cursor = 0;
                    self.request_refresh();
                }
                self.notice = Some(notice);
            }
            BackendEvent::DeleteFinished { id, result } => {
                let notice = self.upload.finish_delete(id, result);
                if notice.requests_refresh() {
                    self.request_refresh();
                }
                self.notice = Some(notice);
            }
        }
    }
}
