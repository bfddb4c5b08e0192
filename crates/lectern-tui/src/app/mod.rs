mod backend;
mod file_picker;
mod update;
mod update_file_picker;


pub use file_picker::FilePickerState;

use lectern_core::{ApiError, Notice, RecordOrder, RemoteFileRecord, UploadScreen};
use tokio::sync::mpsc;

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Upload,
    FilePicker,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
}

/// Pane of the upload screen that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Selected,
    Course,
    Subject,
    UploadButton,
    Search,
    Uploaded,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Selected,
        Focus::Course,
        Focus::Subject,
        Focus::UploadButton,
        Focus::Search,
        Focus::Uploaded,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// Whether Enter on this pane starts editing a text field.
    pub fn is_text_field(self) -> bool {
        matches!(self, Focus::Course | Focus::Subject | Focus::Search)
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub upload: UploadScreen,
    pub focus: Focus,
    pub input_mode: InputMode,
    /// Field contents before editing started, restored on cancel.
    pub edit_original: Option<String>,
    pub selected_cursor: usize,
    pub uploaded_cursor: usize,
    /// Blocking notification; every other input waits until it is dismissed.
    pub notice: Option<Notice>,
    pub file_picker: FilePickerState,
    pub theme: Theme,
    pub api_label: String,
    pub tick: usize,
    pub visible_rows: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    pub refreshes_in_flight: usize,
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(theme: Theme, order: RecordOrder, api_label: impl Into<String>) -> Self {
        Self {
            screen: Screen::Upload,
            upload: UploadScreen::new(order),
            focus: Focus::Selected,
            input_mode: InputMode::Normal,
            edit_original: None,
            selected_cursor: 0,
            uploaded_cursor: 0,
            notice: None,
            file_picker: FilePickerState::new(),
            theme,
            api_label: api_label.into(),
            tick: 0,
            visible_rows: 10,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            refreshes_in_flight: 0,
            backend_cmd_tx: None,
        }
    }

    /// Call when the screen first becomes active. Only the first call
    /// requests the initial list.
    pub fn mount(&mut self) {
        if self.upload.mount() {
            self.request_refresh();
        }
    }

    fn send_command(&self, cmd: BackendCommand) -> bool {
        match &self.backend_cmd_tx {
            Some(tx) => tx.send(cmd).is_ok(),
            None => false,
        }
    }

    pub fn request_refresh(&mut self) {
        if self.send_command(BackendCommand::Refresh) {
            self.refreshes_in_flight += 1;
        } else {
            tracing::warn!("backend unavailable, refresh skipped");
        }
    }

    /// Start an upload of the pending batch. Ignored while disabled.
    pub fn submit(&mut self) {
        let Some(batch) = self.upload.begin_upload() else {
            return;
        };
        tracing::info!(
            files = batch.files.len(),
            course = %batch.course,
            subject = %batch.subject,
            "submitting upload"
        );
        if !self.send_command(BackendCommand::Upload(batch)) {
            let notice = self.upload.finish_upload(Err(backend_gone()));
            self.notice = Some(notice);
        }
    }

    pub fn request_delete(&mut self, id: u64) {
        tracing::debug!(id, "delete requested");
        if !self.send_command(BackendCommand::Delete { id }) {
            let notice = self.upload.finish_delete(id, Err(backend_gone()));
            self.notice = Some(notice);
        }
    }

    /// Uploaded-file record under the cursor, if any.
    pub fn current_record(&self) -> Option<&RemoteFileRecord> {
        self.upload
            .filtered_records()
            .get(self.uploaded_cursor)
            .copied()
    }

    /// Keep both list cursors inside their lists after the lists change.
    pub fn clamp_cursors(&mut self) {
        let pending = self.upload.pending().len();
        self.selected_cursor = self.selected_cursor.min(pending.saturating_sub(1));
        let shown = self.upload.filtered_records().len();
        self.uploaded_cursor = self.uploaded_cursor.min(shown.saturating_sub(1));
    }

    /// Current contents of a text field pane.
    pub fn field_value(&self, focus: Focus) -> Option<&str> {
        match focus {
            Focus::Course => Some(self.upload.course()),
            Focus::Subject => Some(self.upload.subject()),
            Focus::Search => Some(self.upload.filter()),
            _ => None,
        }
    }

    fn set_field_value(&mut self, focus: Focus, value: String) {
        match focus {
            Focus::Course => self.upload.set_course(value),
            Focus::Subject => self.upload.set_subject(value),
            Focus::Search => {
                self.upload.set_filter(value);
                self.clamp_cursors();
            }
            _ => {}
        }
    }

    /// Whether the given pane is the text field being edited.
    pub fn is_editing(&self, focus: Focus) -> bool {
        self.input_mode == InputMode::TextInput && self.focus == focus
    }

    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::Upload => crate::view::upload::render_in(f, self, area),
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
        }

        if let Some(notice) = &self.notice {
            crate::view::notice::render(f, notice, &self.theme);
        }
        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

fn backend_gone() -> ApiError {
    ApiError::Connection("backend task is not running".to_string())
}
