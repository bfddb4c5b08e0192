use lectern_core::PendingFile;

use super::{App, Focus, Screen};
use crate::action::Action;

impl App {
    /// Handle input while on the file picker screen.
    pub(super) fn handle_file_picker_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                // Append picked files in pick order and go back to the upload screen
                let picked = self.file_picker.take_selection();
                if !picked.is_empty() {
                    tracing::debug!(count = picked.len(), "files picked");
                    self.upload
                        .add_files(picked.into_iter().map(PendingFile::from_path));
                    self.focus = Focus::Selected;
                }
                self.screen = Screen::Upload;
            }
            Action::MoveDown => {
                let max = self.file_picker.entries.len().saturating_sub(1);
                if self.file_picker.cursor < max {
                    self.file_picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                let max = self.file_picker.entries.len().saturating_sub(1);
                self.file_picker.cursor = (self.file_picker.cursor + page).min(max);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(page);
            }
            Action::GoTop => {
                self.file_picker.cursor = 0;
            }
            Action::GoBottom => {
                self.file_picker.cursor = self.file_picker.entries.len().saturating_sub(1);
            }
            Action::ToggleSelect => {
                self.file_picker.toggle_selected();
            }
            Action::DrillIn => {
                // Enter on directory opens it, on file toggles selection
                if !self.file_picker.enter_directory() {
                    self.file_picker.toggle_selected();
                }
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }
}
