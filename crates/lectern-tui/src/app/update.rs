use super::{App, Focus, InputMode, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(20).max(1);
                return false;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack | Action::CancelInput => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        // Notice modal blocks everything until dismissed
        if self.notice.is_some() {
            match action {
                Action::DrillIn
                | Action::NavigateBack
                | Action::ConfirmInput
                | Action::CancelInput => {
                    self.notice = None;
                }
                Action::Quit => {
                    self.confirm_quit = true;
                }
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::Quit => self.confirm_quit = true,
                Action::ToggleHelp | Action::NavigateBack | Action::DrillIn => {
                    self.show_help = false;
                }
                _ => {}
            }
            return false;
        }

        match self.screen {
            Screen::FilePicker => self.handle_file_picker_action(action),
            Screen::Upload if self.input_mode == InputMode::TextInput => {
                self.handle_text_input(action)
            }
            Screen::Upload => self.handle_upload_action(action),
        }
        false
    }

    fn handle_upload_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::FocusNext => {
                self.focus = self.focus.next();
            }
            Action::FocusPrev => {
                self.focus = self.focus.prev();
            }
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::PageDown => self.move_cursor(self.visible_rows as isize),
            Action::PageUp => self.move_cursor(-(self.visible_rows as isize)),
            Action::GoTop => self.move_cursor(isize::MIN),
            Action::GoBottom => self.move_cursor(isize::MAX),
            Action::DrillIn => match self.focus {
                Focus::UploadButton => self.submit(),
                focus if focus.is_text_field() => self.start_editing(),
                _ => {}
            },
            Action::StartSearch => {
                self.focus = Focus::Search;
                self.start_editing();
            }
            Action::AddFiles => {
                self.file_picker.selected.clear();
                self.screen = Screen::FilePicker;
            }
            Action::Remove => match self.focus {
                Focus::Selected => {
                    if let Some(file) = self.upload.remove_file(self.selected_cursor) {
                        tracing::debug!(name = %file.name, "removed pending file");
                    }
                    self.clamp_cursors();
                }
                Focus::Uploaded => {
                    if let Some(id) = self.current_record().map(|r| r.id) {
                        self.request_delete(id);
                    }
                }
                _ => {}
            },
            Action::Submit => self.submit(),
            Action::Refresh => self.request_refresh(),
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_text_input(&mut self, action: Action) {
        let focus = self.focus;
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::TextInput(ch) => {
                let mut value = self.field_value(focus).unwrap_or_default().to_string();
                value.push(ch);
                self.set_field_value(focus, value);
            }
            Action::Backspace => {
                let mut value = self.field_value(focus).unwrap_or_default().to_string();
                value.pop();
                self.set_field_value(focus, value);
            }
            Action::ConfirmInput => {
                self.edit_original = None;
                self.input_mode = InputMode::Normal;
            }
            Action::CancelInput => {
                if let Some(original) = self.edit_original.take() {
                    self.set_field_value(focus, original);
                }
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn start_editing(&mut self) {
        if let Some(value) = self.field_value(self.focus) {
            self.edit_original = Some(value.to_string());
            self.input_mode = InputMode::TextInput;
        }
    }

    /// Move the cursor of the focused list by `delta` rows, saturating at both ends.
    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Selected => (&mut self.selected_cursor, self.upload.pending().len()),
            Focus::Uploaded => {
                let len = self.upload.filtered_records().len();
                (&mut self.uploaded_cursor, len)
            }
            _ => return,
        };
        let max = len.saturating_sub(1);
        *cursor = cursor.saturating_add_signed(delta).min(max);
    }
}
