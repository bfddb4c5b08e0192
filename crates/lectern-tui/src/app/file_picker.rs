use std::path::{Path, PathBuf};

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
    /// Files picked so far, in the order they were picked.
    pub selected: Vec<PathBuf>,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new_in(current_dir)
    }

    pub fn new_in(dir: impl Into<PathBuf>) -> Self {
        let mut state = Self {
            current_dir: dir.into(),
            entries: Vec::new(),
            cursor: 0,
            selected: Vec::new(),
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        match std::fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs = Vec::new();
                let mut files = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    // Skip hidden files/dirs
                    if name.starts_with('.') {
                        continue;
                    }

                    let is_dir = path.is_dir();
                    let entry = FileEntry { name, path, is_dir };
                    if is_dir {
                        dirs.push(entry);
                    } else {
                        files.push(entry);
                    }
                }

                dirs.sort_by_key(|e| e.name.to_lowercase());
                files.sort_by_key(|e| e.name.to_lowercase());

                entries.extend(dirs);
                entries.extend(files);
            }
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot list directory");
            }
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Toggle selection of the file under the cursor. Directories are not selectable.
    pub fn toggle_selected(&mut self) {
        if let Some(entry) = self.entries.get(self.cursor)
            && !entry.is_dir
        {
            if let Some(pos) = self.selected.iter().position(|p| p == &entry.path) {
                self.selected.remove(pos);
            } else {
                self.selected.push(entry.path.clone());
            }
        }
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.iter().any(|p| p == path)
    }

    /// Hand over the picked files and start the next pick empty.
    pub fn take_selection(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.selected)
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}
