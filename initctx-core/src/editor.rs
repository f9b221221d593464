//! Editor focus state: open tabs, the active file, and its selection.

use crate::mention::LineRange;
use initctx_commons::normalize_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("no open editor tab for {}", .0.display())]
    FileNotOpen(PathBuf),
    #[error("no active editor to select lines in")]
    NoActiveFile,
    #[error("'{}' does not name a file", .0.display())]
    InvalidPath(PathBuf),
}

/// What the chat context cares about: the active file and its selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorFocusState {
    pub active_file: Option<PathBuf>,
    /// Only present for a non-empty selection in `active_file`.
    pub selection: Option<LineRange>,
}

/// Change applied to the editor surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    FileOpened { path: PathBuf },
    TabActivated { path: PathBuf },
    SelectionChanged { path: PathBuf, range: LineRange },
    SelectionCleared { path: PathBuf },
    TabClosed { path: PathBuf, active: Option<PathBuf> },
}

/// Tabs of the editor area. At most one tab is active; the selection belongs
/// to the active tab and is dropped whenever a different tab becomes active.
#[derive(Debug, Clone, Default)]
pub struct EditorSurface {
    tabs: Vec<PathBuf>,
    active: Option<usize>,
    selection: Option<LineRange>,
}

impl EditorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path` in a new tab, or activates its existing tab. Paths that
    /// normalize to no file name (`""`, `.`, `..`, `/`) are rejected.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<EditorEvent, EditorError> {
        let requested = path.as_ref();
        let path = normalize_path(requested);
        if path.file_name().is_none() {
            return Err(EditorError::InvalidPath(requested.to_path_buf()));
        }
        let event = match self.tab_index(&path) {
            Some(index) => {
                self.activate(index);
                EditorEvent::TabActivated { path }
            }
            None => {
                self.tabs.push(path.clone());
                self.activate(self.tabs.len() - 1);
                EditorEvent::FileOpened { path }
            }
        };
        Ok(event)
    }

    /// Activates an already-open tab.
    pub fn activate_tab(&mut self, path: impl AsRef<Path>) -> Result<EditorEvent, EditorError> {
        let path = normalize_path(path.as_ref());
        let index = self
            .tab_index(&path)
            .ok_or_else(|| EditorError::FileNotOpen(path.clone()))?;
        self.activate(index);
        Ok(EditorEvent::TabActivated { path })
    }

    /// Selects a line range in the active tab, replacing any prior selection.
    pub fn select_lines(&mut self, range: LineRange) -> Result<EditorEvent, EditorError> {
        let path = self.active_file().ok_or(EditorError::NoActiveFile)?.to_path_buf();
        self.selection = Some(range);
        Ok(EditorEvent::SelectionChanged { path, range })
    }

    /// Collapses the selection to a cursor.
    pub fn clear_selection(&mut self) -> Result<EditorEvent, EditorError> {
        let path = self.active_file().ok_or(EditorError::NoActiveFile)?.to_path_buf();
        self.selection = None;
        Ok(EditorEvent::SelectionCleared { path })
    }

    /// Closes a tab. Closing the active tab activates its left neighbour, or
    /// the new first tab when the closed tab was first.
    pub fn close_tab(&mut self, path: impl AsRef<Path>) -> Result<EditorEvent, EditorError> {
        let path = normalize_path(path.as_ref());
        let index = self
            .tab_index(&path)
            .ok_or_else(|| EditorError::FileNotOpen(path.clone()))?;
        self.tabs.remove(index);

        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active == index => {
                self.selection = None;
                Some(index.saturating_sub(1).min(self.tabs.len() - 1))
            }
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        if self.active.is_none() {
            self.selection = None;
        }

        Ok(EditorEvent::TabClosed {
            path,
            active: self.active_file().map(Path::to_path_buf),
        })
    }

    pub fn active_file(&self) -> Option<&Path> {
        self.active
            .and_then(|index| self.tabs.get(index))
            .map(PathBuf::as_path)
    }

    pub fn selection(&self) -> Option<LineRange> {
        self.active.and(self.selection)
    }

    pub fn open_tabs(&self) -> &[PathBuf] {
        &self.tabs
    }

    pub fn focus_state(&self) -> EditorFocusState {
        EditorFocusState {
            active_file: self.active_file().map(Path::to_path_buf),
            selection: self.selection(),
        }
    }

    fn tab_index(&self, path: &Path) -> Option<usize> {
        self.tabs.iter().position(|tab| tab == path)
    }

    fn activate(&mut self, index: usize) {
        if self.active != Some(index) {
            self.selection = None;
        }
        self.active = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_files_activates_newest_tab() {
        let mut editor = EditorSurface::new();
        assert_eq!(
            editor.open_file("main.c").unwrap(),
            EditorEvent::FileOpened {
                path: PathBuf::from("main.c")
            }
        );
        editor.open_file("README.md").unwrap();
        assert_eq!(editor.active_file(), Some(Path::new("README.md")));
        assert_eq!(editor.open_tabs().len(), 2);
    }

    #[test]
    fn paths_without_a_file_name_are_rejected() {
        let mut editor = EditorSurface::new();
        editor.open_file("main.c").unwrap();
        for raw in ["", ".", "..", "src/..", "/"] {
            assert_eq!(
                editor.open_file(raw),
                Err(EditorError::InvalidPath(PathBuf::from(raw))),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(editor.open_tabs().len(), 1);
        assert_eq!(editor.active_file(), Some(Path::new("main.c")));
    }

    #[test]
    fn reopening_an_open_file_activates_its_tab() {
        let mut editor = EditorSurface::new();
        editor.open_file("main.c").unwrap();
        editor.open_file("README.md").unwrap();
        let event = editor.open_file("./main.c").unwrap();
        assert!(matches!(event, EditorEvent::TabActivated { .. }));
        assert_eq!(editor.open_tabs().len(), 2);
        assert_eq!(editor.active_file(), Some(Path::new("main.c")));
    }

    #[test]
    fn selection_is_dropped_on_tab_switch_and_not_restored() {
        let mut editor = EditorSurface::new();
        editor.open_file("main.c").unwrap();
        editor.select_lines(LineRange::new(2, 4)).unwrap();
        editor.open_file("README.md").unwrap();
        assert_eq!(editor.selection(), None);

        editor.activate_tab("main.c").unwrap();
        assert_eq!(editor.focus_state().selection, None);
    }

    #[test]
    fn reactivating_the_active_tab_keeps_selection() {
        let mut editor = EditorSurface::new();
        editor.open_file("main.c").unwrap();
        editor.select_lines(LineRange::new(1, 3)).unwrap();
        editor.activate_tab("main.c").unwrap();
        assert_eq!(editor.selection(), Some(LineRange::new(1, 3)));
    }

    #[test]
    fn selecting_without_active_file_fails() {
        let mut editor = EditorSurface::new();
        assert_eq!(
            editor.select_lines(LineRange::new(1, 2)),
            Err(EditorError::NoActiveFile)
        );
        assert_eq!(
            editor.activate_tab("missing.rs"),
            Err(EditorError::FileNotOpen(PathBuf::from("missing.rs")))
        );
    }

    #[test]
    fn closing_active_tab_activates_left_neighbour() {
        let mut editor = EditorSurface::new();
        editor.open_file("a.rs").unwrap();
        editor.open_file("b.rs").unwrap();
        editor.open_file("c.rs").unwrap();
        editor.select_lines(LineRange::new(1, 1)).unwrap();

        let event = editor.close_tab("c.rs").unwrap();
        assert_eq!(
            event,
            EditorEvent::TabClosed {
                path: PathBuf::from("c.rs"),
                active: Some(PathBuf::from("b.rs")),
            }
        );
        assert_eq!(editor.selection(), None);

        editor.activate_tab("a.rs").unwrap();
        editor.close_tab("a.rs").unwrap();
        assert_eq!(editor.active_file(), Some(Path::new("b.rs")));

        editor.close_tab("b.rs").unwrap();
        assert_eq!(editor.focus_state(), EditorFocusState::default());
    }

    #[test]
    fn closing_inactive_tab_keeps_focus_and_selection() {
        let mut editor = EditorSurface::new();
        editor.open_file("a.rs").unwrap();
        editor.open_file("b.rs").unwrap();
        editor.select_lines(LineRange::new(3, 5)).unwrap();
        editor.close_tab("a.rs").unwrap();
        assert_eq!(editor.active_file(), Some(Path::new("b.rs")));
        assert_eq!(editor.selection(), Some(LineRange::new(3, 5)));
    }
}
