//! Per-bookmark note editor state.

/// Editor presentation state. `Collapsed` is both initial and safe to stop in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Collapsed,
    Expanded,
}

/// A note ready to be written back, produced when the editor loses focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCommit {
    pub bookmark_id: String,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct NoteEditor {
    bookmark_id: String,
    state: EditorState,
    draft: String,
}

impl NoteEditor {
    pub fn new(bookmark_id: &str, note: &str) -> Self {
        Self {
            bookmark_id: bookmark_id.to_string(),
            state: EditorState::Collapsed,
            draft: note.to_string(),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Double-activation expands a collapsed editor. Returns whether it changed state.
    pub fn double_activate(&mut self) -> bool {
        if self.state == EditorState::Collapsed {
            self.state = EditorState::Expanded;
            true
        } else {
            false
        }
    }

    /// Keystrokes only touch the draft; nothing is stored until blur.
    pub fn input(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Focus loss collapses the editor and commits the trimmed draft.
    ///
    /// The draft itself is trimmed too, so it matches what gets stored.
    pub fn blur(&mut self) -> NoteCommit {
        self.state = EditorState::Collapsed;
        self.draft = self.draft.trim().to_string();
        NoteCommit {
            bookmark_id: self.bookmark_id.clone(),
            note: self.draft.clone(),
        }
    }
}
