//! Panel Renderer.
//!
//! Lists the stored bookmarks newest-first and is the only writer that edits
//! notes or deletes records. Every collection the panel writes is queued until
//! its change notification comes back; a notification matching a queued write
//! is the panel's own echo and does not re-render, so committing notes never
//! disturbs editors on other cards, however many writes are in flight. Any
//! other change reloads the panel.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::managers::note_editor::{EditorState, NoteEditor};
use crate::services::sync_store::{
    decode_bookmarks, read_bookmarks, write_bookmarks, StorageChange, SyncStore,
};
use crate::services::video_url::{fallback_thumbnail_url, format_timestamp, playback_url};
use crate::types::bookmark::{sort_newest_first, Bookmark};
use crate::types::errors::PanelError;
use crate::types::settings::PanelSettings;

/// One rendered bookmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkCard {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub fallback_thumbnail: Option<String>,
    pub time_label: String,
    pub note: String,
}

impl BookmarkCard {
    fn from_bookmark(b: &Bookmark) -> Self {
        let has_thumbnail = !b.thumbnail.is_empty();
        Self {
            id: b.id.clone(),
            title: b.display_title().to_string(),
            thumbnail: has_thumbnail.then(|| b.thumbnail.clone()),
            fallback_thumbnail: has_thumbnail.then(|| fallback_thumbnail_url(&b.video_id)),
            time_label: format_timestamp(b.time),
            note: b.note.clone(),
        }
    }
}

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelView {
    Empty { message: String },
    List { cards: Vec<BookmarkCard> },
    Error { message: String },
}

/// Where a click on a card landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    Card,
    NoteEditor,
    DeleteControl,
}

pub struct PanelRenderer {
    store: Arc<dyn SyncStore>,
    changes: broadcast::Receiver<StorageChange>,
    settings: PanelSettings,
    /// Collection in stored order, as last read or written by this panel.
    stored: Vec<Bookmark>,
    /// Collections written by this panel whose notifications have not arrived yet.
    pending_echoes: VecDeque<Vec<Bookmark>>,
    view: PanelView,
    editors: HashMap<String, NoteEditor>,
    render_count: u64,
}

impl PanelRenderer {
    /// Subscribes to store changes. Call [`load`](Self::load) to populate the view.
    pub fn new(store: Arc<dyn SyncStore>, settings: PanelSettings) -> Self {
        let changes = store.subscribe();
        let view = PanelView::Empty {
            message: settings.empty_message.clone(),
        };
        Self {
            store,
            changes,
            settings,
            stored: Vec::new(),
            pending_echoes: VecDeque::new(),
            view,
            editors: HashMap::new(),
            render_count: 0,
        }
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    /// Number of full renders performed so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn editor_state(&self, id: &str) -> Option<EditorState> {
        self.editors.get(id).map(NoteEditor::state)
    }

    /// Reads the whole collection and renders it newest-first.
    pub fn load(&mut self) -> Result<Vec<Bookmark>, PanelError> {
        let bookmarks = match read_bookmarks(self.store.as_ref()) {
            Ok(b) => b,
            Err(e) => {
                log::error!("[PANEL] Error loading bookmarks: {}", e);
                self.view = PanelView::Error {
                    message: "Error loading bookmarks.".to_string(),
                };
                return Err(e.into());
            }
        };
        log::debug!("[PANEL] Loaded {} bookmarks", bookmarks.len());
        self.stored = bookmarks;
        Ok(self.render())
    }

    fn render(&mut self) -> Vec<Bookmark> {
        let mut ordered = self.stored.clone();
        sort_newest_first(&mut ordered);

        self.editors = ordered
            .iter()
            .map(|b| (b.id.clone(), NoteEditor::new(&b.id, &b.note)))
            .collect();
        self.view = if ordered.is_empty() {
            PanelView::Empty {
                message: self.settings.empty_message.clone(),
            }
        } else {
            PanelView::List {
                cards: ordered.iter().map(BookmarkCard::from_bookmark).collect(),
            }
        };
        self.render_count += 1;
        ordered
    }

    /// Replaces the note of one record and writes the collection back.
    ///
    /// The view is patched in place rather than re-rendered.
    pub fn edit(&mut self, id: &str, note: &str) -> Result<(), PanelError> {
        let mut bookmarks = read_bookmarks(self.store.as_ref())?;
        let target = bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| PanelError::NotFound(id.to_string()))?;
        target.note = note.to_string();

        write_bookmarks(self.store.as_ref(), &bookmarks)?;
        self.pending_echoes.push_back(bookmarks.clone());
        self.stored = bookmarks;

        if let PanelView::List { cards } = &mut self.view {
            if let Some(card) = cards.iter_mut().find(|c| c.id == id) {
                card.note = note.to_string();
            }
        }
        log::info!("[PANEL] Note updated for bookmark: {}", id);
        Ok(())
    }

    /// Double-activation on a card's note editor.
    pub fn expand_editor(&mut self, id: &str) -> bool {
        self.editors
            .get_mut(id)
            .map(NoteEditor::double_activate)
            .unwrap_or(false)
    }

    pub fn type_note(&mut self, id: &str, text: &str) {
        if let Some(editor) = self.editors.get_mut(id) {
            editor.input(text);
        }
    }

    /// Focus left the note editor: collapse it and commit the note.
    ///
    /// Failures are logged, not raised. Returns whether the note was stored.
    pub fn blur_editor(&mut self, id: &str) -> bool {
        let Some(commit) = self.editors.get_mut(id).map(NoteEditor::blur) else {
            return false;
        };
        match self.edit(&commit.bookmark_id, &commit.note) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[PANEL] Failed to update note for {}: {}", id, e);
                false
            }
        }
    }

    /// Removes one record, writes back, and re-renders from the result.
    pub fn delete(&mut self, id: &str) -> Result<Vec<Bookmark>, PanelError> {
        let bookmarks = read_bookmarks(self.store.as_ref())?;
        let before = bookmarks.len();
        let remaining: Vec<Bookmark> = bookmarks.into_iter().filter(|b| b.id != id).collect();
        if remaining.len() == before {
            return Err(PanelError::NotFound(id.to_string()));
        }

        write_bookmarks(self.store.as_ref(), &remaining)?;
        self.pending_echoes.push_back(remaining.clone());
        log::info!("[PANEL] Deleted bookmark: {}", id);
        self.stored = remaining;
        Ok(self.render())
    }

    /// Link to play a bookmark from its saved time.
    ///
    /// Clicks that land on the note editor or the delete control never navigate.
    pub fn open(&self, id: &str, origin: ClickOrigin) -> Option<String> {
        if origin != ClickOrigin::Card {
            return None;
        }
        self.stored
            .iter()
            .find(|b| b.id == id)
            .map(|b| playback_url(&b.url, b.time))
    }

    /// Reacts to one store change. Returns whether the panel re-rendered.
    pub fn handle_change(&mut self, change: &StorageChange) -> Result<bool, PanelError> {
        if !change.is_bookmarks_in(self.store.area()) {
            return Ok(false);
        }
        if let Ok(incoming) = decode_bookmarks(change.new_value.clone()) {
            if self.take_echo(&incoming) || incoming == self.stored {
                return Ok(false);
            }
        }
        self.load()?;
        Ok(true)
    }

    /// Consumes the queued write matching `incoming`, and any older ones.
    ///
    /// Notifications arrive in write order, so queued writes ahead of the match
    /// were superseded before their own echo could be seen.
    fn take_echo(&mut self, incoming: &[Bookmark]) -> bool {
        match self.pending_echoes.iter().position(|w| w.as_slice() == incoming) {
            Some(idx) => {
                self.pending_echoes.drain(..=idx);
                true
            }
            None => false,
        }
    }

    /// Drains pending notifications. Returns how many re-renders happened.
    pub fn pump(&mut self) -> Result<usize, PanelError> {
        let mut rendered = 0;
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    if self.handle_change(&change)? {
                        rendered += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("[PANEL] Missed {} change notifications, reloading", skipped);
                    self.pending_echoes.clear();
                    self.load()?;
                    rendered += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        Ok(rendered)
    }

    /// Waits for the next notification and handles it.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn next_change(&mut self) -> Option<Result<bool, PanelError>> {
        match self.changes.recv().await {
            Ok(change) => Some(self.handle_change(&change)),
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("[PANEL] Missed {} change notifications, reloading", skipped);
                self.pending_echoes.clear();
                Some(self.load().map(|_| true))
            }
            Err(RecvError::Closed) => None,
        }
    }
}
