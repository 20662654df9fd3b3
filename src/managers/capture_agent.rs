//! Capture Agent.
//!
//! Builds a bookmark from the page's playback position and metadata, asks the
//! user for a note, and appends the record to the stored collection.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::services::sync_store::{read_bookmarks, write_bookmarks, SyncStore};
use crate::services::video_url::{extract_video_id, strip_time_offset, thumbnail_url};
use crate::types::bookmark::Bookmark;
use crate::types::errors::CaptureError;
use crate::types::page::HostPage;
use crate::types::settings::CaptureSettings;

/// Answer to the note request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Entered(String),
    Dismissed,
}

impl PromptResponse {
    /// Dismissal and empty input both give an empty note.
    pub fn into_note(self) -> String {
        match self {
            PromptResponse::Entered(text) => text,
            PromptResponse::Dismissed => String::new(),
        }
    }
}

/// Blocking request for the note attached to a capture.
pub trait NotePrompt {
    fn ask(&self, message: &str) -> PromptResponse;
}

/// A prompt whose answer is already known, e.g. sent along with an RPC call.
pub struct PresetNote(pub Option<String>);

impl NotePrompt for PresetNote {
    fn ask(&self, _message: &str) -> PromptResponse {
        match &self.0 {
            Some(text) => PromptResponse::Entered(text.clone()),
            None => PromptResponse::Dismissed,
        }
    }
}

/// Message shown to the user once a capture has finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Saved(Bookmark),
    Failed(String),
}

pub trait UserNotifier {
    fn notify(&self, notice: &Notice);
}

/// Notifier that only writes to the log.
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Saved(bookmark) => log::info!("[CAPTURE] Bookmark saved: {}", bookmark.id),
            Notice::Failed(msg) => log::error!("[CAPTURE] {}", msg),
        }
    }
}

/// Converts a playback position to whole seconds.
///
/// Absent, negative and non-finite positions all become 0.
pub fn floor_seconds(current_time: Option<f64>) -> u64 {
    match current_time {
        Some(t) if t.is_finite() && t > 0.0 => t.floor() as u64,
        _ => 0,
    }
}

/// Builds a bookmark record from raw page data.
///
/// `page_title` falls back to `placeholder` when missing or blank.
pub fn build_bookmark(
    current_time: Option<f64>,
    page_url: &str,
    page_title: Option<&str>,
    placeholder: &str,
    note: String,
    added_at: i64,
) -> Bookmark {
    let url = strip_time_offset(page_url);
    let video_id = extract_video_id(&url);
    let thumbnail = thumbnail_url(&video_id);
    let title = page_title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(placeholder)
        .to_string();

    Bookmark {
        id: Uuid::new_v4().to_string(),
        url,
        video_id,
        title,
        thumbnail,
        time: floor_seconds(current_time),
        note,
        added_at,
    }
}

pub struct CaptureAgent {
    store: Arc<dyn SyncStore>,
    prompt: Box<dyn NotePrompt + Send>,
    notifier: Box<dyn UserNotifier + Send>,
    settings: CaptureSettings,
}

impl CaptureAgent {
    pub fn new(
        store: Arc<dyn SyncStore>,
        prompt: Box<dyn NotePrompt + Send>,
        notifier: Box<dyn UserNotifier + Send>,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            store,
            prompt,
            notifier,
            settings,
        }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Runs one capture against `page` and reports the outcome to the user.
    pub fn capture(&self, page: &dyn HostPage) -> Result<Bookmark, CaptureError> {
        let result = self.try_capture(page);
        match &result {
            Ok(bookmark) => self.notifier.notify(&Notice::Saved(bookmark.clone())),
            Err(err) => self.notifier.notify(&Notice::Failed(err.to_string())),
        }
        result
    }

    fn try_capture(&self, page: &dyn HostPage) -> Result<Bookmark, CaptureError> {
        let video = page.video().ok_or(CaptureError::NoVideo)?;
        let title = page.title();

        let note = self.prompt.ask(&self.settings.note_prompt).into_note();
        let bookmark = build_bookmark(
            video.current_time,
            &page.location(),
            title.as_deref(),
            &self.settings.untitled_placeholder,
            note,
            Self::now_millis(),
        );
        log::debug!("[CAPTURE] Saving bookmark {} at {}s", bookmark.id, bookmark.time);

        if !self.store.is_available() {
            return Err(CaptureError::StoreUnavailable);
        }

        let mut bookmarks = read_bookmarks(self.store.as_ref())?;
        bookmarks.push(bookmark.clone());
        write_bookmarks(self.store.as_ref(), &bookmarks)?;

        log::info!("[CAPTURE] Total bookmarks now: {}", bookmarks.len());
        Ok(bookmark)
    }
}
