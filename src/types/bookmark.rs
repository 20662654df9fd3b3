use serde::{Deserialize, Serialize};

/// Storage key holding the whole bookmark collection.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Storage area the collection lives in.
pub const SYNC_AREA: &str = "sync";

/// Title used when the page exposes none.
pub const UNTITLED_VIDEO: &str = "Untitled Video";

/// A saved (video, timestamp, note) tuple.
///
/// Field names are serialized in camelCase so stored collections keep the
/// same shape regardless of which writer produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    pub time: u64,
    #[serde(default)]
    pub note: String,
    pub added_at: i64,
}

impl Bookmark {
    /// Title to display, falling back to the placeholder for untitled records.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_VIDEO
        } else {
            &self.title
        }
    }
}

/// Sorts a collection newest-first by `added_at`.
///
/// The sort is stable, so records sharing a timestamp keep their stored order.
pub fn sort_newest_first(bookmarks: &mut [Bookmark]) {
    bookmarks.sort_by(|a, b| b.added_at.cmp(&a.added_at));
}
