//! Unit tests for the Panel Renderer: ordering, rendering, note edits,
//! deletes, click-to-open and change-notification driven refresh.

use std::sync::Arc;

use timemark::managers::capture_agent::{CaptureAgent, LogNotifier, PresetNote};
use timemark::managers::note_editor::EditorState;
use timemark::managers::panel_renderer::{ClickOrigin, PanelRenderer, PanelView};
use timemark::services::sync_store::{read_bookmarks, write_bookmarks, MemorySyncStore, SyncStore};
use timemark::types::bookmark::Bookmark;
use timemark::types::errors::PanelError;
use timemark::types::page::PageSnapshot;
use timemark::types::settings::{CaptureSettings, PanelSettings};

fn bookmark(id: &str, added_at: i64) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        url: format!("https://www.youtube.com/watch?v={}", id),
        video_id: id.to_string(),
        title: format!("Video {}", id),
        thumbnail: format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id),
        time: 3661,
        note: format!("note {}", id),
        added_at,
    }
}

/// A store seeded with three bookmarks (added_at 100, 300, 200) and a loaded panel.
fn setup() -> (Arc<MemorySyncStore>, PanelRenderer) {
    let store = Arc::new(MemorySyncStore::new());
    write_bookmarks(
        store.as_ref(),
        &[bookmark("a", 100), bookmark("b", 300), bookmark("c", 200)],
    )
    .unwrap();
    let mut panel = PanelRenderer::new(store.clone(), PanelSettings::default());
    panel.load().unwrap();
    panel.pump().unwrap();
    (store, panel)
}

fn card_ids(panel: &PanelRenderer) -> Vec<String> {
    match panel.view() {
        PanelView::List { cards } => cards.iter().map(|c| c.id.clone()).collect(),
        _ => Vec::new(),
    }
}

#[test]
fn test_load_sorts_newest_first() {
    let (_store, mut panel) = setup();
    let loaded = panel.load().unwrap();
    let order: Vec<i64> = loaded.iter().map(|b| b.added_at).collect();
    assert_eq!(order, vec![300, 200, 100]);
    assert_eq!(card_ids(&panel), vec!["b", "c", "a"]);
}

#[test]
fn test_cards_carry_formatted_time_and_thumbnails() {
    let (_store, panel) = setup();
    let PanelView::List { cards } = panel.view() else {
        panic!("expected a list view");
    };
    let card = &cards[0];
    assert_eq!(card.time_label, "1:01:01");
    assert_eq!(card.title, "Video b");
    assert_eq!(
        card.fallback_thumbnail.as_deref(),
        Some("https://img.youtube.com/vi/b/hqdefault.jpg")
    );
}

#[test]
fn test_empty_collection_renders_placeholder() {
    let store = Arc::new(MemorySyncStore::new());
    let mut panel = PanelRenderer::new(store, PanelSettings::default());
    assert!(panel.load().unwrap().is_empty());
    assert_eq!(
        *panel.view(),
        PanelView::Empty {
            message: PanelSettings::default().empty_message
        }
    );
}

#[test]
fn test_load_failure_renders_error() {
    let store = Arc::new(MemorySyncStore::new());
    store.set_available(false);
    let mut panel = PanelRenderer::new(store, PanelSettings::default());
    assert!(panel.load().is_err());
    assert!(matches!(panel.view(), PanelView::Error { .. }));
}

#[test]
fn test_edit_changes_only_target_note_without_rerender() {
    let (store, mut panel) = setup();
    let before = read_bookmarks(store.as_ref()).unwrap();
    let renders = panel.render_count();

    panel.edit("c", "updated").unwrap();

    let after = read_bookmarks(store.as_ref()).unwrap();
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == "c" {
            assert_eq!(new.note, "updated");
            assert_eq!(Bookmark { note: old.note.clone(), ..new.clone() }, *old);
        } else {
            assert_eq!(old, new);
        }
    }
    assert_eq!(panel.render_count(), renders);

    // The echo of our own write does not re-render either.
    assert_eq!(panel.pump().unwrap(), 0);
    assert_eq!(panel.render_count(), renders);
}

#[test]
fn test_back_to_back_edits_keep_other_editor_open() {
    let (store, mut panel) = setup();
    let renders = panel.render_count();
    assert!(panel.expand_editor("b"));
    panel.type_note("b", "half-written");

    panel.edit("a", "one").unwrap();
    panel.edit("a", "two").unwrap();

    assert_eq!(panel.pump().unwrap(), 0);
    assert_eq!(panel.render_count(), renders);
    assert_eq!(panel.editor_state("b"), Some(EditorState::Expanded));

    assert!(panel.blur_editor("b"));
    let stored = read_bookmarks(store.as_ref()).unwrap();
    assert_eq!(stored.iter().find(|b| b.id == "b").unwrap().note, "half-written");
    assert_eq!(stored.iter().find(|b| b.id == "a").unwrap().note, "two");
}

#[test]
fn test_edit_then_delete_echoes_do_not_rerender() {
    let (_store, mut panel) = setup();
    panel.edit("a", "one").unwrap();
    panel.delete("c").unwrap();
    let renders = panel.render_count();

    assert_eq!(panel.pump().unwrap(), 0);
    assert_eq!(panel.render_count(), renders);
    assert_eq!(card_ids(&panel), vec!["b", "a"]);
}

#[test]
fn test_external_write_between_own_edits_still_rerenders() {
    let (store, mut panel) = setup();
    panel.edit("a", "one").unwrap();

    let mut outside = read_bookmarks(store.as_ref()).unwrap();
    outside.retain(|b| b.id != "c");
    write_bookmarks(store.as_ref(), &outside).unwrap();

    assert_eq!(panel.pump().unwrap(), 1);
    assert_eq!(card_ids(&panel), vec!["b", "a"]);
}

#[test]
fn test_edit_unknown_id_writes_nothing() {
    let (store, mut panel) = setup();
    let mut rx = store.subscribe();
    assert_eq!(
        panel.edit("missing", "x").unwrap_err(),
        PanelError::NotFound("missing".to_string())
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_editor_blur_commits_trimmed_note() {
    let (store, mut panel) = setup();

    assert!(panel.expand_editor("a"));
    assert_eq!(panel.editor_state("a"), Some(EditorState::Expanded));
    panel.type_note("a", "  timestamp of the solo  ");
    assert!(panel.blur_editor("a"));

    assert_eq!(panel.editor_state("a"), Some(EditorState::Collapsed));
    let stored = read_bookmarks(store.as_ref()).unwrap();
    let a = stored.iter().find(|b| b.id == "a").unwrap();
    assert_eq!(a.note, "timestamp of the solo");
}

#[test]
fn test_editor_blur_failure_is_not_raised() {
    let (store, mut panel) = setup();
    panel.type_note("a", "lost");
    store.set_available(false);
    assert!(!panel.blur_editor("a"));
}

#[test]
fn test_delete_removes_exactly_one_and_preserves_order() {
    let (store, mut panel) = setup();
    let renders = panel.render_count();

    let remaining = panel.delete("c").unwrap();

    let stored: Vec<String> = read_bookmarks(store.as_ref())
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(stored, vec!["a", "b"]);
    assert_eq!(remaining.len(), 2);
    assert_eq!(card_ids(&panel), vec!["b", "a"]);
    assert_eq!(panel.render_count(), renders + 1);
}

#[test]
fn test_delete_unknown_id_is_not_found() {
    let (_store, mut panel) = setup();
    assert!(matches!(panel.delete("zzz"), Err(PanelError::NotFound(_))));
}

#[test]
fn test_delete_last_record_renders_placeholder() {
    let store = Arc::new(MemorySyncStore::new());
    write_bookmarks(store.as_ref(), &[bookmark("only", 1)]).unwrap();
    let mut panel = PanelRenderer::new(store, PanelSettings::default());
    panel.load().unwrap();

    panel.delete("only").unwrap();

    assert!(matches!(panel.view(), PanelView::Empty { .. }));
}

#[test]
fn test_open_appends_time_and_ignores_editor_and_delete_clicks() {
    let (_store, panel) = setup();
    assert_eq!(
        panel.open("a", ClickOrigin::Card).as_deref(),
        Some("https://www.youtube.com/watch?v=a&t=3661s")
    );
    assert_eq!(panel.open("a", ClickOrigin::NoteEditor), None);
    assert_eq!(panel.open("a", ClickOrigin::DeleteControl), None);
    assert_eq!(panel.open("missing", ClickOrigin::Card), None);
}

#[test]
fn test_capture_while_panel_open_rerenders() {
    let (store, mut panel) = setup();
    let agent = CaptureAgent::new(
        store.clone(),
        Box::new(PresetNote(Some("fresh".to_string()))),
        Box::new(LogNotifier),
        CaptureSettings::default(),
    );

    let captured = agent
        .capture(&PageSnapshot::watching("https://youtu.be/zzz", 5.0, "Fresh"))
        .unwrap();

    assert_eq!(panel.pump().unwrap(), 1);
    assert_eq!(card_ids(&panel)[0], captured.id);
}

#[test]
fn test_other_panel_delete_rerenders_this_panel() {
    let (store, mut panel) = setup();
    let mut other = PanelRenderer::new(store.clone(), PanelSettings::default());
    other.load().unwrap();

    other.delete("a").unwrap();

    assert_eq!(panel.pump().unwrap(), 1);
    assert_eq!(card_ids(&panel), vec!["b", "c"]);
}

#[test]
fn test_changes_to_other_keys_are_ignored() {
    let (store, mut panel) = setup();
    store.set("settings", serde_json::json!({"x": 1})).unwrap();
    assert_eq!(panel.pump().unwrap(), 0);
}

#[tokio::test]
async fn test_next_change_awaits_capture() {
    let (store, mut panel) = setup();
    let writer = store.clone();
    let handle = tokio::spawn(async move {
        let agent = CaptureAgent::new(
            writer,
            Box::new(PresetNote(None)),
            Box::new(LogNotifier),
            CaptureSettings::default(),
        );
        agent
            .capture(&PageSnapshot::watching("https://youtu.be/async", 1.0, "Async"))
            .unwrap()
    });

    let rerendered = panel.next_change().await.expect("store still open").unwrap();
    let captured = handle.await.unwrap();

    assert!(rerendered);
    assert_eq!(card_ids(&panel)[0], captured.id);
}
