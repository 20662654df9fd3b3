//! Property-based tests for bookmark collection operations.
//!
//! These tests verify that a capture is read back unchanged without touching
//! other records, that editing a note touches only its record, and that a
//! delete removes exactly one record while preserving the others' order.

use std::sync::Arc;

use proptest::prelude::*;
use timemark::managers::capture_agent::{CaptureAgent, LogNotifier, PresetNote};
use timemark::managers::panel_renderer::PanelRenderer;
use timemark::services::sync_store::{read_bookmarks, write_bookmarks, MemorySyncStore};
use timemark::types::bookmark::Bookmark;
use timemark::types::page::PageSnapshot;
use timemark::types::settings::{CaptureSettings, PanelSettings};

/// Collections of 1..8 records with distinct ids and arbitrary notes.
fn arb_collection() -> impl Strategy<Value = Vec<Bookmark>> {
    proptest::collection::vec(("[a-z ]{0,20}", 0i64..1_000_000, 0u64..20_000), 1..8).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (note, added_at, time))| Bookmark {
                    id: format!("id-{}", i),
                    url: format!("https://www.youtube.com/watch?v=vid{}", i),
                    video_id: format!("vid{}", i),
                    title: format!("Video {}", i),
                    thumbnail: String::new(),
                    time,
                    note,
                    added_at,
                })
                .collect()
        },
    )
}

fn seeded(items: &[Bookmark]) -> (Arc<MemorySyncStore>, PanelRenderer) {
    let store = Arc::new(MemorySyncStore::new());
    write_bookmarks(store.as_ref(), items).expect("seed write failed");
    let mut panel = PanelRenderer::new(store.clone(), PanelSettings::default());
    panel.load().expect("load failed");
    (store, panel)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn capture_then_load_yields_equal_record(
        items in arb_collection(),
        position in 0.0f64..50_000.0,
        note in proptest::option::of("[a-zA-Z0-9 ]{0,30}"),
    ) {
        let (store, mut panel) = seeded(&items);
        let agent = CaptureAgent::new(
            store.clone(),
            Box::new(PresetNote(note)),
            Box::new(LogNotifier),
            CaptureSettings::default(),
        );

        let captured = agent
            .capture(&PageSnapshot::watching("https://youtu.be/newvideo01", position, "New"))
            .expect("capture failed");
        let loaded = panel.load().expect("load failed");

        let found = loaded.iter().find(|b| b.id == captured.id);
        prop_assert_eq!(found, Some(&captured));
        for original in &items {
            prop_assert!(loaded.contains(original), "record {} was mutated", original.id);
        }
        prop_assert_eq!(loaded.len(), items.len() + 1);
    }

    #[test]
    fn editing_a_note_changes_only_that_record(
        items in arb_collection(),
        pick in any::<prop::sample::Index>(),
        note in "[a-zA-Z0-9]{0,30}",
    ) {
        let (store, mut panel) = seeded(&items);
        let target = items[pick.index(items.len())].id.clone();

        panel.edit(&target, &note).expect("edit failed");

        let after = read_bookmarks(store.as_ref()).expect("read failed");
        prop_assert_eq!(after.len(), items.len());
        for (old, new) in items.iter().zip(after.iter()) {
            if old.id == target {
                prop_assert_eq!(&new.note, &note);
                let mut expected = old.clone();
                expected.note = note.clone();
                prop_assert_eq!(new, &expected);
            } else {
                prop_assert_eq!(new, old);
            }
        }
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order(
        items in arb_collection(),
        pick in any::<prop::sample::Index>(),
    ) {
        let (store, mut panel) = seeded(&items);
        let target = items[pick.index(items.len())].id.clone();

        panel.delete(&target).expect("delete failed");

        let after = read_bookmarks(store.as_ref()).expect("read failed");
        let expected: Vec<Bookmark> = items.iter().filter(|b| b.id != target).cloned().collect();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn load_is_sorted_newest_first(items in arb_collection()) {
        let (_store, mut panel) = seeded(&items);
        let loaded = panel.load().expect("load failed");
        prop_assert!(loaded.windows(2).all(|w| w[0].added_at >= w[1].added_at));
    }
}
