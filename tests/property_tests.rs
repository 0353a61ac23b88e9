//! Property-based tests for edit overlays and the derived task views.

use proptest::prelude::*;
use userboard::overlay::Overlay;
use userboard::view::{filter_tasks, paginate, total_pages};
use userboard::{Filters, StatusFilter, Task, TaskPatch};

fn arb_patch() -> impl Strategy<Value = TaskPatch> {
    (
        proptest::option::of(1u64..5),
        proptest::option::of("[a-z ]{0,8}"),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(user_id, title, completed)| TaskPatch {
            user_id,
            title,
            completed,
        })
}

fn arb_task() -> impl Strategy<Value = Task> {
    (1u64..1000, 1u64..5, "[A-Za-z ]{0,12}", any::<bool>()).prop_map(
        |(id, user_id, title, completed)| Task {
            id,
            user_id,
            title,
            completed,
        },
    )
}

fn arb_status() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        Just(StatusFilter::Completed),
        Just(StatusFilter::NotCompleted),
    ]
}

fn arb_filters() -> impl Strategy<Value = Filters> {
    (
        arb_status(),
        "[a-z ]{0,3}",
        proptest::option::of(1u64..5),
    )
        .prop_map(|(status, title, user_id)| Filters {
            status,
            title,
            user_id,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Edits without submit/revert accumulate to the field-wise last write.
    #[test]
    fn overlay_is_last_write_per_field(
        base in arb_task(),
        edits in proptest::collection::vec(arb_patch(), 1..8),
    ) {
        let mut overlay: Overlay<Task> = Overlay::new();
        for edit in &edits {
            overlay.edit(base.id, edit.clone());
        }

        let last = |pick: fn(&TaskPatch) -> bool| edits.iter().rev().find(|e| pick(e)).cloned();
        let expected = TaskPatch {
            user_id: last(|e| e.user_id.is_some()).and_then(|e| e.user_id),
            title: last(|e| e.title.is_some()).and_then(|e| e.title),
            completed: last(|e| e.completed.is_some()).and_then(|e| e.completed),
        };
        prop_assert_eq!(overlay.get(base.id), Some(&expected));

        let shown = overlay.merged(&base);
        prop_assert_eq!(shown.id, base.id);
        prop_assert_eq!(shown.title, expected.title.unwrap_or(base.title.clone()));
        prop_assert_eq!(shown.completed, expected.completed.unwrap_or(base.completed));
    }

    /// Reverting restores the canonical display value.
    #[test]
    fn revert_restores_canonical(base in arb_task(), edit in arb_patch()) {
        let mut overlay: Overlay<Task> = Overlay::new();
        overlay.edit(base.id, edit);
        overlay.revert(base.id);
        prop_assert!(!overlay.is_dirty(base.id));
        prop_assert_eq!(overlay.merged(&base), base);
    }

    /// Filtering keeps exactly the matching tasks, in order.
    #[test]
    fn filter_is_an_ordered_subset(
        tasks in proptest::collection::vec(arb_task(), 0..40),
        filters in arb_filters(),
    ) {
        let filtered = filter_tasks(&tasks, &filters);
        let needle = filters.title.trim().to_lowercase();
        let expected: Vec<Task> = tasks
            .iter()
            .filter(|t| filters.status.matches(t.completed))
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .filter(|t| filters.user_id.is_none_or(|u| u == t.user_id))
            .cloned()
            .collect();
        prop_assert_eq!(filtered, expected);
    }

    /// Concatenating every page reproduces the list.
    #[test]
    fn pages_partition_the_list(
        items in proptest::collection::vec(any::<u16>(), 0..60),
        page_size in 1usize..15,
    ) {
        let pages = total_pages(items.len(), page_size);
        let mut rebuilt = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&items, page, page_size);
            prop_assert!(!slice.is_empty());
            prop_assert!(slice.len() <= page_size);
            rebuilt.extend_from_slice(slice);
        }
        prop_assert_eq!(rebuilt, items.clone());
        prop_assert!(paginate(&items, pages + 1, page_size).is_empty());
    }
}
