//! Integration tests for TasksStore: fetch, filters, pagination, and local
//! edits.

mod support;

use std::sync::Arc;

use support::{FakeApi, LIST_TASKS};
use userboard::{Board, BoardConfig, Error, FilterUpdate, StatusFilter, TaskPatch};

async fn loaded(api: FakeApi) -> (Arc<FakeApi>, Board) {
    let api = Arc::new(api);
    let board = support::board(&api);
    board.tasks().fetch_tasks().settled().await;
    (api, board)
}

fn ids(tasks: &[userboard::Task]) -> Vec<u64> {
    tasks.iter().map(|task| task.id).collect()
}

// ─── Fetch Tests ────────────────────────────────────────────────────────────

mod fetch_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_fetch_loads_and_paginates() {
        let (api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();

        assert_eq!(api.calls(LIST_TASKS), 1);
        assert_eq!(tasks.snapshot().tasks.len(), 25);
        assert_eq!(tasks.total_pages(), 3);
        assert_eq!(tasks.current_page(), 1);
        assert_eq!(ids(&tasks.paginated_tasks()), (1..=10).collect::<Vec<_>>());

        assert!(tasks.fetch_tasks().is_satisfied());
        assert_eq!(api.calls(LIST_TASKS), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_only_touches_status() {
        let api = Arc::new(FakeApi::new());
        let board = support::board(&api);
        let tasks = board.tasks();
        tasks.set_page(3);
        api.fail(LIST_TASKS, Error::network("timed out"));

        tasks.fetch_tasks().settled().await;
        let state = tasks.snapshot();
        assert_eq!(state.current_page, 3);
        assert!(state.tasks.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Network Error: timed out"));
        assert!(board.registry().is_empty());

        api.recover(LIST_TASKS);
        tasks.fetch_tasks().settled().await;
        let state = tasks.snapshot();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.tasks.len(), 25);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_page_size_comes_from_config() {
        let api = Arc::new(FakeApi::new());
        let board = Board::with_config(
            Arc::clone(&api) as Arc<dyn userboard::Api>,
            BoardConfig::new().with_page_size(4),
        );
        board.tasks().fetch_tasks().settled().await;
        assert_eq!(board.tasks().total_pages(), 7);
        assert_eq!(board.tasks().paginated_tasks().len(), 4);
    }
}

// ─── Filter Tests ───────────────────────────────────────────────────────────

mod filter_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_two_task_example() {
        let two = vec![
            userboard::Task {
                id: 1,
                user_id: 1,
                title: "Buy milk".to_string(),
                completed: false,
            },
            userboard::Task {
                id: 2,
                user_id: 1,
                title: "Buy eggs".to_string(),
                completed: true,
            },
        ];
        let (_api, board) = loaded(FakeApi::new().with_tasks(two)).await;
        let tasks = board.tasks();

        tasks.set_filters(FilterUpdate::new().status(StatusFilter::Completed));
        assert_eq!(ids(&tasks.snapshot().filtered_tasks), vec![2]);

        tasks.set_filters(FilterUpdate::new().status(StatusFilter::All).title("buy"));
        assert_eq!(ids(&tasks.snapshot().filtered_tasks), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let (_api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();

        tasks.set_page(3);
        assert_eq!(tasks.current_page(), 3);
        tasks.set_filters(FilterUpdate::new().user(2));
        assert_eq!(tasks.current_page(), 1);
        assert!(tasks.snapshot().filtered_tasks.iter().all(|t| t.user_id == 2));

        tasks.set_page(2);
        tasks.reset_filters();
        assert_eq!(tasks.current_page(), 1);
        assert_eq!(tasks.filters(), userboard::Filters::default());
        assert_eq!(tasks.snapshot().filtered_tasks.len(), 25);
    }

    #[tokio::test]
    async fn test_set_page_floors_at_one() {
        let (_api, board) = loaded(FakeApi::new()).await;
        board.tasks().set_page(0);
        assert_eq!(board.tasks().current_page(), 1);
    }

    #[tokio::test]
    async fn test_toggle_recomputes_and_clamps_page() {
        let (_api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();

        // 8 of 25 fixture tasks are completed.
        tasks.set_filters(FilterUpdate::new().status(StatusFilter::NotCompleted));
        assert_eq!(tasks.snapshot().filtered_tasks.len(), 17);
        tasks.set_page(2);

        assert!(tasks.toggle_task_status(1));
        assert_eq!(tasks.snapshot().filtered_tasks.len(), 16);
        assert_eq!(tasks.current_page(), 2);
        assert!(tasks.task(1).unwrap().completed);

        for id in [2, 4, 5, 7, 8, 10, 11] {
            assert!(tasks.toggle_task_status(id));
        }
        assert_eq!(tasks.snapshot().filtered_tasks.len(), 9);
        assert_eq!(tasks.current_page(), 1);

        assert!(!tasks.toggle_task_status(999));
    }
}

// ─── Edit Tests ─────────────────────────────────────────────────────────────

mod edit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_page_shows_pending_edits() {
        let (_api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();

        assert!(tasks.edit_task(3, TaskPatch::new().title("renamed")));
        assert!(tasks.is_dirty(3));
        assert_eq!(tasks.paginated_tasks()[2].title, "renamed");
        assert_eq!(tasks.snapshot().tasks[2].title, "task 3");
        assert_eq!(tasks.overlay(3), Some(TaskPatch::new().title("renamed")));
    }

    #[tokio::test]
    async fn test_submit_commits_locally() {
        let (api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();
        tasks.set_filters(FilterUpdate::new().status(StatusFilter::Completed));
        let before = tasks.snapshot().filtered_tasks.len();

        tasks.edit_task(1, TaskPatch::new().completed(true).title("done"));
        let committed = tasks.submit_task(1).unwrap();
        assert_eq!(committed.title, "done");
        assert!(committed.completed);
        assert!(!tasks.is_dirty(1));
        assert_eq!(tasks.snapshot().tasks[0], committed);
        assert_eq!(tasks.snapshot().filtered_tasks.len(), before + 1);
        assert_eq!(api.calls(LIST_TASKS), 1);
    }

    #[tokio::test]
    async fn test_revert_and_unknown_ids() {
        let (_api, board) = loaded(FakeApi::new()).await;
        let tasks = board.tasks();

        assert!(!tasks.edit_task(999, TaskPatch::new().completed(true)));
        assert_eq!(tasks.submit_task(999), None);

        tasks.edit_task(5, TaskPatch::new().completed(true));
        assert!(tasks.revert_task(5));
        assert_eq!(tasks.submit_task(5), None);
        assert!(!tasks.task(5).unwrap().completed);
    }
}
