//! In-memory task store.
//!
//! The store owns the task collection and the identifier counter. Both live
//! behind a single `parking_lot::Mutex`, and every public operation takes
//! the lock for its full duration, so concurrent calls are serialized and a
//! listing never observes a half-applied mutation.
//!
//! The lock is only ever held for in-memory work. Callers read request
//! bodies and perform file I/O before or after calling into the store.

use parking_lot::Mutex;
use thiserror::Error;

use crate::domain::{Task, TaskId, is_blank_title};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The supplied title was empty or whitespace-only.
    #[error("Task title cannot be empty")]
    EmptyTitle,

    /// No task with the given identifier exists.
    #[error("No task found with ID {0}")]
    NotFound(TaskId),

    /// The identifier counter has reached the largest representable value.
    #[error("No task IDs left to assign")]
    IdsExhausted,
}

// =============================================================================
// Store State
// =============================================================================

#[derive(Debug, Default)]
struct StoreState {
    /// Tasks in insertion order.
    tasks: Vec<Task>,
    /// Highest identifier ever assigned or loaded.
    last_id: TaskId,
}

impl StoreState {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_id = highest_id(&tasks);
        Self { tasks, last_id }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

/// Returns the highest identifier in `tasks`, or zero when empty.
fn highest_id(tasks: &[Task]) -> TaskId {
    tasks
        .iter()
        .map(|task| task.id)
        .max()
        .unwrap_or_default()
}

// =============================================================================
// Task Store
// =============================================================================

/// Thread-safe, in-memory task collection.
///
/// Share it between request handlers with `Arc<TaskStore>`.
///
/// # Example
///
/// ```
/// use task_tracker::infrastructure::TaskStore;
///
/// let store = TaskStore::new();
/// let task = store.create("Buy milk", false).unwrap();
///
/// assert_eq!(task.id.value(), 1);
/// assert_eq!(store.list(), vec![task]);
/// ```
#[derive(Debug, Default)]
pub struct TaskStore {
    state: Mutex<StoreState>,
}

#[allow(clippy::significant_drop_tightening)]
impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `tasks`.
    ///
    /// The identifier counter starts at the highest identifier present.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            state: Mutex::new(StoreState::from_tasks(tasks)),
        }
    }

    /// Returns a snapshot of all tasks in insertion order.
    pub fn list(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Creates a task and assigns it the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyTitle`] if `title` is blank, or
    /// [`StoreError::IdsExhausted`] if the counter cannot be advanced. The
    /// identifier counter is not advanced in either case.
    pub fn create(&self, title: impl Into<String>, completed: bool) -> Result<Task, StoreError> {
        let title = title.into();
        if is_blank_title(&title) {
            return Err(StoreError::EmptyTitle);
        }

        let mut state = self.state.lock();
        let id = state.last_id.next().ok_or(StoreError::IdsExhausted)?;
        state.last_id = id;
        let task = Task::new(id, title, completed);
        state.tasks.push(task.clone());

        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Replaces the title and completion flag of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyTitle`] if `title` is blank, or
    /// [`StoreError::NotFound`] if no task has the identifier `id`.
    pub fn update(
        &self,
        id: TaskId,
        title: impl Into<String>,
        completed: bool,
    ) -> Result<Task, StoreError> {
        let title = title.into();
        if is_blank_title(&title) {
            return Err(StoreError::EmptyTitle);
        }

        let mut state = self.state.lock();
        let index = state.position(id).ok_or(StoreError::NotFound(id))?;
        let task = &mut state.tasks[index];
        task.title = title;
        task.completed = completed;

        tracing::debug!(task_id = %id, "Task updated");
        Ok(task.clone())
    }

    /// Removes a task, keeping the relative order of the others.
    ///
    /// The identifier is not handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has the identifier `id`.
    pub fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let index = state.position(id).ok_or(StoreError::NotFound(id))?;
        state.tasks.remove(index);

        tracing::debug!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// Replaces the whole collection and recomputes the identifier counter
    /// as the highest identifier in `tasks` (zero when empty).
    pub fn replace(&self, tasks: Vec<Task>) {
        *self.state.lock() = StoreState::from_tasks(tasks);
    }

    /// Returns the highest identifier assigned or loaded so far.
    pub fn last_id(&self) -> TaskId {
        self.state.lock().last_id
    }

    /// Returns the number of tasks.
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Returns true if the store holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::sync::Arc;
    use std::thread;

    #[fixture]
    fn seeded_store() -> TaskStore {
        TaskStore::with_tasks(vec![
            Task::new(TaskId::new(1), "Clean the carpet", false),
            Task::new(TaskId::new(2), "Pick up the groceries", false),
            Task::new(TaskId::new(123), "Doctor's appointment", true),
        ])
    }

    // -------------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_create_assigns_next_id_after_highest(seeded_store: TaskStore) {
        let task = seeded_store.create("Test Task", false).unwrap();

        assert_eq!(task, Task::new(TaskId::new(124), "Test Task", false));
        assert_eq!(seeded_store.len(), 4);
        assert_eq!(seeded_store.list().last(), Some(&task));
    }

    #[rstest]
    fn test_create_on_empty_store_starts_at_one() {
        let store = TaskStore::new();

        let first = store.create("First", false).unwrap();
        let second = store.create("Second", true).unwrap();

        assert_eq!(first.id, TaskId::new(1));
        assert_eq!(second.id, TaskId::new(2));
        assert!(second.completed);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_create_rejects_blank_title(seeded_store: TaskStore, #[case] title: &str) {
        let before = seeded_store.list();

        let result = seeded_store.create(title, false);

        assert_eq!(result, Err(StoreError::EmptyTitle));
        assert_eq!(seeded_store.list(), before);
        assert_eq!(seeded_store.last_id(), TaskId::new(123));
    }

    #[rstest]
    fn test_create_after_max_id_is_exhausted() {
        let store = TaskStore::with_tasks(vec![Task::new(TaskId::new(u64::MAX), "Last", false)]);

        let result = store.create("One too many", false);

        assert_eq!(result, Err(StoreError::IdsExhausted));
        assert_eq!(store.len(), 1);
        assert_eq!(store.last_id(), TaskId::new(u64::MAX));
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_update_mutates_in_place(seeded_store: TaskStore) {
        let updated = seeded_store
            .update(TaskId::new(1), "Updated Task", true)
            .unwrap();

        assert_eq!(updated, Task::new(TaskId::new(1), "Updated Task", true));
        assert_eq!(seeded_store.list()[0], updated);
    }

    #[rstest]
    fn test_update_missing_task_is_not_found(seeded_store: TaskStore) {
        let before = seeded_store.list();

        let result = seeded_store.update(TaskId::new(999), "Nonexistent Task", false);

        assert_eq!(result, Err(StoreError::NotFound(TaskId::new(999))));
        assert_eq!(seeded_store.list(), before);
    }

    #[rstest]
    fn test_update_validates_title_before_lookup(seeded_store: TaskStore) {
        let result = seeded_store.update(TaskId::new(999), "", false);

        assert_eq!(result, Err(StoreError::EmptyTitle));
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_delete_preserves_order_of_remaining(seeded_store: TaskStore) {
        seeded_store.delete(TaskId::new(2)).unwrap();

        let ids: Vec<u64> = seeded_store.list().iter().map(|t| t.id.value()).collect();
        assert_eq!(ids, vec![1, 123]);
    }

    #[rstest]
    fn test_delete_missing_task_is_not_found(seeded_store: TaskStore) {
        let result = seeded_store.delete(TaskId::new(999));

        assert_eq!(result, Err(StoreError::NotFound(TaskId::new(999))));
        assert_eq!(seeded_store.len(), 3);
    }

    #[rstest]
    fn test_deleted_id_is_never_reused(seeded_store: TaskStore) {
        seeded_store.delete(TaskId::new(123)).unwrap();

        let task = seeded_store.create("After delete", false).unwrap();

        assert_eq!(task.id, TaskId::new(124));
    }

    // -------------------------------------------------------------------------
    // Replace / List
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_replace_recomputes_counter(seeded_store: TaskStore) {
        seeded_store.replace(vec![Task::new(TaskId::new(40), "Loaded", false)]);

        assert_eq!(seeded_store.last_id(), TaskId::new(40));
        assert_eq!(seeded_store.create("Next", false).unwrap().id, TaskId::new(41));
    }

    #[rstest]
    fn test_replace_with_empty_resets_counter(seeded_store: TaskStore) {
        seeded_store.replace(Vec::new());

        assert!(seeded_store.is_empty());
        assert_eq!(seeded_store.last_id(), TaskId::new(0));
    }

    #[rstest]
    fn test_list_is_idempotent(seeded_store: TaskStore) {
        assert_eq!(seeded_store.list(), seeded_store.list());
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_concurrent_creates_assign_unique_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let store = Arc::new(TaskStore::new());

        thread::scope(|scope| {
            for worker in 0..THREADS {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for index in 0..PER_THREAD {
                        store.create(format!("Task {worker}-{index}"), false).unwrap();
                    }
                });
            }
        });

        let ids: Vec<u64> = store.list().iter().map(|t| t.id.value()).collect();
        let expected: Vec<u64> = (1..=(THREADS * PER_THREAD) as u64).collect();
        assert_eq!(ids, expected);
    }

    proptest! {
        #[test]
        fn prop_create_ids_strictly_increase(
            titles in proptest::collection::vec("[a-zA-Z]{1,12}", 1..40),
            start in 0u64..10_000,
        ) {
            let store = TaskStore::with_tasks(vec![Task::new(TaskId::new(start), "seed", false)]);

            let ids: Vec<TaskId> = titles
                .iter()
                .map(|title| store.create(title.as_str(), false).unwrap().id)
                .collect();

            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(ids[0] > TaskId::new(start));
            prop_assert_eq!(store.last_id(), *ids.last().unwrap());
        }
    }
}
