use crate::domain::{Task, TaskId};

/// Authoritative collection of task records.
///
/// Holds state only. Every mutation bumps `revision` so observers can tell
/// that something changed without diffing.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, revision: 0 }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn insert(&mut self, task: Task) {
        self.tasks.push(task);
        self.revision += 1;
    }

    /// Apply `f` to the task; the revision moves only when `f` reports a change
    pub fn update<F>(&mut self, id: TaskId, f: F) -> bool
    where
        F: FnOnce(&mut Task) -> bool,
    {
        let changed = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => f(task),
            None => false,
        };
        if changed {
            self.revision += 1;
        }
        changed
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        self.revision += 1;
        Some(self.tasks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::Utc;

    fn task(title: &str) -> Task {
        Task::from_draft(TaskDraft::new(title, 10).validate().unwrap(), Utc::now())
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = TaskStore::default();
        let t = task("one");
        let id = t.id;
        store.insert(t);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().title, "one");
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_bumps_revision_only_on_change() {
        let mut store = TaskStore::default();
        let t = task("one");
        let id = t.id;
        store.insert(t);

        assert!(!store.update(id, |_| false));
        assert_eq!(store.revision(), 1);

        assert!(store.update(id, |t| {
            t.title = "renamed".to_string();
            true
        }));
        assert_eq!(store.revision(), 2);

        assert!(!store.update(TaskId::new(), |_| true));
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_remove() {
        let mut store = TaskStore::default();
        let t = task("one");
        let id = t.id;
        store.insert(t);
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }
}
