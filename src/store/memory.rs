//! In-process task store with optional JSON file persistence.

use dashmap::DashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::store::types::{StoreError, StoreResult, Task, TaskId, TaskStore};

/// A thread-safe task store.
///
/// Records live in a `DashMap` keyed by id. Ids come from a monotonic
/// sequence, so ascending id order is insertion order. When a persistence
/// path is set, every mutation rewrites the file before returning.
pub struct MemoryTaskStore {
    tasks: DashMap<TaskId, Task>,
    next_id: AtomicU64,
    persistence_path: Option<PathBuf>,
    /// Serializes mutate-and-save so snapshots reach disk in commit order.
    commit_lock: Mutex<()>,
}

impl MemoryTaskStore {
    /// Create an empty, memory-only store.
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            next_id: AtomicU64::new(1),
            persistence_path: None,
            commit_lock: Mutex::new(()),
        }
    }

    /// Open a file-backed store, loading existing records if the file exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let tasks: Vec<Task> = serde_json::from_reader(reader)?;
            let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
            for task in tasks {
                store.tasks.insert(task.id, task);
            }
            store.next_id.store(max_id + 1, Ordering::SeqCst);
            tracing::info!(path = %path.display(), tasks = store.tasks.len(), "Loaded task store");
        }

        store.persistence_path = Some(path);
        Ok(store)
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|r| r.value().clone()).collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    /// Write `tasks` to the persistence file, if any.
    ///
    /// Writes to a sibling temp file and renames it into place. Callers hold
    /// the commit lock and apply the change to the map only after this
    /// succeeds, so readers never see an uncommitted task.
    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, tasks)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn lock_commit(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.commit_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("commit lock poisoned".to_string()))
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryTaskStore {
    fn list_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.snapshot())
    }

    fn create(&self, description: &str) -> StoreResult<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StoreError::EmptyDescription);
        }

        let _guard = self.lock_commit()?;
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            description: description.to_string(),
        };
        if self.persistence_path.is_some() {
            let mut next = self.snapshot();
            next.push(task.clone());
            self.save(&next)?;
        }
        self.tasks.insert(task.id, task.clone());

        tracing::debug!(id = task.id, "Task created");
        Ok(task)
    }

    fn delete_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let _guard = self.lock_commit()?;
        if !self.tasks.contains_key(&id) {
            return Ok(None);
        }

        if self.persistence_path.is_some() {
            let mut next = self.snapshot();
            next.retain(|t| t.id != id);
            self.save(&next)?;
        }
        let Some((_, task)) = self.tasks.remove(&id) else {
            return Ok(None);
        };

        tracing::debug!(id, "Task deleted");
        Ok(Some(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_operations() {
        let store = MemoryTaskStore::new();
        assert!(store.list_all().unwrap().is_empty());

        let milk = store.create("buy milk").unwrap();
        let eggs = store.create("  buy eggs ").unwrap();
        assert_eq!(milk.id, 1);
        assert_eq!(eggs.id, 2);
        assert_eq!(eggs.description, "buy eggs");

        let all = store.list_all().unwrap();
        assert_eq!(all, vec![milk.clone(), eggs.clone()]);

        assert_eq!(store.delete_by_id(milk.id).unwrap(), Some(milk));
        assert_eq!(store.list_all().unwrap(), vec![eggs]);
    }

    #[test]
    fn test_delete_missing_is_none() {
        let store = MemoryTaskStore::new();
        let task = store.create("once").unwrap();

        assert!(store.delete_by_id(task.id).unwrap().is_some());
        assert!(store.delete_by_id(task.id).unwrap().is_none());
        assert!(store.delete_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_ids_not_reused() {
        let store = MemoryTaskStore::new();
        let first = store.create("a").unwrap();
        store.delete_by_id(first.id).unwrap();
        let second = store.create("b").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_empty_description_rejected() {
        let store = MemoryTaskStore::new();
        assert!(matches!(store.create("   "), Err(StoreError::EmptyDescription)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let store = MemoryTaskStore::open(&path).unwrap();
        store.create("first").unwrap();
        let second = store.create("second").unwrap();
        store.create("third").unwrap();
        store.delete_by_id(second.id).unwrap();

        // Load new instance
        let loaded = MemoryTaskStore::open(&path).unwrap();
        let descriptions: Vec<_> = loaded
            .list_all()
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(descriptions, vec!["first", "third"]);

        let next = loaded.create("fourth").unwrap();
        assert_eq!(next.id, 4);
    }

    #[test]
    fn test_failed_save_never_exposes_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("tasks.json");

        let store = MemoryTaskStore::open(&path).unwrap();
        assert!(matches!(store.create("lost"), Err(StoreError::Io(_))));
        assert!(store.is_empty());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_failed_delete_save_keeps_task() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir(&data_dir).unwrap();

        let store = MemoryTaskStore::open(data_dir.join("tasks.json")).unwrap();
        let task = store.create("keep me").unwrap();

        fs::remove_dir_all(&data_dir).unwrap();
        assert!(matches!(store.delete_by_id(task.id), Err(StoreError::Io(_))));
        assert_eq!(store.list_all().unwrap(), vec![task]);
    }
}
