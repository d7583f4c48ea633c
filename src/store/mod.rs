//! Record storage
//!
//! Every entity type lives in its own JSONL collection under the records
//! directory. Operations on one collection are serialized by an async
//! mutex; read-modify-write sequences run entirely under that lock.
//! Rewrites carry malformed lines through untouched.

mod jsonl;

use jsonl::{append_jsonl, load_jsonl, read_jsonl, write_jsonl};

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{
    AccountEntry, Campaign, InventoryItem, Lead, Notification, Project, Task, User,
};
use crate::utils::paths;

/// A persisted entity with a string id
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File stem of the collection (`leads` -> `leads.jsonl`)
    const COLLECTION: &'static str;
    /// Human readable name used in error messages
    const KIND: &'static str;

    fn id(&self) -> &str;
}

pub struct Collection<T: Record> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<T>,
}

impl<T: Record> Collection<T> {
    pub fn open(records_dir: &Path) -> Self {
        Self {
            path: paths::collection_path(records_dir, T::COLLECTION),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        read_jsonl(&self.path)
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<T>> {
        let _guard = self.lock.lock().await;
        let items: Vec<T> = read_jsonl(&self.path)?;
        Ok(items.into_iter().find(|item| item.id() == id))
    }

    /// Like `get`, but a missing record is a `NotFound` error
    pub async fn require(&self, id: &str) -> AppResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::not_found(T::KIND, id))
    }

    pub async fn insert(&self, item: T) -> AppResult<T> {
        let _guard = self.lock.lock().await;
        append_jsonl(&self.path, &item)?;
        Ok(item)
    }

    /// Build and insert a record while holding the collection lock.
    /// `build` sees the current records, so uniqueness checks and
    /// sequence numbers computed from them cannot race.
    pub async fn insert_with<F>(&self, build: F) -> AppResult<T>
    where
        F: FnOnce(&[T]) -> AppResult<T>,
    {
        let _guard = self.lock.lock().await;
        let items: Vec<T> = read_jsonl(&self.path)?;
        let item = build(&items)?;
        append_jsonl(&self.path, &item)?;
        Ok(item)
    }

    /// Apply `apply` to the record with `id` and persist the result.
    /// Nothing is written when `apply` returns an error.
    pub async fn update<F>(&self, id: &str, apply: F) -> AppResult<T>
    where
        F: FnOnce(&mut T, &[T]) -> AppResult<()>,
    {
        let _guard = self.lock.lock().await;
        let mut loaded = load_jsonl::<T>(&self.path)?;
        let index = loaded
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;

        let mut updated = loaded.items[index].clone();
        apply(&mut updated, &loaded.items)?;
        loaded.items[index] = updated.clone();
        write_jsonl(&self.path, &loaded.items, &loaded.unparsed)?;
        Ok(updated)
    }

    /// Apply `apply` to every record; records for which it returns `true`
    /// count as changed. The file is only rewritten when something changed.
    pub async fn update_all<F>(&self, mut apply: F) -> AppResult<usize>
    where
        F: FnMut(&mut T) -> bool,
    {
        let _guard = self.lock.lock().await;
        let mut loaded = load_jsonl::<T>(&self.path)?;
        let changed = loaded
            .items
            .iter_mut()
            .map(|item| apply(item))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            write_jsonl(&self.path, &loaded.items, &loaded.unparsed)?;
        }
        Ok(changed)
    }

    pub async fn remove(&self, id: &str) -> AppResult<T> {
        let _guard = self.lock.lock().await;
        let mut loaded = load_jsonl::<T>(&self.path)?;
        let index = loaded
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;
        let removed = loaded.items.remove(index);
        write_jsonl(&self.path, &loaded.items, &loaded.unparsed)?;
        Ok(removed)
    }

    /// Remove `id` after `check` approves it against the current records
    pub async fn remove_if<F>(&self, id: &str, check: F) -> AppResult<T>
    where
        F: FnOnce(&T, &[T]) -> AppResult<()>,
    {
        let _guard = self.lock.lock().await;
        let mut loaded = load_jsonl::<T>(&self.path)?;
        let index = loaded
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(T::KIND, id))?;
        check(&loaded.items[index], &loaded.items)?;
        let removed = loaded.items.remove(index);
        write_jsonl(&self.path, &loaded.items, &loaded.unparsed)?;
        Ok(removed)
    }

    /// Drop every record matching `pred`, returning how many were removed
    pub async fn remove_where<F>(&self, pred: F) -> AppResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        let _guard = self.lock.lock().await;
        let loaded = load_jsonl::<T>(&self.path)?;
        let before = loaded.items.len();
        let kept: Vec<T> = loaded.items.into_iter().filter(|item| !pred(item)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            write_jsonl(&self.path, &kept, &loaded.unparsed)?;
        }
        Ok(removed)
    }
}

/// All collections of one data root
pub struct Store {
    pub users: Collection<User>,
    pub projects: Collection<Project>,
    pub leads: Collection<Lead>,
    pub tasks: Collection<Task>,
    pub inventory: Collection<InventoryItem>,
    pub accounts: Collection<AccountEntry>,
    pub campaigns: Collection<Campaign>,
    pub notifications: Collection<Notification>,
}

impl Store {
    pub fn open(records_dir: &Path) -> AppResult<Self> {
        std::fs::create_dir_all(records_dir)?;
        tracing::debug!(dir = %records_dir.display(), "Opening record store");
        Ok(Self {
            users: Collection::open(records_dir),
            projects: Collection::open(records_dir),
            leads: Collection::open(records_dir),
            tasks: Collection::open(records_dir),
            inventory: Collection::open(records_dir),
            accounts: Collection::open(records_dir),
            campaigns: Collection::open(records_dir),
            notifications: Collection::open(records_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Item {
        id: String,
        value: i32,
    }

    impl Record for Item {
        const COLLECTION: &'static str = "items";
        const KIND: &'static str = "Item";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: i32) -> Item {
        Item { id: id.into(), value }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());

        items.insert(item("a", 1)).await.unwrap();
        items.insert(item("b", 2)).await.unwrap();
        assert_eq!(items.list().await.unwrap().len(), 2);

        let updated = items
            .update("a", |it, _| {
                it.value = 10;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(updated.value, 10);
        assert_eq!(items.require("a").await.unwrap().value, 10);

        items.remove("b").await.unwrap();
        assert!(items.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());
        items.insert(item("a", 1)).await.unwrap();

        let result = items
            .update("a", |it, _| {
                it.value = 99;
                Err(AppError::invalid_params("nope"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(items.require("a").await.unwrap().value, 1);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());
        let err = items.remove("ghost").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
        assert!(items.require("ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_with_sees_existing() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());
        for _ in 0..3 {
            items
                .insert_with(|existing| {
                    let next = existing.iter().map(|i| i.value).max().unwrap_or(0) + 1;
                    Ok(item(&format!("n{}", next), next))
                })
                .await
                .unwrap();
        }
        let values: Vec<i32> = items.list().await.unwrap().iter().map(|i| i.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_all_and_remove_where() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());
        for (id, v) in [("a", 1), ("b", 2), ("c", 3)] {
            items.insert(item(id, v)).await.unwrap();
        }
        let changed = items
            .update_all(|it| {
                if it.value > 1 {
                    it.value *= 10;
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(items.remove_where(|it| it.value >= 20).await.unwrap(), 2);
        assert_eq!(items.list().await.unwrap(), vec![item("a", 1)]);
    }

    #[tokio::test]
    async fn test_writes_preserve_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let items: Collection<Item> = Collection::open(dir.path());
        items.insert(item("a", 1)).await.unwrap();
        items.insert(item("b", 2)).await.unwrap();

        let path = paths::collection_path(dir.path(), Item::COLLECTION);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("{\"legacy\": true}\n");
        std::fs::write(&path, text).unwrap();

        items
            .update("a", |it, _| {
                it.value = 5;
                Ok(())
            })
            .await
            .unwrap();
        items
            .update_all(|it| {
                it.value += 1;
                true
            })
            .await
            .unwrap();
        items.remove("b").await.unwrap();
        items.remove_where(|it| it.id == "nobody").await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "{\"legacy\": true}");
        assert_eq!(items.list().await.unwrap(), vec![item("a", 6)]);
    }
}
