// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generic record store: typed tables with generated identifiers and
//! creation/update timestamps. No transactions and no foreign-key
//! enforcement; referential checks live with the callers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Account, Category, Entry, UserSettings};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerline", "ledgerline"));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{what} #{id} not found")]
    NotFound { what: &'static str, id: i64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Store envelope around a typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: i64,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub data: T,
}

impl<T> Record<T> {
    /// Last-touched timestamp: update time, falling back to creation time.
    pub fn touched(&self) -> DateTime<Utc> {
        self.updated.unwrap_or(self.created)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Shelf<T> {
    rows: Vec<Record<T>>,
    next_id: i64,
}

impl<T> Default for Shelf<T> {
    fn default() -> Self {
        Shelf {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

/// One entity table. Every method awaits the table lock, so each call is a
/// suspension point; callers never observe a half-applied write.
#[derive(Debug, Clone)]
pub struct Table<T> {
    what: &'static str,
    inner: Arc<RwLock<Shelf<T>>>,
}

impl<T: Clone> Table<T> {
    pub fn new(what: &'static str) -> Self {
        Table {
            what,
            inner: Arc::new(RwLock::new(Shelf::default())),
        }
    }

    pub async fn list(&self) -> Vec<Record<T>> {
        self.inner.read().await.rows.clone()
    }

    pub async fn get(&self, id: i64) -> Option<Record<T>> {
        self.inner
            .read()
            .await
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn create(&self, data: T) -> Record<T> {
        let mut shelf = self.inner.write().await;
        let rec = Record {
            id: shelf.next_id,
            created: Utc::now(),
            updated: None,
            data,
        };
        shelf.next_id += 1;
        shelf.rows.push(rec.clone());
        rec
    }

    pub async fn create_many(&self, items: Vec<T>) -> Vec<Record<T>> {
        let mut shelf = self.inner.write().await;
        let mut out = Vec::with_capacity(items.len());
        for data in items {
            let rec = Record {
                id: shelf.next_id,
                created: Utc::now(),
                updated: None,
                data,
            };
            shelf.next_id += 1;
            shelf.rows.push(rec.clone());
            out.push(rec);
        }
        out
    }

    /// Replaces the payload of an existing record and stamps its update time.
    pub async fn update(&self, id: i64, data: T) -> Result<Record<T>, StoreError> {
        let mut shelf = self.inner.write().await;
        let what = self.what;
        let row = shelf
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { what, id })?;
        row.data = data;
        row.updated = Some(Utc::now());
        Ok(row.clone())
    }

    pub async fn update_many(&self, patches: Vec<(i64, T)>) -> Result<Vec<Record<T>>, StoreError> {
        let mut out = Vec::with_capacity(patches.len());
        for (id, data) in patches {
            out.push(self.update(id, data).await?);
        }
        Ok(out)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut shelf = self.inner.write().await;
        let before = shelf.rows.len();
        shelf.rows.retain(|r| r.id != id);
        if shelf.rows.len() == before {
            return Err(StoreError::NotFound { what: self.what, id });
        }
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[i64]) -> Result<(), StoreError> {
        for &id in ids {
            self.delete(id).await?;
        }
        Ok(())
    }
}

impl<T: Clone + Serialize + DeserializeOwned> Table<T> {
    async fn dump(&self) -> Shelf<T> {
        self.inner.read().await.clone()
    }

    async fn restore(&self, shelf: Shelf<T>) {
        *self.inner.write().await = shelf;
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    accounts: Shelf<Account>,
    categories: Shelf<Category>,
    entries: Shelf<Entry>,
    settings: Shelf<UserSettings>,
}

/// The full record store: one table per entity type plus an optional JSON
/// snapshot file for durability.
#[derive(Debug, Clone)]
pub struct Store {
    pub accounts: Table<Account>,
    pub categories: Table<Category>,
    pub entries: Table<Entry>,
    pub settings: Table<UserSettings>,
    path: Option<PathBuf>,
}

pub fn data_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    std::fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ledgerline.json"))
}

impl Store {
    /// Ephemeral store with no backing file; used by tests.
    pub fn in_memory() -> Self {
        Store {
            accounts: Table::new("account"),
            categories: Table::new("category"),
            entries: Table::new("entry"),
            settings: Table::new("settings"),
            path: None,
        }
    }

    /// Opens (or initializes) the store backed by the given snapshot file.
    pub async fn open(path: &Path) -> Result<Self> {
        let store = Store {
            path: Some(path.to_path_buf()),
            ..Store::in_memory()
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let snap: Snapshot = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt store file {}", path.display()))?;
                store.accounts.restore(snap.accounts).await;
                store.categories.restore(snap.categories).await;
                store.entries.restore(snap.entries).await;
                store.settings.restore(snap.settings).await;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Open store at {}", path.display()));
            }
        }
        Ok(store)
    }

    /// Writes the snapshot to a temp file and renames it into place.
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snap = Snapshot {
            accounts: self.accounts.dump().await,
            categories: self.categories.dump().await,
            entries: self.entries.dump().await,
            settings: self.settings.dump().await,
        };
        let bytes = serde_json::to_vec_pretty(&snap)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Write store at {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Replace store at {}", path.display()))?;
        Ok(())
    }
}
