// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User preference cache with a serialized persistence queue. `get` and
//! `set` are synchronous against an in-memory cache (read-your-writes); a
//! single worker task applies durable writes strictly in `set` order, so two
//! racing first writes can never create two singleton records.

use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, oneshot};

use crate::models::{SettingsPatch, UserSettings};
use crate::store::Table;

enum Job {
    Persist(UserSettings),
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct SettingsStore {
    cache: Arc<StdMutex<UserSettings>>,
    tx: mpsc::UnboundedSender<Job>,
}

impl SettingsStore {
    /// Seeds the cache from the store (defaults if no record exists) and
    /// starts the write worker.
    pub async fn new(table: Table<UserSettings>) -> Self {
        let existing = table.list().await;
        let seeded = existing
            .first()
            .map(|r| r.data.clone())
            .unwrap_or_default();
        let mut record_id = existing.first().map(|r| r.id);

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::Persist(snapshot) => {
                        if let Err(e) = persist(&table, &mut record_id, snapshot).await {
                            log::warn!("settings write failed, cache stays authoritative: {:#}", e);
                        }
                    }
                    Job::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        SettingsStore {
            cache: Arc::new(StdMutex::new(seeded)),
            tx,
        }
    }

    /// Latest known settings, straight from the cache.
    pub fn get(&self) -> UserSettings {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Merges the patch into the cache and enqueues the merged snapshot for
    /// durable persistence.
    pub fn set(&self, patch: SettingsPatch) {
        let snapshot = {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.apply(patch);
            cache.clone()
        };
        let _ = self.tx.send(Job::Persist(snapshot));
    }

    /// Waits until every previously enqueued write has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Job::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn persist(
    table: &Table<UserSettings>,
    record_id: &mut Option<i64>,
    snapshot: UserSettings,
) -> Result<(), crate::store::StoreError> {
    let id = match *record_id {
        Some(id) => id,
        None => {
            // First write: adopt an existing singleton or create one. The
            // single worker means only one creation can ever win.
            match table.list().await.first() {
                Some(existing) => {
                    *record_id = Some(existing.id);
                    existing.id
                }
                None => {
                    let created = table.create(snapshot).await;
                    *record_id = Some(created.id);
                    return Ok(());
                }
            }
        }
    };
    table.update(id, snapshot).await?;
    Ok(())
}
