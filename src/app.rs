// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Process-wide context wiring the store and the engines together. Built
//! once per process and passed to command handlers; nothing here lives in
//! module-level state.

use anyhow::Result;

use crate::models::Entry;
use crate::reconcile::Reconciler;
use crate::settings::SettingsStore;
use crate::store::{self, Store};
use crate::undo::DeleteQueue;

pub struct App {
    pub store: Store,
    pub reconciler: Reconciler,
    pub settings: SettingsStore,
    pub deletes: DeleteQueue<Entry>,
}

impl App {
    /// Opens the durable store at the platform data dir.
    pub async fn open() -> Result<Self> {
        let path = store::data_path()?;
        let store = Store::open(&path).await?;
        Ok(Self::with_store(store).await)
    }

    /// Wires the engines over an existing store; used directly by tests.
    pub async fn with_store(store: Store) -> Self {
        let reconciler = Reconciler::new(store.entries.clone());
        let settings = SettingsStore::new(store.settings.clone()).await;
        let deletes = DeleteQueue::new(store.entries.clone());
        deletes.refresh().await;
        App {
            store,
            reconciler,
            settings,
            deletes,
        }
    }

    /// Drains the settings queue and writes the snapshot file.
    pub async fn shutdown(&self) -> Result<()> {
        self.settings.flush().await;
        self.store.save().await
    }
}
