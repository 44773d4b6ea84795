// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Optimistic delete with a grace-period undo window. The queue owns a
//! cached view of one collection; a scheduled delete removes the item from
//! the view immediately, snapshots the prior state, and only touches the
//! store once the grace timer expires without an undo.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use crate::store::{Record, Table};

pub const GRACE_PERIOD: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Grace period elapsed; the store delete was issued.
    Committed,
    /// Undo arrived in time; the store was never touched.
    Undone,
}

#[derive(Debug)]
pub enum Scheduled {
    /// Item was not in the cached view; deleted from the store right away.
    Immediate,
    /// Delete pending; resolves once the timer fires or undo is called.
    Pending(DeleteTicket),
    /// A delete for this id is already pending; the request is ignored.
    AlreadyPending,
}

#[derive(Debug)]
pub struct DeleteTicket {
    rx: oneshot::Receiver<DeleteOutcome>,
}

impl DeleteTicket {
    pub async fn settled(self) -> DeleteOutcome {
        self.rx.await.unwrap_or(DeleteOutcome::Committed)
    }
}

struct PendingDelete<T> {
    snapshot: Vec<Record<T>>,
    done: oneshot::Sender<DeleteOutcome>,
    timer: JoinHandle<()>,
}

struct QueueState<T> {
    view: Vec<Record<T>>,
    pending: HashMap<i64, PendingDelete<T>>,
}

/// One queue per collection. All view and pending-state mutations go through
/// a single lock, so no other path can overwrite a snapshot out from under a
/// pending undo.
#[derive(Clone)]
pub struct DeleteQueue<T> {
    table: Table<T>,
    state: Arc<Mutex<QueueState<T>>>,
    grace: Duration,
}

impl<T: Clone + Send + Sync + 'static> DeleteQueue<T> {
    pub fn new(table: Table<T>) -> Self {
        Self::with_grace(table, GRACE_PERIOD)
    }

    pub fn with_grace(table: Table<T>, grace: Duration) -> Self {
        DeleteQueue {
            table,
            state: Arc::new(Mutex::new(QueueState {
                view: Vec::new(),
                pending: HashMap::new(),
            })),
            grace,
        }
    }

    /// Current cached view.
    pub async fn view(&self) -> Vec<Record<T>> {
        self.state.lock().await.view.clone()
    }

    /// Reloads the view from the store. Skipped while any delete is pending;
    /// reloading then would clobber the snapshot a waiting undo relies on.
    pub async fn refresh(&self) {
        let fresh = self.table.list().await;
        let mut st = self.state.lock().await;
        if st.pending.is_empty() {
            st.view = fresh;
        }
    }

    pub async fn schedule(&self, id: i64) -> Result<Scheduled, crate::store::StoreError> {
        let mut st = self.state.lock().await;
        if st.pending.contains_key(&id) {
            return Ok(Scheduled::AlreadyPending);
        }
        let Some(pos) = st.view.iter().position(|r| r.id == id) else {
            drop(st);
            self.table.delete(id).await?;
            return Ok(Scheduled::Immediate);
        };

        let snapshot = st.view.clone();
        st.view.remove(pos);

        let (done_tx, done_rx) = oneshot::channel();
        let table = self.table.clone();
        let state = Arc::clone(&self.state);
        let grace = self.grace;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let pending = state.lock().await.pending.remove(&id);
            let Some(p) = pending else {
                return;
            };
            if let Err(e) = table.delete(id).await {
                log::warn!("deferred delete of #{} failed: {}", id, e);
            }
            let _ = p.done.send(DeleteOutcome::Committed);
        });

        st.pending.insert(
            id,
            PendingDelete {
                snapshot,
                done: done_tx,
                timer,
            },
        );
        Ok(Scheduled::Pending(DeleteTicket { rx: done_rx }))
    }

    /// Cancels a pending delete and restores the snapshotted view verbatim.
    /// Returns false when nothing is pending for the id (including after the
    /// grace period already expired).
    pub async fn undo(&self, id: i64) -> bool {
        let mut st = self.state.lock().await;
        let Some(p) = st.pending.remove(&id) else {
            return false;
        };
        p.timer.abort();
        st.view = p.snapshot;
        let _ = p.done.send(DeleteOutcome::Undone);
        true
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }
}
