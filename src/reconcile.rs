// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keeps each account's synthetic starting-balance entry consistent with its
//! configured starting balance. Idempotent and self-healing: duplicates and
//! wrong-variant leftovers from earlier sign flips are cleaned up on every
//! pass.

use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

use crate::models::{Account, Entry, Movement, SYNTHETIC_CATEGORY, SYNTHETIC_DATE};
use crate::store::{Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Created,
    Updated,
    Removed,
    Unchanged,
    /// Advisory-cache hit: the applied value is unchanged and the store
    /// still holds the desired state, so no writes were considered.
    Skipped,
}

impl ReconcileAction {
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileAction::Created => "created",
            ReconcileAction::Updated => "updated",
            ReconcileAction::Removed => "removed",
            ReconcileAction::Unchanged => "unchanged",
            ReconcileAction::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub account: i64,
    pub name: String,
    pub action: ReconcileAction,
}

/// Aggregate result of one pass. A per-account failure lands in `errors` and
/// never aborts the remaining accounts.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<ReconcileOutcome>,
    pub errors: Vec<String>,
}

impl ReconcileReport {
    pub fn writes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o.action,
                    ReconcileAction::Created | ReconcileAction::Updated | ReconcileAction::Removed
                )
            })
            .count()
    }
}

pub struct Reconciler {
    entries: Table<Entry>,
    /// Advisory cache of the last applied starting balance per account. A
    /// hit only labels the outcome; the skip itself is taken after the
    /// current store state is confirmed, so staleness never costs
    /// correctness.
    applied: StdMutex<HashMap<i64, Decimal>>,
    /// Serializes passes process-wide. A caller arriving during an in-flight
    /// pass waits for it, then runs a full pass with its own account
    /// snapshot, so a late snapshot is never silently dropped.
    gate: Mutex<()>,
}

impl Reconciler {
    pub fn new(entries: Table<Entry>) -> Self {
        Reconciler {
            entries,
            applied: StdMutex::new(HashMap::new()),
            gate: Mutex::new(()),
        }
    }

    pub async fn reconcile(&self, accounts: &[Record<Account>]) -> ReconcileReport {
        let _pass = self.gate.lock().await;
        let mut report = ReconcileReport::default();
        for acc in accounts {
            match self.reconcile_account(acc).await {
                Ok(action) => report.outcomes.push(ReconcileOutcome {
                    account: acc.id,
                    name: acc.data.name.clone(),
                    action,
                }),
                Err(e) => report
                    .errors
                    .push(format!("{}: {:#}", acc.data.name, e)),
            }
        }
        report
    }

    /// Drops the advisory cache. Bulk deletes that wipe synthetic entries
    /// call this before their rebuild pass so the outcomes read as real
    /// writes rather than verified skips.
    pub fn invalidate(&self) {
        self.applied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn applied_value(&self, account: i64) -> Option<Decimal> {
        self.applied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&account)
            .copied()
    }

    fn remember(&self, account: i64, value: Decimal) {
        self.applied
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(account, value);
    }

    /// True when the fetched synthetic entries already form the desired
    /// state for the target balance: none when zero, else exactly one of
    /// the right variant with the desired amount, date, flags, and label.
    fn desired_state_holds(matches: &[Record<Entry>], target: Decimal) -> bool {
        if target.is_zero() {
            return matches.is_empty();
        }
        let [only] = matches else {
            return false;
        };
        let want_income = target > Decimal::ZERO;
        let variant_ok = matches!(
            (&only.data, want_income),
            (Entry::Income(_), true) | (Entry::Expense(_), false)
        );
        let Some(m) = only.data.movement() else {
            return false;
        };
        variant_ok
            && m.amount == target.abs()
            && m.date == *SYNTHETIC_DATE
            && m.cleared
            && m.projected
            && m.category == SYNTHETIC_CATEGORY
    }

    async fn reconcile_account(&self, acc: &Record<Account>) -> Result<ReconcileAction> {
        let target = acc.data.starting_balance;
        let cache_hit = self.applied_value(acc.id) == Some(target);

        let matches: Vec<Record<Entry>> = self
            .entries
            .list()
            .await
            .into_iter()
            .filter(|r| r.data.is_synthetic() && r.data.touches(acc.id))
            .collect();

        // The cache is a hint, never a verdict: a skip is only taken after
        // the current store state confirms the desired entry is in place,
        // so an out-of-band delete still gets healed on the next pass.
        if cache_hit && Self::desired_state_holds(&matches, target) {
            return Ok(ReconcileAction::Skipped);
        }

        if target.is_zero() {
            let ids: Vec<i64> = matches.iter().map(|r| r.id).collect();
            self.entries.delete_many(&ids).await?;
            self.remember(acc.id, target);
            return Ok(if ids.is_empty() {
                ReconcileAction::Unchanged
            } else {
                ReconcileAction::Removed
            });
        }

        let want_income = target > Decimal::ZERO;
        let desired = Movement {
            account: acc.id,
            amount: target.abs(),
            category: SYNTHETIC_CATEGORY.to_string(),
            subcategory: String::new(),
            date: *SYNTHETIC_DATE,
            notes: String::new(),
            cleared: true,
            projected: true,
            important: false,
        };
        let desired_entry = if want_income {
            Entry::Income(desired.clone())
        } else {
            Entry::Expense(desired.clone())
        };

        let (mut keep, wrong): (Vec<_>, Vec<_>) = matches.into_iter().partition(|r| {
            matches!(
                (&r.data, want_income),
                (Entry::Income(_), true) | (Entry::Expense(_), false)
            )
        });
        let wrong_ids: Vec<i64> = wrong.iter().map(|r| r.id).collect();
        self.entries.delete_many(&wrong_ids).await?;
        let healed = !wrong_ids.is_empty();

        let action = if keep.is_empty() {
            self.entries.create(desired_entry).await;
            ReconcileAction::Created
        } else {
            keep.sort_by_key(|r| r.id);
            let surplus: Vec<i64> = keep[1..].iter().map(|r| r.id).collect();
            self.entries.delete_many(&surplus).await?;
            let kept = &keep[0];
            let matches_desired = match kept.data.movement() {
                Some(m) => {
                    m.amount == desired.amount
                        && m.date == desired.date
                        && m.cleared
                        && m.projected
                        && m.category == desired.category
                }
                None => false,
            };
            if matches_desired {
                if healed || !surplus.is_empty() {
                    ReconcileAction::Updated
                } else {
                    ReconcileAction::Unchanged
                }
            } else {
                self.entries.update(kept.id, desired_entry).await?;
                ReconcileAction::Updated
            }
        };

        self.remember(acc.id, target);
        Ok(action)
    }
}
