// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure balance computation over ledger entries: deterministic chronological
//! ordering, running balances, and point-in-time account/net-worth totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::models::{Account, Entry};
use crate::store::Record;

/// Which entries participate in a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Settled view: projected entries are skipped.
    Settled,
    /// Forward projection: projected entries are included.
    Forecast,
}

impl Basis {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "settled" => Some(Basis::Settled),
            "forecast" => Some(Basis::Forecast),
            _ => None,
        }
    }

    fn includes(&self, e: &Entry) -> bool {
        match self {
            Basis::Settled => !e.projected(),
            Basis::Forecast => true,
        }
    }
}

/// Ascending total order: date, then creation time, then last-update time
/// (creation time if never updated), then identifier as a stability fallback.
pub fn cmp_chronological(a: &Record<Entry>, b: &Record<Entry>) -> Ordering {
    a.data
        .date()
        .cmp(&b.data.date())
        .then_with(|| a.created.cmp(&b.created))
        .then_with(|| a.touched().cmp(&b.touched()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Most-recent-first display order. Each of the three keys is reversed
/// independently rather than reversing the total order; the identifier
/// fallback stays ascending. Kept as-is for display compatibility.
pub fn cmp_display(a: &Record<Entry>, b: &Record<Entry>) -> Ordering {
    b.data
        .date()
        .cmp(&a.data.date())
        .then_with(|| b.created.cmp(&a.created))
        .then_with(|| b.touched().cmp(&a.touched()))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_chronological(entries: &mut [Record<Entry>]) {
    entries.sort_by(cmp_chronological);
}

pub fn sort_display(entries: &mut [Record<Entry>]) {
    entries.sort_by(cmp_display);
}

/// Signed delta the entry contributes to the given account's balance.
/// Income adds, expense subtracts; a transfer subtracts its amount from the
/// source and adds the destination amount (source amount if absent) to the
/// destination.
pub fn entry_effect(account: i64, e: &Entry) -> Decimal {
    match e {
        Entry::Income(m) if m.account == account => m.amount,
        Entry::Expense(m) if m.account == account => -m.amount,
        Entry::Transfer(t) if t.from_account == account => -t.amount,
        Entry::Transfer(t) if t.to_account == account => t.dest_amount.unwrap_or(t.amount),
        _ => Decimal::ZERO,
    }
}

/// Chronological fold from zero over the given set, restricted to entries
/// touching the account. Returns (entry id, running total) pairs. The caller
/// includes the synthetic starting-balance entry, or excludes it and adds the
/// starting balance to the result itself.
pub fn running_balance(account: i64, entries: &[Record<Entry>]) -> Vec<(i64, Decimal)> {
    let mut own: Vec<Record<Entry>> = entries
        .iter()
        .filter(|r| r.data.touches(account))
        .cloned()
        .collect();
    sort_chronological(&mut own);
    let mut total = Decimal::ZERO;
    own.iter()
        .map(|r| {
            total += entry_effect(account, &r.data);
            (r.id, total)
        })
        .collect()
}

/// Point-in-time balance: starting balance plus the fold over non-synthetic
/// entries dated on or before `as_of` (all dates when `None`).
pub fn account_balance(
    account: &Record<Account>,
    entries: &[Record<Entry>],
    as_of: Option<NaiveDate>,
    basis: Basis,
) -> Decimal {
    let mut total = account.data.starting_balance;
    for r in entries {
        if r.data.is_synthetic() || !basis.includes(&r.data) {
            continue;
        }
        if let Some(d) = as_of {
            if r.data.date() > d {
                continue;
            }
        }
        total += entry_effect(account.id, &r.data);
    }
    total
}

/// Net worth across all accounts at a reference point.
pub fn net_worth(
    accounts: &[Record<Account>],
    entries: &[Record<Entry>],
    as_of: Option<NaiveDate>,
    basis: Basis,
) -> Decimal {
    accounts
        .iter()
        .map(|a| account_balance(a, entries, as_of, basis))
        .sum()
}
