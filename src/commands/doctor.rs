// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only ledger integrity report. Never mutates; every finding is a row
//! the user can act on with account/category/tx commands.

use anyhow::Result;
use std::collections::HashMap;

use crate::app::App;
use crate::models::Entry;
use crate::utils::pretty_table;

pub async fn handle(app: &App) -> Result<()> {
    let accounts = app.store.accounts.list().await;
    let entries = app.store.entries.list().await;
    let settings = app.store.settings.list().await;
    let known: Vec<i64> = accounts.iter().map(|a| a.id).collect();

    let mut rows = Vec::new();

    // 1) Entries referencing accounts that no longer exist.
    for r in &entries {
        let refs: Vec<i64> = match &r.data {
            Entry::Income(m) | Entry::Expense(m) => vec![m.account],
            Entry::Transfer(t) => vec![t.from_account, t.to_account],
        };
        for id in refs {
            if !known.contains(&id) {
                rows.push(vec![
                    "dangling_account_ref".into(),
                    format!("entry #{} -> account #{}", r.id, id),
                ]);
            }
        }
    }

    // 2) Transfer invariants: distinct accounts, cross-currency dest amount.
    for r in &entries {
        let Entry::Transfer(t) = &r.data else { continue };
        if t.from_account == t.to_account {
            rows.push(vec![
                "same_account_transfer".into(),
                format!("entry #{}", r.id),
            ]);
        }
        let from_ccy = accounts
            .iter()
            .find(|a| a.id == t.from_account)
            .map(|a| a.data.currency.clone());
        let to_ccy = accounts
            .iter()
            .find(|a| a.id == t.to_account)
            .map(|a| a.data.currency.clone());
        if let (Some(f), Some(to)) = (from_ccy, to_ccy) {
            if !f.eq_ignore_ascii_case(&to) && t.dest_amount.is_none() {
                rows.push(vec![
                    "transfer_missing_dest_amount".into(),
                    format!("entry #{} ({} -> {})", r.id, f, to),
                ]);
            }
        }
    }

    // 3) Synthetic starting-balance anomalies.
    let mut synthetic_per_account: HashMap<i64, usize> = HashMap::new();
    for r in &entries {
        if !r.data.is_synthetic() {
            continue;
        }
        if let Some(m) = r.data.movement() {
            *synthetic_per_account.entry(m.account).or_insert(0) += 1;
        }
    }
    for a in &accounts {
        let count = synthetic_per_account.get(&a.id).copied().unwrap_or(0);
        let expected = usize::from(!a.data.starting_balance.is_zero());
        if count != expected {
            rows.push(vec![
                "synthetic_count_mismatch".into(),
                format!(
                    "account '{}' has {} starting-balance entries, expected {}",
                    a.data.name, count, expected
                ),
            ]);
            continue;
        }
        if count == 1 {
            let entry = entries
                .iter()
                .find(|r| r.data.is_synthetic() && r.data.touches(a.id));
            if let Some(r) = entry {
                let amount = r.data.movement().map(|m| m.amount);
                let signed = match &r.data {
                    Entry::Expense(m) => Some(-m.amount),
                    Entry::Income(m) => Some(m.amount),
                    Entry::Transfer(_) => None,
                };
                if amount != Some(a.data.starting_balance.abs())
                    || signed.map(|s| s.is_sign_negative())
                        != Some(a.data.starting_balance.is_sign_negative())
                {
                    rows.push(vec![
                        "synthetic_amount_mismatch".into(),
                        format!(
                            "account '{}': entry #{} does not match starting balance {}",
                            a.data.name, r.id, a.data.starting_balance
                        ),
                    ]);
                }
            }
        }
    }

    // 4) Negative income/expense amounts (sign belongs to the variant).
    for r in &entries {
        if let Some(m) = r.data.movement() {
            if m.amount.is_sign_negative() {
                rows.push(vec![
                    "negative_amount".into(),
                    format!("entry #{}", r.id),
                ]);
            }
        }
    }

    // 5) The settings record is a singleton.
    if settings.len() > 1 {
        rows.push(vec![
            "duplicate_settings".into(),
            format!("{} settings records", settings.len()),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
