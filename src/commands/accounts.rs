// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rust_decimal::Decimal;

use crate::app::App;
use crate::balance::{self, Basis};
use crate::models::{Account, ValidationError, palette_color};
use crate::utils::{account_by_name, fmt_money, parse_decimal, pretty_table};

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let tag = sub.get_one::<String>("tag").unwrap();
            let starting = parse_decimal(sub.get_one::<String>("starting-balance").unwrap())?;
            let existing = app.store.accounts.list().await;
            // Lookups elsewhere resolve accounts by exact name; a second
            // account with the same name would be unreachable.
            if existing.iter().any(|r| r.data.name == *name) {
                bail!(ValidationError::DuplicateAccount(name.clone()));
            }
            let count = existing.len();
            let color = sub
                .get_one::<String>("color")
                .cloned()
                .unwrap_or_else(|| palette_color(count));
            app.store
                .accounts
                .create(Account {
                    name: name.clone(),
                    tag: tag.clone(),
                    color,
                    currency: ccy.clone(),
                    starting_balance: starting,
                    order: count as i64,
                })
                .await;
            reconcile_now(app).await;
            println!("Added account '{}' ({}, {})", name, tag, ccy);
        }
        Some(("list", _)) => {
            let accounts = app.store.accounts.list().await;
            let entries = app.store.entries.list().await;
            let mut data = Vec::new();
            for a in &accounts {
                let bal = balance::account_balance(a, &entries, None, Basis::Settled);
                data.push(vec![
                    a.id.to_string(),
                    a.data.name.clone(),
                    a.data.tag.clone(),
                    a.data.currency.clone(),
                    fmt_money(&a.data.starting_balance, &a.data.currency),
                    fmt_money(&bal, &a.data.currency),
                ]);
            }
            println!(
                "{}",
                pretty_table(
                    &["Id", "Name", "Tag", "Currency", "Starting", "Balance"],
                    data
                )
            );
        }
        Some(("set", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rec = account_by_name(&app.store, name).await?;
            let mut acc = rec.data.clone();
            if let Some(v) = sub.get_one::<String>("currency") {
                acc.currency = v.to_uppercase();
            }
            if let Some(v) = sub.get_one::<String>("tag") {
                acc.tag = v.clone();
            }
            if let Some(v) = sub.get_one::<String>("color") {
                acc.color = v.clone();
            }
            if let Some(v) = sub.get_one::<String>("starting-balance") {
                acc.starting_balance = parse_decimal(v)?;
            }
            if let Some(v) = sub.get_one::<String>("rename") {
                let taken = app
                    .store
                    .accounts
                    .list()
                    .await
                    .iter()
                    .any(|r| r.id != rec.id && r.data.name == *v);
                if taken {
                    bail!(ValidationError::DuplicateAccount(v.clone()));
                }
                acc.name = v.clone();
            }
            app.store.accounts.update(rec.id, acc.clone()).await?;
            reconcile_now(app).await;
            println!("Updated account '{}'", acc.name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rec = account_by_name(&app.store, name).await?;
            let in_use = app
                .store
                .entries
                .list()
                .await
                .iter()
                .any(|e| !e.data.is_synthetic() && e.data.touches(rec.id));
            if in_use {
                bail!(ValidationError::AccountInUse(name.clone()));
            }
            // Drop its synthetic entry via a zero-balance pass first.
            let mut orphan = rec.clone();
            orphan.data.starting_balance = Decimal::ZERO;
            app.reconciler.reconcile(std::slice::from_ref(&orphan)).await;
            app.store.accounts.delete(rec.id).await?;
            reconcile_now(app).await;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

/// Account mutations always run a reconcile pass; failures are reported but
/// do not fail the command.
async fn reconcile_now(app: &App) {
    let accounts = app.store.accounts.list().await;
    let report = app.reconciler.reconcile(&accounts).await;
    for err in &report.errors {
        eprintln!("reconcile: {}", err);
    }
}
