// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::app::App;
use crate::balance;
use crate::models::Entry;
use crate::store::{Record, Store};
use crate::utils::yes_no;

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let out = sub.get_one::<String>("out").unwrap();
            let text = render_csv(&app.store).await?;
            tokio::fs::write(out, text)
                .await
                .with_context(|| format!("Write CSV {}", out))?;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Renders the ledger as all-quoted CSV in chronological order. Synthetic
/// starting-balance entries are derived from account configuration and are
/// not exported; transfer rows carry the destination account name in the
/// category column, mirroring the import layout.
pub async fn render_csv(store: &Store) -> Result<String> {
    let accounts = store.accounts.list().await;
    let name_of = |id: i64| {
        accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.data.name.clone())
            .unwrap_or_default()
    };

    let mut entries: Vec<Record<Entry>> = store
        .entries
        .list()
        .await
        .into_iter()
        .filter(|r| !r.data.is_synthetic())
        .collect();
    balance::sort_chronological(&mut entries);

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    wtr.write_record([
        "Type",
        "Date",
        "Amount",
        "Account",
        "Category",
        "Subcategory",
        "Notes",
        "Cleared",
        "Projected",
    ])?;
    for r in &entries {
        let row = match &r.data {
            Entry::Income(m) | Entry::Expense(m) => [
                r.data.kind_label().to_string(),
                m.date.to_string(),
                m.amount.to_string(),
                name_of(m.account),
                m.category.clone(),
                m.subcategory.clone(),
                m.notes.clone(),
                yes_no(m.cleared).to_string(),
                yes_no(m.projected).to_string(),
            ],
            Entry::Transfer(t) => [
                "transfer".to_string(),
                t.date.to_string(),
                t.amount.to_string(),
                name_of(t.from_account),
                name_of(t.to_account),
                String::new(),
                t.notes.clone(),
                yes_no(t.cleared).to_string(),
                yes_no(t.projected).to_string(),
            ],
        };
        wtr.write_record(&row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Flush CSV writer: {}", e))?;
    Ok(String::from_utf8(bytes).context("CSV output was not UTF-8")?)
}
