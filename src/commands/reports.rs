// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::app::App;
use crate::balance::{self, Basis};
use crate::utils::{account_by_name, fmt_money, parse_date, pretty_table};

fn parse_basis(sub: &clap::ArgMatches) -> Result<Basis> {
    let raw = sub.get_one::<String>("basis").unwrap();
    Basis::parse(raw).ok_or_else(|| anyhow!("Unknown basis '{}' (settled|forecast)", raw))
}

fn parse_as_of(sub: &clap::ArgMatches) -> Result<Option<NaiveDate>> {
    sub.get_one::<String>("as-of").map(|s| parse_date(s)).transpose()
}

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => {
            let basis = parse_basis(sub)?;
            let as_of = parse_as_of(sub)?;
            let accounts = app.store.accounts.list().await;
            let entries = app.store.entries.list().await;
            let data = accounts
                .iter()
                .map(|a| {
                    let bal = balance::account_balance(a, &entries, as_of, basis);
                    vec![a.data.name.clone(), fmt_money(&bal, &a.data.currency)]
                })
                .collect();
            println!("{}", pretty_table(&["Account", "Balance"], data));
        }
        Some(("networth", sub)) => {
            let basis = parse_basis(sub)?;
            let as_of = parse_as_of(sub)?;
            let accounts = app.store.accounts.list().await;
            let entries = app.store.entries.list().await;
            let total = balance::net_worth(&accounts, &entries, as_of, basis);
            let ccy = app.settings.get().main_currency;
            // Mixed-currency ledgers are summed as-is; conversion is out of
            // scope, the doctor command surfaces mismatches.
            println!("Net worth: {}", fmt_money(&total, &ccy));
        }
        Some(("running", sub)) => {
            let acc = account_by_name(&app.store, sub.get_one::<String>("account").unwrap()).await?;
            let entries = app.store.entries.list().await;
            let running = balance::running_balance(acc.id, &entries);
            let data = running
                .iter()
                .map(|(id, total)| vec![id.to_string(), fmt_money(total, &acc.data.currency)])
                .collect();
            println!("{}", pretty_table(&["Entry", "Running"], data));
        }
        _ => {}
    }
    Ok(())
}
