// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use dialoguer::Confirm;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::balance;
use crate::models::{Entry, Movement, Transfer, validate_movement, validate_transfer};
use crate::undo::{DeleteOutcome, GRACE_PERIOD, Scheduled};
use crate::utils::{account_by_name, parse_date, parse_decimal, pretty_table, yes_no};

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub).await,
        Some(("transfer", sub)) => transfer(app, sub).await,
        Some(("list", sub)) => list(app, sub).await,
        Some(("rm", sub)) => rm(app, sub).await,
        Some(("clear-all", sub)) => clear_all(app, sub).await,
        _ => Ok(()),
    }
}

async fn add(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub.get_one::<String>("kind").unwrap();
    let account = account_by_name(&app.store, sub.get_one::<String>("account").unwrap()).await?;
    let movement = Movement {
        account: account.id,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        category: sub.get_one::<String>("category").unwrap().clone(),
        subcategory: sub.get_one::<String>("subcategory").unwrap().clone(),
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        notes: sub.get_one::<String>("notes").unwrap().clone(),
        cleared: sub.get_flag("cleared"),
        projected: sub.get_flag("projected"),
        important: sub.get_flag("important"),
    };
    validate_movement(&movement)?;
    let entry = match kind.as_str() {
        "income" => Entry::Income(movement),
        _ => Entry::Expense(movement),
    };
    let rec = app.store.entries.create(entry).await;
    app.deletes.refresh().await;
    println!("Added {} #{}", kind, rec.id);
    Ok(())
}

async fn transfer(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let from = account_by_name(&app.store, sub.get_one::<String>("from").unwrap()).await?;
    let to = account_by_name(&app.store, sub.get_one::<String>("to").unwrap()).await?;
    let dest_amount = match sub.get_one::<String>("dest-amount") {
        Some(v) => Some(parse_decimal(v)?),
        None => None,
    };
    let t = Transfer {
        from_account: from.id,
        to_account: to.id,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        dest_amount,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        notes: sub.get_one::<String>("notes").unwrap().clone(),
        cleared: sub.get_flag("cleared"),
        projected: sub.get_flag("projected"),
    };
    validate_transfer(&t, &from.data, &to.data)?;
    let rec = app.store.entries.create(Entry::Transfer(t)).await;
    app.deletes.refresh().await;
    println!(
        "Added transfer #{} {} -> {}",
        rec.id, from.data.name, to.data.name
    );
    Ok(())
}

async fn list(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = app.store.accounts.list().await;
    let name_of = |id: i64| {
        accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.data.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    };
    let mut entries = app.store.entries.list().await;
    if let Some(name) = sub.get_one::<String>("account") {
        let acc = account_by_name(&app.store, name).await?;
        entries.retain(|r| r.data.touches(acc.id));
    }
    balance::sort_display(&mut entries);

    let mut data = Vec::new();
    for r in &entries {
        let (account, detail, amount) = match &r.data {
            Entry::Income(m) | Entry::Expense(m) => {
                (name_of(m.account), m.category.clone(), m.amount)
            }
            Entry::Transfer(t) => (
                name_of(t.from_account),
                format!("-> {}", name_of(t.to_account)),
                t.amount,
            ),
        };
        data.push(vec![
            r.id.to_string(),
            r.data.date().to_string(),
            r.data.kind_label().to_string(),
            account,
            detail,
            amount.to_string(),
            yes_no(r.data.cleared()).to_string(),
            yes_no(r.data.projected()).to_string(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &[
                "Id",
                "Date",
                "Type",
                "Account",
                "Category",
                "Amount",
                "Cleared",
                "Projected"
            ],
            data
        )
    );
    Ok(())
}

async fn rm(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub.get_one::<String>("id").unwrap().parse()?;
    // Starting-balance entries have a single writer, the reconciler; deleting
    // one here would leave its applied cache pointing at a ghost.
    if let Some(rec) = app.store.entries.get(id).await {
        if rec.data.is_synthetic() {
            bail!(
                "Entry #{} is a starting-balance entry; change the account's starting balance instead",
                id
            );
        }
    }
    if sub.get_flag("now") {
        app.store.entries.delete(id).await?;
        app.deletes.refresh().await;
        println!("Deleted entry #{}", id);
        return Ok(());
    }

    app.deletes.refresh().await;
    match app.deletes.schedule(id).await? {
        Scheduled::Immediate => println!("Deleted entry #{}", id),
        Scheduled::AlreadyPending => println!("Delete of #{} already pending", id),
        Scheduled::Pending(ticket) => {
            println!(
                "Deleting entry #{} in {}s; press Enter to undo",
                id,
                GRACE_PERIOD.as_secs()
            );
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            tokio::select! {
                line = lines.next_line() => {
                    if line?.is_some() && app.deletes.undo(id).await {
                        println!("Restored entry #{}", id);
                    }
                }
                outcome = ticket.settled() => {
                    match outcome {
                        DeleteOutcome::Committed => println!("Deleted entry #{}", id),
                        DeleteOutcome::Undone => println!("Restored entry #{}", id),
                    }
                }
            }
        }
    }
    Ok(())
}

async fn clear_all(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let yes = sub.get_count("yes");
    // Destructive bulk delete asks twice.
    if yes < 1
        && !Confirm::new()
            .with_prompt("Delete ALL ledger entries?")
            .interact()?
    {
        bail!("Aborted");
    }
    if yes < 2
        && !Confirm::new()
            .with_prompt("This cannot be undone. Really delete everything?")
            .interact()?
    {
        bail!("Aborted");
    }
    let ids: Vec<i64> = app.store.entries.list().await.iter().map(|r| r.id).collect();
    let n = ids.len();
    app.store.entries.delete_many(&ids).await?;
    app.deletes.refresh().await;
    // Synthetic entries went with everything else; rebuild them.
    app.reconciler.invalidate();
    let accounts = app.store.accounts.list().await;
    app.reconciler.reconcile(&accounts).await;
    println!("Deleted {} entries", n);
    Ok(())
}
