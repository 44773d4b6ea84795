// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use dialoguer::Confirm;

use crate::app::App;
use crate::models::{Category, CategoryKind, Entry, ValidationError, palette_color};
use crate::store::Store;
use crate::utils::{category_by_name, pretty_table};

fn parse_kind(s: &str) -> Result<CategoryKind> {
    CategoryKind::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown kind '{}' (expense|income)", s))
}

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
            let existing = app.store.categories.list().await;
            if existing
                .iter()
                .any(|r| r.data.kind == kind && r.data.name.eq_ignore_ascii_case(name))
            {
                bail!(ValidationError::DuplicateCategory(name.clone()));
            }
            let count = existing.iter().filter(|r| r.data.kind == kind).count();
            let color = sub
                .get_one::<String>("color")
                .cloned()
                .unwrap_or_else(|| palette_color(count));
            app.store
                .categories
                .create(Category {
                    name: name.clone(),
                    kind,
                    color,
                    order: count as i64,
                })
                .await;
            println!("Added {} category '{}'", kind.label(), name);
        }
        Some(("list", _)) => {
            let mut cats = app.store.categories.list().await;
            cats.sort_by(|a, b| {
                a.data
                    .kind
                    .label()
                    .cmp(b.data.kind.label())
                    .then(a.data.order.cmp(&b.data.order))
            });
            let data = cats
                .iter()
                .map(|c| {
                    vec![
                        c.data.name.clone(),
                        c.data.kind.label().to_string(),
                        c.data.color.clone(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Name", "Kind", "Color"], data));
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = sub.get_one::<String>("new-name").unwrap();
            let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
            let rec = category_by_name(&app.store, name, kind).await?;

            let collision = app
                .store
                .categories
                .list()
                .await
                .into_iter()
                .find(|r| {
                    r.id != rec.id
                        && r.data.kind == kind
                        && r.data.name.eq_ignore_ascii_case(new_name)
                });

            if let Some(target) = collision {
                // Name collision is a merge, never an overwrite, and merging
                // repoints entries, so it requires explicit confirmation.
                if !sub.get_flag("merge") {
                    bail!(
                        "Category '{}' already exists; pass --merge to fold '{}' into it",
                        target.data.name,
                        name
                    );
                }
                if !sub.get_flag("yes") {
                    let ok = Confirm::new()
                        .with_prompt(format!(
                            "Repoint all '{}' entries to '{}' and remove '{}'?",
                            name, target.data.name, name
                        ))
                        .interact()?;
                    if !ok {
                        println!("Merge aborted");
                        return Ok(());
                    }
                }
                let moved = repoint_entries(&app.store, kind, name, &target.data.name).await?;
                app.store.categories.delete(rec.id).await?;
                println!(
                    "Merged '{}' into '{}' ({} entries repointed)",
                    name, target.data.name, moved
                );
            } else {
                let mut cat = rec.data.clone();
                cat.name = new_name.clone();
                app.store.categories.update(rec.id, cat).await?;
                let moved = repoint_entries(&app.store, kind, name, new_name).await?;
                println!("Renamed '{}' to '{}' ({} entries updated)", name, new_name, moved);
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
            let rec = category_by_name(&app.store, name, kind).await?;
            let in_use = app.store.entries.list().await.iter().any(|r| {
                entry_matches_category(&r.data, kind, name)
            });
            if in_use {
                bail!(ValidationError::CategoryInUse(name.clone()));
            }
            app.store.categories.delete(rec.id).await?;
            println!("Removed {} category '{}'", kind.label(), name);
        }
        _ => {}
    }
    Ok(())
}

fn entry_matches_category(e: &Entry, kind: CategoryKind, name: &str) -> bool {
    let m = match (e, kind) {
        (Entry::Income(m), CategoryKind::Income) => m,
        (Entry::Expense(m), CategoryKind::Expense) => m,
        _ => return false,
    };
    m.category.eq_ignore_ascii_case(name)
}

async fn repoint_entries(store: &Store, kind: CategoryKind, from: &str, to: &str) -> Result<usize> {
    let mut patches = Vec::new();
    for rec in store.entries.list().await {
        if !entry_matches_category(&rec.data, kind, from) {
            continue;
        }
        let mut entry = rec.data.clone();
        match &mut entry {
            Entry::Income(m) | Entry::Expense(m) => m.category = to.to_string(),
            Entry::Transfer(_) => {}
        }
        patches.push((rec.id, entry));
    }
    let n = patches.len();
    store.entries.update_many(patches).await?;
    Ok(n)
}
