// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerline::app::App;
use ledgerline::cli::build_cli;
use ledgerline::commands::categories;
use ledgerline::models::{Category, CategoryKind, Entry, Movement};
use ledgerline::store::Store;

async fn run(app: &App, argv: &[&str]) -> anyhow::Result<()> {
    let matches = build_cli().get_matches_from(argv);
    let Some(("category", sub)) = matches.subcommand() else {
        panic!("expected category subcommand");
    };
    categories::handle(app, sub).await
}

fn expense(category: &str) -> Entry {
    Entry::Expense(Movement {
        account: 1,
        amount: "10".parse().unwrap(),
        category: category.to_string(),
        subcategory: String::new(),
        date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        notes: String::new(),
        cleared: true,
        projected: false,
        important: false,
    })
}

async fn seed_expense_categories(store: &Store, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        store
            .categories
            .create(Category {
                name: name.to_string(),
                kind: CategoryKind::Expense,
                color: "#4E79A7".to_string(),
                order: i as i64,
            })
            .await;
    }
}

fn expense_categories_of(entries: &[ledgerline::store::Record<Entry>]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|r| match &r.data {
            Entry::Expense(m) => Some(m.category.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn merge_repoints_entries_and_removes_the_duplicate() {
    let store = Store::in_memory();
    seed_expense_categories(&store, &["Food", "Meals"]).await;
    store.entries.create(expense("Meals")).await;
    store.entries.create(expense("meals")).await;
    store.entries.create(expense("Food")).await;
    let app = App::with_store(store).await;

    run(
        &app,
        &[
            "ledgerline", "category", "rename", "Meals", "Food", "--merge", "--yes",
        ],
    )
    .await
    .unwrap();

    let cats = app.store.categories.list().await;
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].data.name, "Food");

    let entries = app.store.entries.list().await;
    assert_eq!(
        expense_categories_of(&entries),
        vec!["Food", "Food", "Food"],
        "every entry repointed, case-insensitively"
    );
}

#[tokio::test]
async fn merge_requires_the_merge_flag() {
    let store = Store::in_memory();
    seed_expense_categories(&store, &["Food", "Meals"]).await;
    store.entries.create(expense("Meals")).await;
    let app = App::with_store(store).await;

    let err = run(&app, &["ledgerline", "category", "rename", "Meals", "Food"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--merge"), "got: {}", err);

    // Nothing moved.
    assert_eq!(app.store.categories.list().await.len(), 2);
    assert_eq!(
        expense_categories_of(&app.store.entries.list().await),
        vec!["Meals"]
    );
}

#[tokio::test]
async fn plain_rename_updates_the_record_and_its_entries() {
    let store = Store::in_memory();
    seed_expense_categories(&store, &["Food"]).await;
    store.entries.create(expense("Food")).await;
    store.entries.create(expense("food")).await;
    let app = App::with_store(store).await;

    run(
        &app,
        &["ledgerline", "category", "rename", "Food", "Groceries"],
    )
    .await
    .unwrap();

    let cats = app.store.categories.list().await;
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].data.name, "Groceries");
    assert_eq!(
        expense_categories_of(&app.store.entries.list().await),
        vec!["Groceries", "Groceries"]
    );
}

#[tokio::test]
async fn merge_only_touches_entries_of_the_same_kind() {
    let store = Store::in_memory();
    seed_expense_categories(&store, &["Food", "Meals"]).await;
    // An income entry sharing the name must stay put.
    store
        .entries
        .create(Entry::Income(Movement {
            account: 1,
            amount: "50".parse().unwrap(),
            category: "Meals".to_string(),
            subcategory: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            notes: String::new(),
            cleared: true,
            projected: false,
            important: false,
        }))
        .await;
    store.entries.create(expense("Meals")).await;
    let app = App::with_store(store).await;

    run(
        &app,
        &[
            "ledgerline", "category", "rename", "Meals", "Food", "--merge", "--yes",
        ],
    )
    .await
    .unwrap();

    let entries = app.store.entries.list().await;
    assert_eq!(expense_categories_of(&entries), vec!["Food"]);
    let income: Vec<String> = entries
        .iter()
        .filter_map(|r| match &r.data {
            Entry::Income(m) => Some(m.category.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(income, vec!["Meals"]);
}
