// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use ledgerline::balance::{self, Basis};
use ledgerline::models::{Account, Entry, Movement, Transfer};
use ledgerline::reconcile::Reconciler;
use ledgerline::store::{Record, Store};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, n).unwrap()
}

fn movement(account: i64, amount: &str, date: NaiveDate) -> Movement {
    Movement {
        account,
        amount: d(amount),
        category: "General".to_string(),
        subcategory: String::new(),
        date,
        notes: String::new(),
        cleared: true,
        projected: false,
        important: false,
    }
}

fn rec(id: i64, secs: i64, updated_secs: Option<i64>, entry: Entry) -> Record<Entry> {
    Record {
        id,
        created: Utc.timestamp_opt(secs, 0).unwrap(),
        updated: updated_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        data: entry,
    }
}

#[test]
fn chronological_order_uses_date_then_created_then_updated_then_id() {
    let base = vec![
        rec(4, 100, None, Entry::Income(movement(1, "1", day(2)))),
        rec(3, 100, Some(50), Entry::Income(movement(1, "1", day(1)))),
        rec(2, 100, Some(200), Entry::Income(movement(1, "1", day(1)))),
        rec(1, 300, None, Entry::Income(movement(1, "1", day(1)))),
    ];
    let mut sorted = base.clone();
    balance::sort_chronological(&mut sorted);
    // day(1) entries first: created 100 before created 300; among the two
    // created at 100, updated-or-created 50 < 200.
    assert_eq!(
        sorted.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 2, 1, 4]
    );

    // Identical triple keys fall back to id order.
    let mut ties = vec![
        rec(2, 100, None, Entry::Income(movement(1, "1", day(1)))),
        rec(1, 100, None, Entry::Income(movement(1, "1", day(1)))),
    ];
    balance::sort_chronological(&mut ties);
    assert_eq!(ties.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn display_order_reverses_keys_but_not_the_id_fallback() {
    let mut entries = vec![
        rec(1, 100, None, Entry::Income(movement(1, "1", day(1)))),
        rec(2, 100, None, Entry::Income(movement(1, "1", day(2)))),
        rec(3, 100, None, Entry::Income(movement(1, "1", day(1)))),
    ];
    balance::sort_display(&mut entries);
    // Newest date first; tied entries keep ascending id order.
    assert_eq!(entries.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1, 3]);
}

#[test]
fn entry_effect_signs() {
    let income = Entry::Income(movement(1, "10", day(1)));
    let expense = Entry::Expense(movement(1, "10", day(1)));
    let transfer = Entry::Transfer(Transfer {
        from_account: 1,
        to_account: 2,
        amount: d("10"),
        dest_amount: Some(d("9")),
        date: day(1),
        notes: String::new(),
        cleared: true,
        projected: false,
    });
    assert_eq!(balance::entry_effect(1, &income), d("10"));
    assert_eq!(balance::entry_effect(1, &expense), d("-10"));
    assert_eq!(balance::entry_effect(1, &transfer), d("-10"));
    assert_eq!(balance::entry_effect(2, &transfer), d("9"));
    assert_eq!(balance::entry_effect(3, &transfer), Decimal::ZERO);
}

#[test]
fn transfer_without_dest_amount_credits_source_amount() {
    let transfer = Entry::Transfer(Transfer {
        from_account: 1,
        to_account: 2,
        amount: d("25"),
        dest_amount: None,
        date: day(1),
        notes: String::new(),
        cleared: true,
        projected: false,
    });
    assert_eq!(balance::entry_effect(2, &transfer), d("25"));
}

#[tokio::test]
async fn worked_example_cash_account() {
    // Account "Cash", starting balance 100 EUR; expense 30 on day 2; income
    // 50 on day 5. Running balances 100 / 70 / 120; net worth at day 5 = 120.
    let store = Store::in_memory();
    let cash = store
        .accounts
        .create(Account {
            name: "Cash".to_string(),
            tag: "bank".to_string(),
            color: "#4E79A7".to_string(),
            currency: "EUR".to_string(),
            starting_balance: d("100"),
            order: 0,
        })
        .await;
    let reconciler = Reconciler::new(store.entries.clone());
    reconciler.reconcile(&store.accounts.list().await).await;

    store
        .entries
        .create(Entry::Expense(movement(cash.id, "30", day(2))))
        .await;
    store
        .entries
        .create(Entry::Income(movement(cash.id, "50", day(5))))
        .await;

    let entries = store.entries.list().await;
    let running = balance::running_balance(cash.id, &entries);
    let totals: Vec<Decimal> = running.iter().map(|(_, t)| *t).collect();
    assert_eq!(totals, vec![d("100"), d("70"), d("120")]);

    let accounts = store.accounts.list().await;
    let worth = balance::net_worth(&accounts, &entries, Some(day(5)), Basis::Settled);
    assert_eq!(worth, d("120"));
}

#[tokio::test]
async fn balance_formula_identity() {
    // starting + income - expense - out + in, synthetic included in the fold.
    let store = Store::in_memory();
    let a = store
        .accounts
        .create(Account {
            name: "A".to_string(),
            tag: "bank".to_string(),
            color: "#F28E2B".to_string(),
            currency: "EUR".to_string(),
            starting_balance: d("-20"),
            order: 0,
        })
        .await;
    let b = store
        .accounts
        .create(Account {
            name: "B".to_string(),
            tag: "bank".to_string(),
            color: "#E15759".to_string(),
            currency: "EUR".to_string(),
            starting_balance: d("5"),
            order: 1,
        })
        .await;
    let reconciler = Reconciler::new(store.entries.clone());
    reconciler.reconcile(&store.accounts.list().await).await;

    store
        .entries
        .create(Entry::Income(movement(a.id, "100", day(3))))
        .await;
    store
        .entries
        .create(Entry::Expense(movement(a.id, "40", day(4))))
        .await;
    store
        .entries
        .create(Entry::Transfer(Transfer {
            from_account: a.id,
            to_account: b.id,
            amount: d("15"),
            dest_amount: None,
            date: day(6),
            notes: String::new(),
            cleared: true,
            projected: false,
        }))
        .await;

    let entries = store.entries.list().await;
    let accounts = store.accounts.list().await;

    // Fold from zero over everything (synthetic included) matches the
    // point-in-time formula that folds user entries onto the start balance.
    for acc in &accounts {
        let fold = balance::running_balance(acc.id, &entries)
            .last()
            .map(|(_, t)| *t)
            .unwrap();
        let formula = balance::account_balance(acc, &entries, None, Basis::Forecast);
        assert_eq!(fold, formula, "account {}", acc.data.name);
    }
    assert_eq!(
        balance::account_balance(&accounts[0], &entries, None, Basis::Settled),
        d("25")
    );
    assert_eq!(
        balance::account_balance(&accounts[1], &entries, None, Basis::Settled),
        d("20")
    );
}

#[tokio::test]
async fn settled_basis_skips_projected_entries() {
    let store = Store::in_memory();
    let acc = store
        .accounts
        .create(Account {
            name: "A".to_string(),
            tag: "bank".to_string(),
            color: "#59A14F".to_string(),
            currency: "EUR".to_string(),
            starting_balance: Decimal::ZERO,
            order: 0,
        })
        .await;
    store
        .entries
        .create(Entry::Income(movement(acc.id, "10", day(1))))
        .await;
    let mut planned = movement(acc.id, "90", day(2));
    planned.projected = true;
    store.entries.create(Entry::Income(planned)).await;

    let entries = store.entries.list().await;
    let accounts = store.accounts.list().await;
    assert_eq!(
        balance::account_balance(&accounts[0], &entries, None, Basis::Settled),
        d("10")
    );
    assert_eq!(
        balance::account_balance(&accounts[0], &entries, None, Basis::Forecast),
        d("100")
    );
}
