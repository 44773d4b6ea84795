// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerline::import::{import_csv, parse_csv};
use ledgerline::models::{CategoryKind, Entry, PALETTE};
use ledgerline::store::Store;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

const HEADER: &str = "Type,Date,Amount,Account,Category,Subcategory,Notes,Cleared,Projected";

#[test]
fn parser_handles_quoted_commas_and_doubled_quotes() {
    let rows = parse_csv("a,\"b,c\",\"say \"\"hi\"\"\"\nd,e,f");
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), "b,c".to_string(), "say \"hi\"".to_string()],
            vec!["d".to_string(), "e".to_string(), "f".to_string()],
        ]
    );
}

#[test]
fn parser_handles_embedded_newlines_and_crlf() {
    let rows = parse_csv("a,\"line1\nline2\",c\r\nd,e,f\r\n");
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), "line1\nline2".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string(), "f".to_string()],
        ]
    );
}

#[test]
fn parser_keeps_empty_fields_and_no_trailing_phantom_row() {
    let rows = parse_csv("a,,c\n");
    assert_eq!(rows, vec![vec!["a".to_string(), String::new(), "c".to_string()]]);
}

#[test]
fn parser_keeps_a_final_quoted_empty_field_at_eof() {
    let rows = parse_csv("a,b\n\"\"");
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec![String::new()],
        ]
    );
    assert_eq!(parse_csv("\"\""), vec![vec![String::new()]]);
}

#[tokio::test]
async fn transfer_row_auto_creates_destination_account() {
    let store = Store::in_memory();
    let text = format!(
        "{}\ntransfer,2026-01-01,200.75,Bank,Savings,,Monthly savings,,",
        HEADER
    );
    let report = import_csv(&store, &text, |_| {}).await;

    assert_eq!(report.imported, 1);
    assert!(report.log.iter().any(|l| l.contains("Created account 'Bank'")));
    assert!(report.log.iter().any(|l| l.contains("Created account 'Savings'")));

    let accounts = store.accounts.list().await;
    let bank = accounts.iter().find(|a| a.data.name == "Bank").unwrap();
    let savings = accounts.iter().find(|a| a.data.name == "Savings").unwrap();
    assert_eq!(bank.data.starting_balance, Decimal::ZERO);
    assert_eq!(bank.data.tag, "bank");

    let entries = store.entries.list().await;
    assert_eq!(entries.len(), 1);
    let Entry::Transfer(t) = &entries[0].data else {
        panic!("expected transfer");
    };
    assert_eq!(t.from_account, bank.id);
    assert_eq!(t.to_account, savings.id);
    assert_eq!(t.amount, d("200.75"));
    assert_eq!(t.notes, "Monthly savings");
    assert!(!t.cleared);
    assert!(!t.projected);
}

#[tokio::test]
async fn provisioned_colors_follow_the_palette() {
    let store = Store::in_memory();
    let text = format!(
        "{}\nexpense,2026-01-02,5,First,Food,,,yes,\nincome,2026-01-03,7,Second,Salary,,,yes,",
        HEADER
    );
    import_csv(&store, &text, |_| {}).await;
    let accounts = store.accounts.list().await;
    assert_eq!(accounts[0].data.color, PALETTE[0]);
    assert_eq!(accounts[1].data.color, PALETTE[1]);
    assert_eq!(accounts[0].data.order, 0);
    assert_eq!(accounts[1].data.order, 1);
}

#[tokio::test]
async fn categories_are_reused_case_insensitively_per_kind() {
    let store = Store::in_memory();
    let text = format!(
        "{}\nexpense,2026-01-02,5,Bank,Food,,,yes,\nexpense,2026-01-03,6,Bank,food,,,yes,\nincome,2026-01-04,7,Bank,Food,,,yes,",
        HEADER
    );
    let report = import_csv(&store, &text, |_| {}).await;
    assert_eq!(report.imported, 3);

    let cats = store.categories.list().await;
    assert_eq!(cats.len(), 2);
    assert!(cats.iter().any(|c| c.data.kind == CategoryKind::Expense));
    assert!(cats.iter().any(|c| c.data.kind == CategoryKind::Income));
}

#[tokio::test]
async fn bad_rows_are_logged_and_skipped_without_aborting() {
    let store = Store::in_memory();
    let text = format!(
        "{}\n\
         widget,2026-01-01,5,Bank,Food,,,yes,\n\
         expense,not-a-date,5,Bank,Food,,,yes,\n\
         expense,2026-01-01,five,Bank,Food,,,yes,\n\
         expense,2026-01-01,5,,Food,,,yes,\n\
         expense,2026-01-02,8,Bank,Food,,,yes,",
        HEADER
    );
    let report = import_csv(&store, &text, |_| {}).await;

    assert_eq!(report.imported, 1);
    assert!(report.log.iter().any(|l| l.starts_with("Row 1:") && l.contains("unknown type")));
    assert!(report.log.iter().any(|l| l.starts_with("Row 2:")));
    assert!(report.log.iter().any(|l| l.starts_with("Row 3:")));
    assert!(report.log.iter().any(|l| l.starts_with("Row 4:")));
    assert!(report.log.last().unwrap().contains("Imported 1 of 5 rows"));

    let entries = store.entries.list().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].data.movement().unwrap().amount, d("8"));
}

#[tokio::test]
async fn blank_rows_are_dropped_and_flags_parsed() {
    let store = Store::in_memory();
    let text = format!(
        "{}\n,,,,,,,,\nexpense,2026-01-02,5,Bank,Food,Lunch,\"with, comma\",yes,yes\n   ,,,,,,,,",
        HEADER
    );
    let report = import_csv(&store, &text, |_| {}).await;
    assert_eq!(report.imported, 1);

    let entries = store.entries.list().await;
    let m = entries[0].data.movement().unwrap();
    assert_eq!(m.subcategory, "Lunch");
    assert_eq!(m.notes, "with, comma");
    assert!(m.cleared);
    assert!(m.projected);
}

#[tokio::test]
async fn progress_is_reported_after_each_row() {
    let store = Store::in_memory();
    let text = format!(
        "{}\n\
         expense,2026-01-01,1,Bank,Food,,,yes,\n\
         expense,2026-01-02,2,Bank,Food,,,yes,\n\
         expense,2026-01-03,3,Bank,Food,,,yes,\n\
         bogus,2026-01-04,4,Bank,Food,,,yes,",
        HEADER
    );
    let mut seen = Vec::new();
    import_csv(&store, &text, |pct| seen.push(pct)).await;
    // Bad rows still advance the progress sequence.
    assert_eq!(seen, vec![25, 50, 75, 100]);
}

#[tokio::test]
async fn cross_currency_transfer_carries_amount_and_warns() {
    let store = Store::in_memory();
    store
        .accounts
        .create(ledgerline::models::Account {
            name: "Bank".to_string(),
            tag: "bank".to_string(),
            color: PALETTE[0].to_string(),
            currency: "EUR".to_string(),
            starting_balance: Decimal::ZERO,
            order: 0,
        })
        .await;
    store
        .accounts
        .create(ledgerline::models::Account {
            name: "USD Cash".to_string(),
            tag: "bank".to_string(),
            color: PALETTE[1].to_string(),
            currency: "USD".to_string(),
            starting_balance: Decimal::ZERO,
            order: 1,
        })
        .await;

    let text = format!("{}\ntransfer,2026-01-01,50,Bank,USD Cash,,,yes,", HEADER);
    let report = import_csv(&store, &text, |_| {}).await;
    assert_eq!(report.imported, 1);
    assert!(report.log.iter().any(|l| l.contains("crosses currencies")));

    let entries = store.entries.list().await;
    let Entry::Transfer(t) = &entries[0].data else {
        panic!("expected transfer");
    };
    assert_eq!(t.dest_amount, Some(d("50")));
}
