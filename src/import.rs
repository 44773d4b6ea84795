// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bulk CSV ingestion: RFC4180-style parsing, per-row decoding, and
//! auto-provisioning of referenced accounts and categories. Rows are
//! processed strictly in file order; a bad row is logged and skipped, never
//! aborting the batch.

use anyhow::{Result, anyhow};
use rust_decimal::Decimal;

use crate::models::{
    Account, Category, CategoryKind, Entry, Movement, Transfer, palette_color, validate_movement,
    validate_transfer,
};
use crate::store::{Record, Store};
use crate::utils::{parse_date, parse_decimal};

/// Column layout: type, date, amount, account, category-or-destination,
/// subcategory, notes, cleared, projected. For transfer rows the fifth
/// column is overloaded to carry the destination account name; the overload
/// is kept for format compatibility and isolated here in the decoder.
#[derive(Debug, PartialEq)]
enum RowData {
    Movement {
        kind: CategoryKind,
        date: chrono::NaiveDate,
        amount: Decimal,
        account: String,
        category: String,
        subcategory: String,
        notes: String,
        cleared: bool,
        projected: bool,
    },
    Transfer {
        date: chrono::NaiveDate,
        amount: Decimal,
        from: String,
        to: String,
        notes: String,
        cleared: bool,
        projected: bool,
    },
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub log: Vec<String>,
}

/// Hand-rolled RFC4180 parser: quoted fields may contain commas and
/// newlines, `""` inside a quoted field is a literal quote, and both `\n`
/// and `\r\n` terminate records.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // A final record of nothing but `""` leaves field and row empty at EOF;
    // the quote still marks it as a real field.
    let mut quoted = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                quoted = true;
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                quoted = false;
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() || quoted {
        row.push(field);
        rows.push(row);
    }
    rows
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn flag(row: &[String], idx: usize) -> bool {
    cell(row, idx).eq_ignore_ascii_case("yes")
}

fn decode_row(row: &[String]) -> Result<RowData> {
    let kind_raw = cell(row, 0);
    if kind_raw.is_empty() {
        return Err(anyhow!("missing type"));
    }
    let date_raw = cell(row, 1);
    if date_raw.is_empty() {
        return Err(anyhow!("missing date"));
    }
    let date = parse_date(&date_raw)?;
    let amount_raw = cell(row, 2);
    if amount_raw.is_empty() {
        return Err(anyhow!("missing amount"));
    }
    let amount = parse_decimal(&amount_raw)?;
    let account = cell(row, 3);
    if account.is_empty() {
        return Err(anyhow!("missing account name"));
    }
    let notes = cell(row, 6);
    let cleared = flag(row, 7);
    let projected = flag(row, 8);

    match kind_raw.to_ascii_lowercase().as_str() {
        "expense" | "income" => {
            let kind = if kind_raw.eq_ignore_ascii_case("income") {
                CategoryKind::Income
            } else {
                CategoryKind::Expense
            };
            Ok(RowData::Movement {
                kind,
                date,
                amount,
                account,
                category: cell(row, 4),
                subcategory: cell(row, 5),
                notes,
                cleared,
                projected,
            })
        }
        "transfer" => {
            let to = cell(row, 4);
            if to.is_empty() {
                return Err(anyhow!("missing destination account"));
            }
            Ok(RowData::Transfer {
                date,
                amount,
                from: account,
                to,
                notes,
                cleared,
                projected,
            })
        }
        other => Err(anyhow!("unknown type '{}'", other)),
    }
}

/// Resolves an account by exact name, creating it when absent. New accounts
/// get a zero starting balance, the "bank" tag, and a palette color indexed
/// by the current account count.
async fn resolve_account(
    store: &Store,
    name: &str,
    log: &mut Vec<String>,
) -> Record<Account> {
    let existing = store.accounts.list().await;
    if let Some(found) = existing.iter().find(|r| r.data.name == name) {
        return found.clone();
    }
    let created = store
        .accounts
        .create(Account::provisioned(name, existing.len()))
        .await;
    log.push(format!("Created account '{}'", name));
    created
}

/// Resolves a category by case-insensitive name within the kind's set,
/// creating it when absent with the same deterministic color/order scheme.
async fn resolve_category(store: &Store, name: &str, kind: CategoryKind, log: &mut Vec<String>) {
    if name.is_empty() {
        return;
    }
    let existing = store.categories.list().await;
    let found = existing
        .iter()
        .any(|r| r.data.kind == kind && r.data.name.eq_ignore_ascii_case(name));
    if found {
        return;
    }
    let count = existing.iter().filter(|r| r.data.kind == kind).count();
    store
        .categories
        .create(Category {
            name: name.to_string(),
            kind,
            color: palette_color(count),
            order: count as i64,
        })
        .await;
    log.push(format!("Created {} category '{}'", kind.label(), name));
}

async fn process_row(store: &Store, row: &[String], log: &mut Vec<String>) -> Result<()> {
    match decode_row(row)? {
        RowData::Movement {
            kind,
            date,
            amount,
            account,
            category,
            subcategory,
            notes,
            cleared,
            projected,
        } => {
            let acc = resolve_account(store, &account, log).await;
            resolve_category(store, &category, kind, log).await;
            let movement = Movement {
                account: acc.id,
                amount,
                category,
                subcategory,
                date,
                notes,
                cleared,
                projected,
                important: false,
            };
            validate_movement(&movement)?;
            let entry = match kind {
                CategoryKind::Income => Entry::Income(movement),
                CategoryKind::Expense => Entry::Expense(movement),
            };
            store.entries.create(entry).await;
        }
        RowData::Transfer {
            date,
            amount,
            from,
            to,
            notes,
            cleared,
            projected,
        } => {
            let src = resolve_account(store, &from, log).await;
            let dst = resolve_account(store, &to, log).await;
            let cross = !src.data.currency.eq_ignore_ascii_case(&dst.data.currency);
            if cross {
                log.push(format!(
                    "Warning: transfer '{}' -> '{}' crosses currencies ({} -> {}); amount carried unconverted",
                    from, to, src.data.currency, dst.data.currency
                ));
            }
            let transfer = Transfer {
                from_account: src.id,
                to_account: dst.id,
                amount,
                dest_amount: if cross { Some(amount) } else { None },
                date,
                notes,
                cleared,
                projected,
            };
            validate_transfer(&transfer, &src.data, &dst.data)?;
            store.entries.create(Entry::Transfer(transfer)).await;
        }
    }
    Ok(())
}

/// Runs the pipeline over a CSV payload. The first row is a discarded
/// header; blank rows are dropped. After each data row the rounded percent
/// complete is reported to `progress`.
pub async fn import_csv(
    store: &Store,
    text: &str,
    mut progress: impl FnMut(u32),
) -> ImportReport {
    let mut report = ImportReport::default();
    let rows: Vec<Vec<String>> = parse_csv(text)
        .into_iter()
        .skip(1)
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();
    let total = rows.len();

    for (i, row) in rows.iter().enumerate() {
        match process_row(store, row, &mut report.log).await {
            Ok(()) => report.imported += 1,
            Err(e) => report.log.push(format!("Row {}: skipped ({:#})", i + 1, e)),
        }
        let pct = (100.0 * (i + 1) as f64 / total as f64).round() as u32;
        progress(pct);
    }

    report
        .log
        .push(format!("Imported {} of {} rows", report.imported, total));
    report
}
