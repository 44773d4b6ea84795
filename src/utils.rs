// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{Account, Category, CategoryKind};
use crate::store::{Record, Store};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "" }
}

pub async fn account_by_name(store: &Store, name: &str) -> Result<Record<Account>> {
    store
        .accounts
        .list()
        .await
        .into_iter()
        .find(|r| r.data.name == name)
        .with_context(|| format!("Account '{}' not found", name))
}

pub async fn category_by_name(
    store: &Store,
    name: &str,
    kind: CategoryKind,
) -> Result<Record<Category>> {
    store
        .categories
        .list()
        .await
        .into_iter()
        .find(|r| r.data.kind == kind && r.data.name.eq_ignore_ascii_case(name))
        .with_context(|| format!("Category '{}' ({}) not found", name, kind.label()))
}
