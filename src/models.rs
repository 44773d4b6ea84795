// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved category label carried by the per-account starting-balance entry.
pub const SYNTHETIC_CATEGORY: &str = "SYSTEM - Starting Balance";

/// Sentinel date for synthetic starting-balance entries.
pub static SYNTHETIC_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date"));

/// Fixed palette used when auto-provisioning accounts and categories.
/// Index = current record count modulo palette length.
pub const PALETTE: [&str; 10] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
    "#9C755F", "#BAB0AC",
];

pub fn palette_color(index: usize) -> String {
    PALETTE[index % PALETTE.len()].to_string()
}

pub fn is_synthetic_label(label: &str) -> bool {
    let l = label.trim();
    l.eq_ignore_ascii_case(SYNTHETIC_CATEGORY) || l.eq_ignore_ascii_case("starting balance")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub tag: String,
    pub color: String,
    pub currency: String,
    pub starting_balance: Decimal,
    pub order: i64,
}

impl Account {
    pub fn provisioned(name: &str, index: usize) -> Self {
        Account {
            name: name.to_string(),
            tag: "bank".to_string(),
            color: palette_color(index),
            currency: "EUR".to_string(),
            starting_balance: Decimal::ZERO,
            order: index as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(CategoryKind::Expense),
            "income" => Some(CategoryKind::Income),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
    pub color: String,
    pub order: i64,
}

/// Fields shared by income and expense entries. Amount is never negative;
/// the sign is implied by the enclosing `Entry` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub account: i64,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: String,
    pub date: NaiveDate,
    pub notes: String,
    pub cleared: bool,
    pub projected: bool,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_account: i64,
    pub to_account: i64,
    pub amount: Decimal,
    /// Amount credited to the destination account, in its own currency.
    /// Required when the two accounts use different currencies.
    pub dest_amount: Option<Decimal>,
    pub date: NaiveDate,
    pub notes: String,
    pub cleared: bool,
    pub projected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Income(Movement),
    Expense(Movement),
    Transfer(Transfer),
}

impl Entry {
    pub fn date(&self) -> NaiveDate {
        match self {
            Entry::Income(m) | Entry::Expense(m) => m.date,
            Entry::Transfer(t) => t.date,
        }
    }

    pub fn cleared(&self) -> bool {
        match self {
            Entry::Income(m) | Entry::Expense(m) => m.cleared,
            Entry::Transfer(t) => t.cleared,
        }
    }

    pub fn projected(&self) -> bool {
        match self {
            Entry::Income(m) | Entry::Expense(m) => m.projected,
            Entry::Transfer(t) => t.projected,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Entry::Income(_) => "income",
            Entry::Expense(_) => "expense",
            Entry::Transfer(_) => "transfer",
        }
    }

    pub fn movement(&self) -> Option<&Movement> {
        match self {
            Entry::Income(m) | Entry::Expense(m) => Some(m),
            Entry::Transfer(_) => None,
        }
    }

    /// True if the entry credits or debits the given account.
    pub fn touches(&self, account: i64) -> bool {
        match self {
            Entry::Income(m) | Entry::Expense(m) => m.account == account,
            Entry::Transfer(t) => t.from_account == account || t.to_account == account,
        }
    }

    /// True for system-generated starting-balance entries.
    pub fn is_synthetic(&self) -> bool {
        match self {
            Entry::Income(m) | Entry::Expense(m) => is_synthetic_label(&m.category),
            Entry::Transfer(_) => false,
        }
    }
}

/// Singleton user preference record, created lazily on first persisted write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub number_format: String,
    pub main_currency: String,
    pub fx_provider: String,
    pub account_order: Vec<i64>,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            number_format: "1,234.56".to_string(),
            main_currency: "EUR".to_string(),
            fx_provider: "none".to_string(),
            account_order: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub number_format: Option<String>,
    pub main_currency: Option<String>,
    pub fx_provider: Option<String>,
    pub account_order: Option<Vec<i64>>,
}

impl UserSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.number_format {
            self.number_format = v;
        }
        if let Some(v) = patch.main_currency {
            self.main_currency = v;
        }
        if let Some(v) = patch.fx_provider {
            self.fx_provider = v;
        }
        if let Some(v) = patch.account_order {
            self.account_order = v;
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount '{0}' must not be negative")]
    NegativeAmount(Decimal),
    #[error("Transfer source and destination accounts must differ")]
    SameAccountTransfer,
    #[error("Transfer between '{from}' and '{to}' needs a destination amount ({from_ccy} != {to_ccy})")]
    MissingDestAmount {
        from: String,
        to: String,
        from_ccy: String,
        to_ccy: String,
    },
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),
    #[error("Account '{0}' still has ledger entries")]
    AccountInUse(String),
    #[error("Category '{0}' is still used by ledger entries")]
    CategoryInUse(String),
}

pub fn validate_movement(m: &Movement) -> Result<(), ValidationError> {
    if m.amount.is_sign_negative() {
        return Err(ValidationError::NegativeAmount(m.amount));
    }
    Ok(())
}

/// Validates a transfer against the two resolved accounts, checking the
/// distinct-account invariant and the cross-currency destination amount.
pub fn validate_transfer(t: &Transfer, from: &Account, to: &Account) -> Result<(), ValidationError> {
    if t.from_account == t.to_account {
        return Err(ValidationError::SameAccountTransfer);
    }
    if t.amount.is_sign_negative() {
        return Err(ValidationError::NegativeAmount(t.amount));
    }
    if !from.currency.eq_ignore_ascii_case(&to.currency) && t.dest_amount.is_none() {
        return Err(ValidationError::MissingDestAmount {
            from: from.name.clone(),
            to: to.name.clone(),
            from_ccy: from.currency.clone(),
            to_ccy: to.currency.clone(),
        });
    }
    Ok(())
}
