use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Direction of a transaction, derived from the sign of the raw statement
/// value: non-negative amounts are income, negative amounts are expenses.
/// The magnitude lives in [`Money`]; once the kind is set the sign is never
/// needed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind: '{other}'")),
        }
    }
}

/// A fully classified transaction, ready to be persisted. Exists only for
/// the duration of one import or create call; durable identity is assigned
/// by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative magnitude after sign extraction.
    pub amount: Money,
    pub kind: TransactionKind,
    /// Never empty; assigned by the classifier or typed by the user.
    pub category: String,
}
