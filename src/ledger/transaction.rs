use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::month::MonthKey;

/// Time-based transaction identifier, strictly increasing within a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(TransactionId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Receita",
            TransactionKind::Expense => "Despesa",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(LedgerError::InvalidKind(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            ))),
        }
    }
}

/// A single recorded income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub category: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    /// Copy of the owning month record's key.
    pub month: MonthKey,
    pub date: DateTime<Utc>,
    /// Whether the amount currently sits in its category's `spent`.
    ///
    /// False when the category was not tracked at the time, or has been
    /// removed since; reversal then leaves category spend alone.
    #[serde(default = "Transaction::counted_default")]
    pub counted: bool,
}

impl Transaction {
    fn counted_default() -> bool {
        true
    }
}

/// Append/remove-only list of transactions in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier for a transaction created at `now`.
    ///
    /// Uses the millisecond timestamp, bumped past the highest id already in
    /// the log so ids stay unique when several land in the same millisecond.
    pub fn next_id(&self, now: DateTime<Utc>) -> TransactionId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let floor = self
            .transactions
            .iter()
            .map(|txn| txn.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        TransactionId(millis.max(floor))
    }

    pub(crate) fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub(crate) fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Marks every expense filed under `category` as no longer counted.
    /// Returns how many transactions changed.
    pub(crate) fn detach_category(&mut self, category: &str) -> usize {
        let mut detached = 0;
        for txn in self.transactions.iter_mut().filter(|txn| {
            txn.counted && txn.kind == TransactionKind::Expense && txn.category == category
        }) {
            txn.counted = false;
            detached += 1;
        }
        detached
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions of one month, most recent first. Always a fresh copy.
    pub fn list_for_month(&self, month: MonthKey) -> Vec<Transaction> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|txn| txn.month == month)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn txn(id: u64, month: MonthKey, second: u32) -> Transaction {
        Transaction {
            id: TransactionId(id),
            category: "OUTROS".into(),
            amount: dec!(10),
            kind: TransactionKind::Expense,
            month,
            date: Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, second).unwrap(),
            counted: true,
        }
    }

    #[test]
    fn next_id_is_strictly_increasing_within_same_millisecond() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let mut log = TransactionLog::new();
        let first = log.next_id(now);
        log.push(txn(first.0, MonthKey::new(2024, 3).unwrap(), 0));
        let second = log.next_id(now);
        assert!(second > first);
    }

    #[test]
    fn next_id_does_not_overflow_at_max() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let mut log = TransactionLog::new();
        log.push(txn(u64::MAX, MonthKey::new(2024, 3).unwrap(), 0));
        assert_eq!(log.next_id(now), TransactionId(u64::MAX));
    }

    #[test]
    fn detach_category_only_touches_matching_expenses() {
        let april = MonthKey::new(2024, 3).unwrap();
        let mut log = TransactionLog::new();
        log.push(txn(1, april, 1));
        let mut other = txn(2, april, 2);
        other.category = "LAZER".into();
        log.push(other);

        assert_eq!(log.detach_category("OUTROS"), 1);
        assert!(!log.get(TransactionId(1)).unwrap().counted);
        assert!(log.get(TransactionId(2)).unwrap().counted);
        assert_eq!(log.detach_category("OUTROS"), 0);
    }

    #[test]
    fn snapshot_without_counted_flag_defaults_to_counted() {
        let json = r#"{"id":5,"category":"LAZER","amount":"12.50","kind":"expense","month":"2024-03","date":"2024-04-01T12:00:00Z"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.counted);
        assert_eq!(txn.amount, dec!(12.5));
    }

    #[test]
    fn list_for_month_filters_and_sorts_newest_first() {
        let april = MonthKey::new(2024, 3).unwrap();
        let may = MonthKey::new(2024, 4).unwrap();
        let mut log = TransactionLog::new();
        log.push(txn(1, april, 1));
        log.push(txn(2, may, 2));
        log.push(txn(3, april, 3));

        let ids: Vec<u64> = log.list_for_month(april).iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            "Income".parse::<TransactionKind>().unwrap(),
            TransactionKind::Income
        );
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
