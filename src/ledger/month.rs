use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::LedgerError;

use super::category::CategoryRegistry;
use super::transaction::{Transaction, TransactionKind};

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const MAX_YEAR: i32 = 9999;

/// Calendar month identifier. `month` is zero-based (0 = January).
///
/// Ordering is chronological and matches the ordering of the `YYYY-MM`
/// string form, so a `BTreeMap<MonthKey, _>` iterates oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if month > 11 {
            return Err(LedgerError::InvalidMonth(format!(
                "month {month} is outside 0..=11"
            )));
        }
        if !(0..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::InvalidMonth(format!(
                "year {year} must have four digits"
            )));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Moves by `delta` months, wrapping the year at December/January.
    ///
    /// Saturates at `0000-00` and `9999-11` so the result always parses back.
    pub fn offset(&self, delta: i32) -> Self {
        let absolute = (self.year * 12 + self.month as i32)
            .saturating_add(delta)
            .clamp(0, MAX_YEAR * 12 + 11);
        Self {
            year: absolute.div_euclid(12),
            month: absolute.rem_euclid(12) as u32,
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }

    /// Display label such as `Março 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Compact chart label such as `Março/2024`.
    pub fn short_label(&self) -> String {
        format!("{}/{}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidMonth(format!("malformed month key `{value}`"));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Budget and spend for one category inside one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySpend {
    pub name: String,
    pub budget: Decimal,
    pub spent: Decimal,
}

/// Aggregated totals for a single month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthRecord {
    pub key: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    /// Per-category entries in the order they were added.
    pub categories: Vec<CategorySpend>,
}

impl MonthRecord {
    /// Seeds an empty month from the registry's current budgets.
    pub fn seeded(key: MonthKey, registry: &CategoryRegistry) -> Self {
        let categories = registry
            .iter()
            .map(|category| CategorySpend {
                name: category.name.clone(),
                budget: category.budget,
                spent: Decimal::ZERO,
            })
            .collect();
        Self {
            key,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
            balance: Decimal::ZERO,
            categories,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategorySpend> {
        self.categories.iter().find(|entry| entry.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut CategorySpend> {
        self.categories.iter_mut().find(|entry| entry.name == name)
    }

    pub fn total_budget(&self) -> Decimal {
        self.categories.iter().map(|entry| entry.budget).sum()
    }

    /// Adds one transaction's contribution to the totals.
    ///
    /// Returns `false` when an expense names a category this month does not
    /// track; the totals still move but no category spend is recorded.
    pub fn apply(&mut self, transaction: &Transaction) -> bool {
        let amount = transaction.amount;
        let counted = match transaction.kind {
            TransactionKind::Income => {
                self.income += amount;
                true
            }
            TransactionKind::Expense => {
                self.expenses += amount;
                match self.category_mut(&transaction.category) {
                    Some(entry) => {
                        entry.spent += amount;
                        true
                    }
                    None => false,
                }
            }
        };
        self.recompute_balance();
        counted
    }

    /// Exact inverse of [`MonthRecord::apply`]. Category spend is only taken
    /// back when the transaction is still marked as counted.
    pub fn reverse(&mut self, transaction: &Transaction) -> bool {
        let amount = transaction.amount;
        let reversed = match transaction.kind {
            TransactionKind::Income => {
                self.income -= amount;
                true
            }
            TransactionKind::Expense => {
                self.expenses -= amount;
                if !transaction.counted {
                    false
                } else {
                    match self.category_mut(&transaction.category) {
                        Some(entry) => {
                            entry.spent -= amount;
                            true
                        }
                        None => false,
                    }
                }
            }
        };
        self.recompute_balance();
        reversed
    }

    pub fn recompute_balance(&mut self) {
        self.balance = self.income - self.expenses;
    }
}

/// All month records, ordered chronologically by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LedgerStore {
    records: BTreeMap<MonthKey, MonthRecord>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.records.get(&key)
    }

    pub fn get_mut(&mut self, key: MonthKey) -> Option<&mut MonthRecord> {
        self.records.get_mut(&key)
    }

    /// Returns the record for `key`, creating it from the registry snapshot
    /// on first access. Later calls return the same record untouched.
    pub fn get_or_create(
        &mut self,
        key: MonthKey,
        registry: &CategoryRegistry,
    ) -> &mut MonthRecord {
        self.records.entry(key).or_insert_with(|| {
            tracing::debug!(month = %key, "Creating month record");
            MonthRecord::seeded(key, registry)
        })
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.records.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &MonthRecord> {
        self.records.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MonthRecord> {
        self.records.values_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.records.keys().copied()
    }

    /// Adds a zero-spend entry for a new category to every existing month.
    pub fn propagate_new_category(&mut self, name: &str, budget: Decimal) {
        for record in self.records.values_mut() {
            match record.category_mut(name) {
                Some(entry) => entry.budget = budget,
                None => record.categories.push(CategorySpend {
                    name: name.to_string(),
                    budget,
                    spent: Decimal::ZERO,
                }),
            }
        }
    }

    /// Drops the category from every month, discarding its historical spend.
    pub fn propagate_removed_category(&mut self, name: &str) {
        for record in self.records.values_mut() {
            record.categories.retain(|entry| entry.name != name);
        }
    }

    /// Sets the budget of a category in every month that tracks it.
    pub fn propagate_budget(&mut self, name: &str, budget: Decimal) {
        for record in self.records.values_mut() {
            if let Some(entry) = record.category_mut(name) {
                entry.budget = budget;
            }
        }
    }

    pub(crate) fn normalize(&mut self) {
        for (key, record) in self.records.iter_mut() {
            record.key = *key;
            record.recompute_balance();
        }
    }
}
