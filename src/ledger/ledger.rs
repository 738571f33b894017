use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

use super::{
    category::CategoryRegistry,
    month::{LedgerStore, MonthKey, MonthRecord},
    transaction::{Transaction, TransactionLog},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// How far ahead of today the current month may be moved.
const MONTHS_AHEAD_LIMIT: i32 = 6;
/// How many whole years back (counted from January) the current month may go.
const YEARS_BACK_LIMIT: i32 = 2;

/// Application state: category template, month records, transactions and
/// the current/view month pointers.
///
/// The ledger owns every piece of mutable state; commands in
/// [`crate::core::services`] take it by `&mut` and queries by `&`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub(crate) categories: CategoryRegistry,
    pub(crate) months: LedgerStore,
    pub(crate) transactions: TransactionLog,
    current: MonthKey,
    view: MonthKey,
}

/// Serializable copy of the whole ledger, stamped with the time it was taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    #[serde(default = "LedgerSnapshot::schema_version_default")]
    pub schema_version: u8,
    pub months: LedgerStore,
    pub transactions: TransactionLog,
    pub categories: CategoryRegistry,
    pub current: MonthKey,
    pub view: MonthKey,
    pub saved_at: DateTime<Utc>,
}

impl LedgerSnapshot {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

/// Navigation step for the current and view month pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn delta(self) -> i32 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

/// Earliest and latest months the current pointer may rest on, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBounds {
    pub earliest: MonthKey,
    pub latest: MonthKey,
}

impl NavigationBounds {
    pub fn around(today: NaiveDate) -> Self {
        let this_month = MonthKey::from_date(today);
        let earliest = this_month.offset(-(this_month.month() as i32) - 12 * YEARS_BACK_LIMIT);
        Self {
            earliest,
            latest: this_month.offset(MONTHS_AHEAD_LIMIT),
        }
    }

    pub fn can_go_back(&self, from: MonthKey) -> bool {
        from > self.earliest
    }

    pub fn can_go_forward(&self, from: MonthKey) -> bool {
        from < self.latest
    }
}

impl Ledger {
    /// Fresh ledger with the default categories, pointing at today's month.
    pub fn new(today: NaiveDate) -> Self {
        Self::with_registry(CategoryRegistry::with_defaults(), today)
    }

    pub fn with_registry(categories: CategoryRegistry, today: NaiveDate) -> Self {
        let current = MonthKey::from_date(today);
        let mut ledger = Self {
            categories,
            months: LedgerStore::new(),
            transactions: TransactionLog::new(),
            current,
            view: current,
        };
        ledger.ensure_month(current);
        ledger
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn months(&self) -> &LedgerStore {
        &self.months
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn current_month(&self) -> MonthKey {
        self.current
    }

    pub fn view_month(&self) -> MonthKey {
        self.view
    }

    /// Read-only lookup; does not create the month.
    pub fn month_record(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.months.get(key)
    }

    /// Lazily creates the month from the current category template.
    pub fn ensure_month(&mut self, key: MonthKey) -> &mut MonthRecord {
        self.months.get_or_create(key, &self.categories)
    }

    pub fn current_record(&mut self) -> &MonthRecord {
        let key = self.current;
        self.ensure_month(key)
    }

    pub fn view_record(&mut self) -> &MonthRecord {
        let key = self.view;
        self.ensure_month(key)
    }

    /// Transactions of `key`, newest first.
    pub fn list_transactions(&self, key: MonthKey) -> Vec<Transaction> {
        self.transactions.list_for_month(key)
    }

    /// Moves the current month one step, refusing to leave the navigation window.
    pub fn step_current(
        &mut self,
        direction: Direction,
        today: NaiveDate,
    ) -> Result<MonthKey, LedgerError> {
        let bounds = NavigationBounds::around(today);
        let allowed = match direction {
            Direction::Previous => bounds.can_go_back(self.current),
            Direction::Next => bounds.can_go_forward(self.current),
        };
        if !allowed {
            return Err(LedgerError::NavigationLimit(format!(
                "cannot move past {}",
                self.current.label()
            )));
        }
        self.current = self.current.offset(direction.delta());
        let key = self.current;
        self.ensure_month(key);
        Ok(key)
    }

    /// Moves the view month one step; the view is not bounded.
    pub fn step_view(&mut self, direction: Direction) -> MonthKey {
        self.view = self.view.offset(direction.delta());
        let key = self.view;
        self.ensure_month(key);
        key
    }

    /// Captures the whole state for a storage collaborator.
    pub fn serialize_state(&self, now: DateTime<Utc>) -> LedgerSnapshot {
        LedgerSnapshot {
            schema_version: CURRENT_SCHEMA_VERSION,
            months: self.months.clone(),
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            current: self.current,
            view: self.view,
            saved_at: now,
        }
    }

    /// Replaces the state with a previously captured snapshot.
    ///
    /// Balances are recomputed from income and expenses and the current and
    /// view months are materialised, so a hand-edited snapshot cannot break
    /// the record invariants.
    pub fn load_state(&mut self, snapshot: LedgerSnapshot) -> Result<(), LedgerError> {
        if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "snapshot schema version {} is newer than supported version {}",
                snapshot.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let LedgerSnapshot {
            mut months,
            transactions,
            categories,
            current,
            view,
            ..
        } = snapshot;
        months.normalize();
        self.categories = categories;
        self.months = months;
        self.transactions = transactions;
        self.current = current;
        self.view = view;
        self.ensure_month(current);
        self.ensure_month(view);
        Ok(())
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot, today: NaiveDate) -> Result<Self, LedgerError> {
        let mut ledger = Self::with_registry(CategoryRegistry::new(), today);
        ledger.load_state(snapshot)?;
        Ok(ledger)
    }
}
