//! Ledger domain models: categories, month records, transactions and the
//! aggregate that owns them.

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod month;
pub mod transaction;

pub use category::{normalize_name, Category, CategoryRegistry, DEFAULT_CATEGORIES};
pub use ledger::{Direction, Ledger, LedgerSnapshot, NavigationBounds, CURRENT_SCHEMA_VERSION};
pub use month::{CategorySpend, LedgerStore, MonthKey, MonthRecord, MONTH_NAMES};
pub use transaction::{Transaction, TransactionId, TransactionKind, TransactionLog};
