pub mod analytics_service;
pub mod category_service;
pub mod transaction_service;

pub use analytics_service::{
    AlertSeverity, AnalyticsService, BudgetProgress, CategoryAlert, Kpis, Prediction,
    ProgressLevel, SpendingSlice, TrendPoint, NO_DATA_MESSAGE,
};
pub use category_service::CategoryService;
pub use transaction_service::{NewTransaction, TransactionService};

use rust_decimal::Decimal;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

/// Largest amount or budget accepted, in whole currency units.
pub const MAX_MONEY_UNITS: i64 = 1_000_000_000_000;

pub(crate) fn within_money_range(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::from(MAX_MONEY_UNITS)
}
