use thiserror::Error;

use crate::ledger::TransactionId;

/// Error type that captures ledger command and collaborator failures.
///
/// Every validation variant is raised before any state is touched, so a
/// failed command always leaves the ledger exactly as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid transaction type: {0}")]
    InvalidKind(String),
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),
    #[error("Invalid category name: {0}")]
    InvalidName(String),
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Category `{0}` is a default category and cannot be removed")]
    DefaultCategoryProtected(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("No data available: add transactions to generate analytics")]
    NoData,
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Navigation limit reached: {0}")]
    NavigationLimit(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// True for the "nothing to act on" family (missing transaction or category).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::TransactionNotFound(_) | LedgerError::CategoryNotFound(_)
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
