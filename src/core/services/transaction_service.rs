//! Business logic helpers for recording and removing transactions.

use rust_decimal::Decimal;

use crate::core::services::{within_money_range, ServiceResult, MAX_MONEY_UNITS};
use crate::core::time::Clock;
use crate::errors::LedgerError;
use crate::ledger::{normalize_name, Ledger, MonthKey, Transaction, TransactionId, TransactionKind};

/// Input for [`TransactionService::add`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub category: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub month: MonthKey,
}

impl NewTransaction {
    pub fn expense(category: impl Into<String>, amount: Decimal, month: MonthKey) -> Self {
        Self {
            category: category.into(),
            amount,
            kind: TransactionKind::Expense,
            month,
        }
    }

    pub fn income(category: impl Into<String>, amount: Decimal, month: MonthKey) -> Self {
        Self {
            category: category.into(),
            amount,
            kind: TransactionKind::Income,
            month,
        }
    }
}

/// Keeps the transaction log and the month totals in step.
pub struct TransactionService;

impl TransactionService {
    /// Records a transaction and folds it into its month record.
    pub fn add(
        ledger: &mut Ledger,
        clock: &dyn Clock,
        input: NewTransaction,
    ) -> ServiceResult<Transaction> {
        if !within_money_range(input.amount) {
            tracing::warn!(amount = %input.amount, "Rejected transaction amount");
            return Err(LedgerError::InvalidAmount(format!(
                "{} must be greater than zero and at most {MAX_MONEY_UNITS}",
                input.amount
            )));
        }

        let now = clock.now();
        let mut transaction = Transaction {
            id: ledger.transactions.next_id(now),
            category: normalize_name(&input.category),
            amount: input.amount,
            kind: input.kind,
            month: input.month,
            date: now,
            counted: true,
        };

        let record = ledger.months.get_or_create(input.month, &ledger.categories);
        transaction.counted = record.apply(&transaction);
        if !transaction.counted {
            tracing::debug!(
                category = %transaction.category,
                month = %input.month,
                "Category not tracked in month; spend not recorded"
            );
        }
        ledger.transactions.push(transaction.clone());
        tracing::info!(
            id = %transaction.id,
            kind = ?transaction.kind,
            amount = %transaction.amount,
            month = %transaction.month,
            "Transaction added"
        );
        Ok(transaction)
    }

    /// Removes a transaction and reverses exactly what [`TransactionService::add`] applied.
    ///
    /// An unknown id leaves the ledger untouched and reports `TransactionNotFound`.
    pub fn remove(ledger: &mut Ledger, id: TransactionId) -> ServiceResult<Transaction> {
        let transaction = ledger
            .transactions
            .remove(id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        match ledger.months.get_mut(transaction.month) {
            Some(record) => {
                record.reverse(&transaction);
            }
            None => tracing::warn!(
                id = %id,
                month = %transaction.month,
                "Month record missing while removing transaction"
            ),
        }
        tracing::info!(id = %id, "Transaction removed");
        Ok(transaction)
    }

    /// Transactions recorded against `month`, most recent first.
    pub fn list_for_month(ledger: &Ledger, month: MonthKey) -> Vec<Transaction> {
        ledger.transactions.list_for_month(month)
    }
}
