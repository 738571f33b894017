use rust_decimal::Decimal;

use crate::errors::LedgerError;
use crate::ledger::{normalize_name, Category, Ledger};

use super::{within_money_range, ServiceResult, MAX_MONEY_UNITS};

/// Category commands. Every change to the registry is pushed to all existing
/// month records so that past months keep the same category set.
pub struct CategoryService;

impl CategoryService {
    /// Registers a custom category and gives every existing month a zero-spend entry for it.
    pub fn add(ledger: &mut Ledger, name: &str, budget: Decimal) -> ServiceResult<Category> {
        let normalized = Self::validate_name(name)?;
        Self::validate_budget(budget)?;
        if ledger.categories.contains(&normalized) {
            tracing::warn!(category = %normalized, "Rejected duplicate category");
            return Err(LedgerError::DuplicateCategory(normalized));
        }

        let category = Category::new(&normalized, budget);
        ledger.categories.push(category.clone());
        ledger.months.propagate_new_category(&category.name, budget);
        tracing::info!(category = %category.name, budget = %budget, "Category added");
        Ok(category)
    }

    /// Removes a custom category from the registry and from every month.
    ///
    /// Historical spend recorded under the category is discarded with it, and
    /// its expenses are marked as no longer counted so that removing one later
    /// cannot draw down a re-added category of the same name.
    pub fn remove(ledger: &mut Ledger, name: &str) -> ServiceResult<Category> {
        let normalized = normalize_name(name);
        let category = ledger
            .categories
            .get(&normalized)
            .ok_or_else(|| LedgerError::CategoryNotFound(normalized.clone()))?;
        if category.is_default {
            tracing::warn!(category = %normalized, "Rejected removal of default category");
            return Err(LedgerError::DefaultCategoryProtected(normalized));
        }

        let removed = ledger
            .categories
            .remove(&normalized)
            .ok_or_else(|| LedgerError::CategoryNotFound(normalized.clone()))?;
        ledger.months.propagate_removed_category(&removed.name);
        let detached = ledger.transactions.detach_category(&removed.name);
        tracing::info!(category = %removed.name, detached, "Category removed");
        Ok(removed)
    }

    /// Changes a category budget in the registry and in every month; spend is untouched.
    pub fn update_budget(ledger: &mut Ledger, name: &str, budget: Decimal) -> ServiceResult<()> {
        Self::validate_budget(budget)?;
        let normalized = normalize_name(name);
        ledger
            .categories
            .set_budget(&normalized, budget)
            .ok_or_else(|| LedgerError::CategoryNotFound(normalized.clone()))?;
        ledger.months.propagate_budget(&normalized, budget);
        tracing::info!(category = %normalized, budget = %budget, "Category budget updated");
        Ok(())
    }

    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        ledger.categories.iter().collect()
    }

    fn validate_name(candidate: &str) -> ServiceResult<String> {
        let normalized = normalize_name(candidate);
        if normalized.is_empty() {
            return Err(LedgerError::InvalidName("name must not be empty".into()));
        }
        Ok(normalized)
    }

    fn validate_budget(budget: Decimal) -> ServiceResult<()> {
        if within_money_range(budget) {
            Ok(())
        } else {
            Err(LedgerError::InvalidBudget(format!(
                "{budget} must be greater than zero and at most {MAX_MONEY_UNITS}"
            )))
        }
    }
}
