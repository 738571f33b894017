//! Read-only analytics over the month records: averages, ratios, alerts and
//! chart series. Nothing here mutates the ledger.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::LedgerError;
use crate::ledger::{Ledger, LedgerStore, MonthKey, MonthRecord};

use super::ServiceResult;

/// Current spend above `average * ABOVE_AVERAGE_FACTOR` (1.2) is flagged as high.
pub const ABOVE_AVERAGE_FACTOR: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
/// Current spend below `average * BELOW_AVERAGE_FACTOR` (0.8) is flagged as low.
pub const BELOW_AVERAGE_FACTOR: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
/// Category usage (percent of budget) above which an alert is raised.
pub const ALERT_THRESHOLD: f64 = 80.0;
const MEDIUM_PROGRESS_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Prediction {
    AboveAverage,
    BelowAverage,
    Normal,
}

impl Prediction {
    pub fn message(&self) -> &'static str {
        match self {
            Prediction::AboveAverage => {
                "Spending is 20% above average. Review the categories with the largest swings."
            }
            Prediction::BelowAverage => {
                "Great control! Spending is 20% below average. Keep it up!"
            }
            Prediction::Normal => {
                "Spending is within the usual range. Keep an eye on the categories that vary most."
            }
        }
    }
}

pub const NO_DATA_MESSAGE: &str = "Add more data to generate predictions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSeverity {
    /// Usage above 80% and up to 100% of the budget.
    Warning,
    /// Usage above 100% of the budget.
    OverBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAlert {
    pub category: String,
    pub percentage: f64,
    pub spent: Decimal,
    pub budget: Decimal,
    pub severity: AlertSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressLevel {
    Low,
    Medium,
    High,
}

/// Budget usage of one category, ready for a progress bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub category: String,
    pub spent: Decimal,
    pub budget: Decimal,
    pub percentage: f64,
    /// Bar fill, capped at 100.
    pub fill: f64,
    pub level: ProgressLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSlice {
    pub category: String,
    pub spent: Decimal,
    pub budget: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: MonthKey,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub average_expense: Decimal,
    pub efficiency_rate: f64,
    pub savings_rate: f64,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// Mean of `expenses` over every month record, or `NoData` when there are none.
    pub fn average_monthly_expense(months: &LedgerStore) -> ServiceResult<Decimal> {
        if months.is_empty() {
            return Err(LedgerError::NoData);
        }
        let total: Decimal = months.iter().map(|record| record.expenses).sum();
        Ok(total / Decimal::from(months.len()))
    }

    pub fn prediction(current_expenses: Decimal, average: Decimal) -> Prediction {
        if current_expenses > average * ABOVE_AVERAGE_FACTOR {
            Prediction::AboveAverage
        } else if current_expenses < average * BELOW_AVERAGE_FACTOR {
            Prediction::BelowAverage
        } else {
            Prediction::Normal
        }
    }

    /// Classifies the current month against the average of all months.
    pub fn predict_current(ledger: &Ledger) -> ServiceResult<Prediction> {
        let average = Self::average_monthly_expense(ledger.months())?;
        let current = ledger
            .month_record(ledger.current_month())
            .map_or(Decimal::ZERO, |record| record.expenses);
        Ok(Self::prediction(current, average))
    }

    /// Share of the month's total budget left unspent, as a percentage floored at 0.
    pub fn efficiency_rate(record: &MonthRecord) -> f64 {
        let total_budget = record.total_budget();
        if total_budget <= Decimal::ZERO {
            return 0.0;
        }
        percent_of(total_budget - record.expenses, total_budget).max(0.0)
    }

    /// Balance as a percentage of income; 0 when there is no income.
    pub fn savings_rate(record: &MonthRecord) -> f64 {
        if record.income > Decimal::ZERO {
            percent_of(record.balance, record.income)
        } else {
            0.0
        }
    }

    /// Categories above the alert threshold, in the month's category order.
    pub fn category_alerts(record: &MonthRecord) -> Vec<CategoryAlert> {
        record
            .categories
            .iter()
            .filter_map(|entry| {
                let percentage = usage_percentage(entry.spent, entry.budget);
                if percentage <= ALERT_THRESHOLD {
                    return None;
                }
                let severity = if percentage > 100.0 {
                    AlertSeverity::OverBudget
                } else {
                    AlertSeverity::Warning
                };
                Some(CategoryAlert {
                    category: entry.name.clone(),
                    percentage,
                    spent: entry.spent,
                    budget: entry.budget,
                    severity,
                })
            })
            .collect()
    }

    pub fn budget_progress(record: &MonthRecord) -> Vec<BudgetProgress> {
        record
            .categories
            .iter()
            .map(|entry| {
                let percentage = usage_percentage(entry.spent, entry.budget);
                let level = if percentage > ALERT_THRESHOLD {
                    ProgressLevel::High
                } else if percentage > MEDIUM_PROGRESS_THRESHOLD {
                    ProgressLevel::Medium
                } else {
                    ProgressLevel::Low
                };
                BudgetProgress {
                    category: entry.name.clone(),
                    spent: entry.spent,
                    budget: entry.budget,
                    percentage,
                    fill: percentage.min(100.0),
                    level,
                }
            })
            .collect()
    }

    /// Categories with spend, largest first.
    pub fn spending_breakdown(record: &MonthRecord) -> Vec<SpendingSlice> {
        let mut slices: Vec<SpendingSlice> = record
            .categories
            .iter()
            .filter(|entry| entry.spent > Decimal::ZERO)
            .map(|entry| SpendingSlice {
                category: entry.name.clone(),
                spent: entry.spent,
                budget: entry.budget,
            })
            .collect();
        slices.sort_by(|a, b| b.spent.cmp(&a.spent));
        slices
    }

    /// One point per month, oldest first.
    pub fn trend_series(months: &LedgerStore) -> Vec<TrendPoint> {
        months
            .iter()
            .map(|record| TrendPoint {
                month: record.key,
                label: record.key.short_label(),
                income: record.income,
                expenses: record.expenses,
                balance: record.balance,
            })
            .collect()
    }

    pub fn kpis(ledger: &Ledger, key: MonthKey) -> ServiceResult<Kpis> {
        let average_expense = Self::average_monthly_expense(ledger.months())?;
        let record = ledger
            .month_record(key)
            .ok_or_else(|| LedgerError::InvalidMonth(format!("no record for {key}")))?;
        Ok(Kpis {
            average_expense,
            efficiency_rate: Self::efficiency_rate(record),
            savings_rate: Self::savings_rate(record),
        })
    }
}

fn usage_percentage(spent: Decimal, budget: Decimal) -> f64 {
    if budget > Decimal::ZERO {
        percent_of(spent, budget)
    } else {
        0.0
    }
}

/// `part / whole * 100` as a float for display and thresholds. `whole` must be non-zero.
fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percentage| percentage.to_f64())
        .unwrap_or(0.0)
}
