//! Read-only reports over the current and view months, plus month navigation.

use rust_decimal::Decimal;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{AlertSeverity, AnalyticsService, ProgressLevel, NO_DATA_MESSAGE};
use crate::currency::{format_currency, format_percentage, CurrencyFormat};
use crate::errors::LedgerError;
use crate::ledger::{Direction, MonthRecord};

use super::parse_direction;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Totals, alerts and budget usage for the current month",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "alerts",
            "Categories above 80% of their budget",
            "alerts",
            cmd_alerts,
        ),
        CommandEntry::new(
            "analytics",
            "Spending prediction and KPIs for the current month",
            "analytics",
            cmd_analytics,
        ),
        CommandEntry::new(
            "trend",
            "Income, expenses and balance for every recorded month",
            "trend",
            cmd_trend,
        ),
        CommandEntry::new(
            "monthly",
            "Category breakdown for the month under review",
            "monthly",
            cmd_monthly,
        ),
        CommandEntry::new(
            "month",
            "Move the current month",
            "month <next|prev>",
            cmd_month,
        ),
        CommandEntry::new(
            "view",
            "Move the month under review",
            "view <next|prev>",
            cmd_view,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let format = context.config.currency.clone();
    let record = context.ledger.current_record().clone();

    output::section(format!("Summary: {}", record.key.label()));
    print_totals(&record, &format);

    output::section("Alerts");
    print_alerts(&record);

    output::section("Spending by category");
    let breakdown = AnalyticsService::spending_breakdown(&record);
    if breakdown.is_empty() {
        io::print_info("No spending recorded yet.");
    }
    for slice in breakdown {
        output::line(format!(
            "{:<24} {}",
            slice.category,
            format_currency(slice.spent, &format)
        ));
    }

    output::section("Budget progress");
    for progress in AnalyticsService::budget_progress(&record) {
        let bar = output::progress_bar(progress.fill);
        let bar = match progress.level {
            ProgressLevel::High => output::signed(bar, true),
            ProgressLevel::Medium | ProgressLevel::Low => bar,
        };
        output::line(format!(
            "{:<24} {} {:>7}  {} / {}",
            progress.category,
            bar,
            format_percentage(progress.percentage),
            format_currency(progress.spent, &format),
            format_currency(progress.budget, &format)
        ));
    }
    Ok(())
}

fn cmd_alerts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let record = context.ledger.current_record().clone();
    output::section(format!("Alerts: {}", record.key.label()));
    print_alerts(&record);
    Ok(())
}

fn cmd_analytics(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let format = &context.config.currency;
    let current = context.ledger.current_month();
    output::section(format!("Analytics: {}", current.label()));

    match AnalyticsService::predict_current(&context.ledger) {
        Ok(prediction) => io::print_info(prediction.message()),
        Err(LedgerError::NoData) => io::print_info(NO_DATA_MESSAGE),
        Err(err) => return Err(err.into()),
    }

    let kpis = AnalyticsService::kpis(&context.ledger, current)?;
    output::line(format!(
        "Average monthly expense: {}",
        format_currency(kpis.average_expense, format)
    ));
    output::line(format!(
        "Budget efficiency:       {}",
        format_percentage(kpis.efficiency_rate)
    ));
    output::line(format!(
        "Savings rate:            {}",
        output::signed(format_percentage(kpis.savings_rate), kpis.savings_rate < 0.0)
    ));
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let format = &context.config.currency;
    output::section("Monthly trend");
    for point in AnalyticsService::trend_series(context.ledger.months()) {
        output::line(format!(
            "{:<16} in {:>14}  out {:>14}  balance {}",
            point.label,
            format_currency(point.income, format),
            format_currency(point.expenses, format),
            output::signed(
                format_currency(point.balance, format),
                point.balance < Decimal::ZERO,
            )
        ));
    }
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let format = context.config.currency.clone();
    let record = context.ledger.view_record().clone();

    output::section(format!("Month: {}", record.key.label()));
    print_totals(&record, &format);
    for entry in &record.categories {
        output::line(format!(
            "{:<24} {} / {}",
            entry.name,
            format_currency(entry.spent, &format),
            format_currency(entry.budget, &format)
        ));
    }
    Ok(())
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let direction = parse_direction(args.first())?;
    let today = context.clock.today();
    let key = context.ledger.step_current(direction, today)?;
    io::print_success(format!("Current month: {}", key.label()));
    Ok(())
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let direction = parse_direction(args.first())?;
    let key = context.ledger.step_view(direction);
    io::print_success(format!("Viewing: {}", key.label()));
    Ok(())
}

fn print_totals(record: &MonthRecord, format: &CurrencyFormat) {
    output::line(format!("Income:   {}", format_currency(record.income, format)));
    output::line(format!("Expenses: {}", format_currency(record.expenses, format)));
    output::line(format!(
        "Balance:  {}",
        output::signed(
            format_currency(record.balance, format),
            record.balance < Decimal::ZERO,
        )
    ));
}

fn print_alerts(record: &MonthRecord) {
    let alerts = AnalyticsService::category_alerts(record);
    if alerts.is_empty() {
        io::print_success("All budgets are under control!");
        return;
    }
    for alert in alerts {
        let message = format!(
            "{} at {} of budget",
            alert.category,
            format_percentage(alert.percentage)
        );
        match alert.severity {
            AlertSeverity::OverBudget => io::print_error(format!("{message} (over budget)")),
            AlertSeverity::Warning => io::print_warning(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::core::CommandError;
    use crate::cli::shell_context::tests::script_context;
    use crate::errors::LedgerError;
    use crate::ledger::MonthKey;

    #[test]
    fn reports_run_on_fresh_ledger() {
        let mut context = script_context();
        for command in ["summary", "alerts", "analytics", "trend", "monthly"] {
            context.process_line(command).unwrap();
        }
    }

    #[test]
    fn month_navigation_stops_six_months_ahead() {
        let mut context = script_context();
        for _ in 0..6 {
            context.process_line("month next").unwrap();
        }
        assert_eq!(
            context.ledger.current_month(),
            MonthKey::new(2024, 9).unwrap()
        );
        let err = context.process_line("month next").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Ledger(LedgerError::NavigationLimit(_))
        ));
    }

    #[test]
    fn view_navigation_creates_months() {
        let mut context = script_context();
        context.process_line("view prev").unwrap();
        let key = MonthKey::new(2024, 2).unwrap();
        assert_eq!(context.ledger.view_month(), key);
        assert!(context.ledger.month_record(key).is_some());
        assert_eq!(
            context.ledger.current_month(),
            MonthKey::new(2024, 3).unwrap()
        );
    }

    #[test]
    fn navigation_requires_direction() {
        let mut context = script_context();
        assert!(matches!(
            context.process_line("view sideways"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
