use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{NewTransaction, TransactionService};
use crate::currency::format_currency;
use crate::errors::LedgerError;
use crate::ledger::{TransactionId, TransactionKind};

use super::parse_amount;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record income or an expense in the current month",
            "add <income|expense> <amount> [category]",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Delete a transaction and undo its effect on the month",
            "remove <id>",
            cmd_remove,
        ),
        CommandEntry::new(
            "history",
            "List the current month's transactions, newest first",
            "history",
            cmd_history,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (Some(kind), Some(amount)) = (args.first(), args.get(1)) else {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <amount> [category]".into(),
        ));
    };
    let kind: TransactionKind = kind.parse()?;
    let amount = parse_amount(amount)?;
    let category = match (kind, args.get(2)) {
        (_, Some(category)) => category.to_string(),
        (TransactionKind::Income, None) => String::new(),
        (TransactionKind::Expense, None) => {
            return Err(CommandError::InvalidArguments(
                "an expense needs a category; see `category list`".into(),
            ));
        }
    };

    let month = context.ledger.current_month();
    let input = NewTransaction {
        category,
        amount,
        kind,
        month,
    };
    let transaction = TransactionService::add(&mut context.ledger, context.clock.as_ref(), input)?;

    if transaction.kind == TransactionKind::Expense
        && !context.ledger.categories().contains(&transaction.category)
    {
        io::print_warning(format!(
            "Category `{}` is not tracked; the expense is logged but not counted in any budget.",
            transaction.category
        ));
    }
    io::print_success(format!(
        "{} of {} recorded in {} (id {}).",
        transaction.kind.label(),
        format_currency(transaction.amount, &context.config.currency),
        transaction.month.label(),
        transaction.id
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: remove <id>".into()));
    };
    let id: TransactionId = raw
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a transaction id")))?;

    match TransactionService::remove(&mut context.ledger, id) {
        Ok(removed) => {
            io::print_success(format!(
                "Removed {} of {} from {}.",
                removed.kind.label(),
                format_currency(removed.amount, &context.config.currency),
                removed.month.label()
            ));
            Ok(())
        }
        Err(err @ LedgerError::TransactionNotFound(_)) => {
            io::print_warning(err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.ledger.current_month();
    let transactions = TransactionService::list_for_month(&context.ledger, month);
    output::section(format!("Transactions: {}", month.label()));
    if transactions.is_empty() {
        io::print_info("No transactions recorded this month.");
        return Ok(());
    }
    for transaction in transactions {
        let amount = format_currency(transaction.amount, &context.config.currency);
        let amount = match transaction.kind {
            TransactionKind::Income => output::signed(format!("+{amount}"), false),
            TransactionKind::Expense => output::signed(format!("-{amount}"), true),
        };
        let category = if transaction.category.is_empty() {
            "-"
        } else {
            transaction.category.as_str()
        };
        output::line(format!(
            "{:<15} {:<16} {:<9} {:<16} {}",
            transaction.id,
            transaction.date.format("%d/%m/%Y %H:%M"),
            transaction.kind.label(),
            category,
            amount
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::shell_context::tests::script_context;
    use rust_decimal_macros::dec;

    #[test]
    fn add_then_remove_restores_month() {
        let mut context = script_context();
        let month = context.ledger.current_month();
        let before = context.ledger.month_record(month).cloned().unwrap();

        context.process_line("add expense 50 lazer").unwrap();
        let record = context.ledger.month_record(month).unwrap();
        assert_eq!(record.expenses, dec!(50));
        assert_eq!(record.category("LAZER").unwrap().spent, dec!(50));

        let id = context.ledger.transactions().iter().next().unwrap().id;
        context.process_line(&format!("remove {id}")).unwrap();
        assert_eq!(context.ledger.month_record(month), Some(&before));
    }

    #[test]
    fn income_without_category_is_accepted() {
        let mut context = script_context();
        context.process_line("add income 1000,50").unwrap();
        let record = context.ledger.current_record();
        assert_eq!(record.income, dec!(1000.50));
        assert_eq!(record.balance, dec!(1000.50));
    }

    #[test]
    fn expense_without_category_is_rejected() {
        let mut context = script_context();
        assert!(context.process_line("add expense 10").is_err());
        assert!(context.ledger.transactions().is_empty());
    }

    #[test]
    fn unknown_kind_is_invalid() {
        let mut context = script_context();
        assert!(context.process_line("add gift 10 LAZER").is_err());
    }

    #[test]
    fn removing_unknown_id_is_reported_not_failed() {
        let mut context = script_context();
        assert!(context.process_line("remove 42").is_ok());
        assert!(context.process_line("remove abc").is_err());
    }
}
