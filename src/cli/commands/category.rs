use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::CategoryService;
use crate::currency::format_currency;
use crate::ledger::normalize_name;

use super::parse_budget;

const USAGE: &str = "category <list|add <name> <budget>|remove <name>|budget <name> <budget>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "List, add, remove or re-budget categories",
        USAGE,
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return list(context);
    };
    let rest = &args[1..];
    match action.to_lowercase().as_str() {
        "list" | "ls" => list(context),
        "add" => add(context, rest),
        "remove" | "rm" => remove(context, rest),
        "budget" => budget(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn list(context: &mut ShellContext) -> CommandResult {
    output::section("Categories");
    for category in CategoryService::list(&context.ledger) {
        let marker = if category.is_default { "" } else { " (custom)" };
        output::line(format!(
            "{:<24} {}{}",
            category.name,
            format_currency(category.budget, &context.config.currency),
            marker
        ));
    }
    Ok(())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, budget] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category add <name> <budget>".into(),
        ));
    };
    let budget = parse_budget(budget)?;
    let category = CategoryService::add(&mut context.ledger, name, budget)?;
    io::print_success(format!(
        "Category {} added with a budget of {}.",
        category.name,
        format_currency(category.budget, &context.config.currency)
    ));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category remove <name>".into(),
        ));
    };

    if context.mode == CliMode::Interactive {
        let prompt = format!(
            "Remove category {} and its spend from every month?",
            normalize_name(name)
        );
        if !io::confirm_action(&prompt, false)? {
            io::print_info("Removal cancelled.");
            return Ok(());
        }
    }

    let removed = CategoryService::remove(&mut context.ledger, name)?;
    io::print_success(format!("Category {} removed.", removed.name));
    Ok(())
}

fn budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, budget] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: category budget <name> <budget>".into(),
        ));
    };
    let budget = parse_budget(budget)?;
    CategoryService::update_budget(&mut context.ledger, name, budget)?;
    io::print_success(format!(
        "Budget for {} set to {}.",
        normalize_name(name),
        format_currency(budget, &context.config.currency)
    ));
    Ok(())
}
