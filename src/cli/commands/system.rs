use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::autosave::AutosaveOutcome;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("save", "Save a snapshot of the ledger now", "save", cmd_save),
        CommandEntry::new("exit", "Save and exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        output::section("Available commands");
        for entry in context.registry.list() {
            output::line(format!("{:<10} {}", entry.name, entry.description));
        }
        io::print_info("Type `help <command>` to see its forms. Amounts accept `,` or `.`.");
        return Ok(());
    };

    match context.command(&name.to_lowercase()) {
        Some(entry) => {
            output::section(format!("Help: {}", entry.name));
            output::line(entry.description);
            for form in usage_forms(entry.usage) {
                output::line(format!("  {form}"));
            }
        }
        None => context.suggest_command(name),
    }
    Ok(())
}

/// Expands a usage whose trailing `<a|b ...>` group lists subactions into
/// one line per subaction. Any other usage is returned as-is.
fn usage_forms(usage: &str) -> Vec<String> {
    let Some(open) = usage.find('<') else {
        return vec![usage.to_string()];
    };
    let (head, group) = usage.split_at(open);
    let Some(inner) = group.strip_prefix('<').and_then(|g| g.strip_suffix('>')) else {
        return vec![usage.to_string()];
    };

    let mut forms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in inner.char_indices() {
        match ch {
            '<' | '[' => depth += 1,
            '>' | ']' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return vec![usage.to_string()],
            },
            '|' if depth == 0 => {
                forms.push(format!("{head}{}", inner[start..index].trim()));
                start = index + 1;
            }
            _ => {}
        }
    }
    // The first `<` did not open a group spanning the rest of the usage.
    if depth != 0 || forms.is_empty() {
        return vec![usage.to_string()];
    }
    forms.push(format!("{head}{}", inner[start..].trim()));
    forms
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.save_now() {
        AutosaveOutcome::Saved => io::print_success("Ledger saved."),
        _ => io::print_warning("Ledger could not be saved; see the log for details."),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use super::usage_forms;
    use crate::cli::shell_context::tests::script_context;

    #[test]
    fn category_usage_lists_each_subaction() {
        assert_eq!(
            usage_forms("category <list|add <name> <budget>|remove <name>|budget <name> <budget>>"),
            vec![
                "category list",
                "category add <name> <budget>",
                "category remove <name>",
                "category budget <name> <budget>",
            ]
        );
        assert_eq!(usage_forms("month <next|prev>"), vec!["month next", "month prev"]);
    }

    #[test]
    fn usage_without_trailing_group_is_kept_whole() {
        for usage in ["save", "help [command]", "add <income|expense> <amount> [category]"] {
            assert_eq!(usage_forms(usage), vec![usage]);
        }
    }

    #[test]
    fn help_accepts_known_and_unknown_commands() {
        let mut context = script_context();
        for line in ["help", "help category", "help CATEGORY", "help sumary"] {
            assert!(context.process_line(line).is_ok(), "{line}");
        }
    }
}
