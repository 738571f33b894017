pub mod category;
pub mod report;
pub mod system;
pub mod transaction;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::LedgerError;
use crate::ledger::Direction;

use super::core::CommandError;
use super::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(transaction::definitions());
    commands.extend(category::definitions());
    commands.extend(report::definitions());
    commands
}

/// Parses a decimal amount, accepting either `.` or `,` as the decimal mark.
pub(crate) fn parse_number(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&raw.trim().replace(',', ".")).ok()
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    parse_number(raw).ok_or_else(|| LedgerError::InvalidAmount(format!("`{raw}` is not a number")))
}

pub(crate) fn parse_budget(raw: &str) -> Result<Decimal, LedgerError> {
    parse_number(raw).ok_or_else(|| LedgerError::InvalidBudget(format!("`{raw}` is not a number")))
}

pub(crate) fn parse_direction(raw: Option<&&str>) -> Result<Direction, CommandError> {
    match raw.map(|value| value.to_ascii_lowercase()).as_deref() {
        Some("next") | Some("+") => Ok(Direction::Next),
        Some("prev") | Some("previous") | Some("-") => Ok(Direction::Previous),
        _ => Err(CommandError::InvalidArguments(
            "expected `next` or `prev`".into(),
        )),
    }
}
