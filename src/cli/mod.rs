pub mod commands;
pub mod core;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;

pub use core::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, ShellContext};
