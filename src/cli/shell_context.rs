use crate::{
    config::{Config, ConfigManager},
    core::{
        autosave::{AutosaveOutcome, Autosaver},
        time::{Clock, SystemClock},
    },
    errors::LedgerError,
    ledger::Ledger,
    storage::{JsonFileStore, SnapshotStore},
};

use super::{commands, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach: the ledger plus its collaborators.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    pub store: Box<dyn SnapshotStore>,
    pub autosaver: Autosaver,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds the context from the on-disk configuration and the last snapshot, if any.
    pub fn new(mode: CliMode) -> Result<Self, LedgerError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = JsonFileStore::new(config_manager.snapshot_path(&config));
        Self::with_parts(mode, config, Box::new(SystemClock), Box::new(store))
    }

    pub fn with_parts(
        mode: CliMode,
        config: Config,
        clock: Box<dyn Clock>,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self, LedgerError> {
        let today = clock.today();
        let ledger = match store.load()? {
            Some(snapshot) => Ledger::from_snapshot(snapshot, today)?,
            None => Ledger::new(today),
        };
        let autosaver = Autosaver::new(config.autosave_interval_secs);
        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            ledger,
            config,
            clock,
            store,
            autosaver,
            last_command: None,
            running: true,
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn prompt(&self) -> String {
        format!("finance [{}]> ", self.ledger.current_month().label())
    }

    pub(crate) fn autosave_tick(&mut self) -> AutosaveOutcome {
        let now = self.clock.now();
        self.autosaver.tick(&self.ledger, now, self.store.as_ref())
    }

    pub(crate) fn save_now(&mut self) -> AutosaveOutcome {
        let now = self.clock.now();
        self.autosaver.save_now(&self.ledger, now, self.store.as_ref())
    }
}
