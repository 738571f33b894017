use chrono::{DateTime, Duration, Utc};

use crate::ledger::Ledger;
use crate::storage::SnapshotStore;

pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveOutcome {
    Skipped,
    Saved,
    Failed,
}

/// Decides when a periodic snapshot is due. The caller drives it by calling
/// [`Autosaver::tick`] with the current time; no timer is owned here.
///
/// Store failures are logged and reported as [`AutosaveOutcome::Failed`],
/// never returned as errors, so a command is never held up by persistence.
#[derive(Debug, Clone)]
pub struct Autosaver {
    interval: Duration,
    last_saved: Option<DateTime<Utc>>,
}

impl Autosaver {
    pub fn new(interval_secs: u64) -> Self {
        let secs = i64::try_from(interval_secs.max(1))
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        Self {
            interval: Duration::seconds(secs),
            last_saved: None,
        }
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_saved {
            None => true,
            Some(last) => now - last >= self.interval,
        }
    }

    /// Saves a snapshot when the interval has elapsed since the previous save.
    pub fn tick(
        &mut self,
        ledger: &Ledger,
        now: DateTime<Utc>,
        store: &dyn SnapshotStore,
    ) -> AutosaveOutcome {
        if !self.is_due(now) {
            return AutosaveOutcome::Skipped;
        }
        self.save_now(ledger, now, store)
    }

    /// Unconditional save, used on shutdown.
    pub fn save_now(
        &mut self,
        ledger: &Ledger,
        now: DateTime<Utc>,
        store: &dyn SnapshotStore,
    ) -> AutosaveOutcome {
        let snapshot = ledger.serialize_state(now);
        match store.save(&snapshot) {
            Ok(()) => {
                self.last_saved = Some(now);
                AutosaveOutcome::Saved
            }
            Err(err) => {
                tracing::error!(error = %err, "Snapshot save failed");
                AutosaveOutcome::Failed
            }
        }
    }
}

impl Default for Autosaver {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::ledger::LedgerSnapshot;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<DateTime<Utc>>>,
    }

    impl SnapshotStore for RecordingStore {
        fn save(&self, snapshot: &LedgerSnapshot) -> crate::storage::Result<()> {
            self.saved.lock().unwrap().push(snapshot.saved_at);
            Ok(())
        }

        fn load(&self) -> crate::storage::Result<Option<LedgerSnapshot>> {
            Ok(None)
        }
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn save(&self, _snapshot: &LedgerSnapshot) -> crate::storage::Result<()> {
            Err(LedgerError::Storage("disk full".into()))
        }

        fn load(&self) -> crate::storage::Result<Option<LedgerSnapshot>> {
            Ok(None)
        }
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, second).unwrap()
    }

    #[test]
    fn tick_saves_first_then_waits_for_interval() {
        let ledger = Ledger::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        let store = RecordingStore::default();
        let mut autosaver = Autosaver::new(30);

        assert_eq!(autosaver.tick(&ledger, at(0), &store), AutosaveOutcome::Saved);
        assert_eq!(autosaver.tick(&ledger, at(29), &store), AutosaveOutcome::Skipped);
        assert_eq!(autosaver.tick(&ledger, at(30), &store), AutosaveOutcome::Saved);
        assert_eq!(*store.saved.lock().unwrap(), vec![at(0), at(30)]);
    }

    #[test]
    fn failures_are_reported_and_retried_next_tick() {
        let ledger = Ledger::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        let mut autosaver = Autosaver::new(30);

        assert_eq!(autosaver.tick(&ledger, at(0), &FailingStore), AutosaveOutcome::Failed);
        assert!(autosaver.last_saved().is_none());
        assert!(autosaver.is_due(at(1)));
    }
}
