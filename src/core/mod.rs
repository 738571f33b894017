//! Commands, analytics and the scheduling helpers that sit on top of the
//! ledger models.

pub mod autosave;
pub mod services;
pub mod time;
