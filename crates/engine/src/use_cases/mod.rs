//! Use cases - rule evaluation orchestrated over the projection store.
//!
//! - `events` folds events onto projections
//! - `commands` decides events from commands and applies them
//! - `snapshot` answers read-side queries

pub mod commands;
pub mod events;
pub mod projections;
pub mod snapshot;

pub use commands::{CommandError, CommandService};
pub use events::{ApplyError, ApplyEvent, ApplyOutcome};
pub use projections::Projections;
pub use snapshot::{QueryError, SnapshotQuery};
