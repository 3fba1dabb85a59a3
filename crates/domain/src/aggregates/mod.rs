//! Projections - the per-entity state folded from Daggerheart events.
//!
//! Each projection:
//! - Is keyed by campaign plus its own id (the snapshot by campaign alone)
//! - Serializes as the record the storage port persists
//! - Re-checks every invariant in `validate()` before it is written
//!
//! Transitions are computed by the engine's event application layer; storage
//! only ever sees whole, validated records.

pub mod adversary_state;
pub mod character_state;
pub mod countdown_state;
pub mod snapshot_state;

pub use adversary_state::{AdversaryState, AdversaryStats};
pub use character_state::{CharacterState, ResourceLimits, TemporaryArmorBucket};
pub use countdown_state::{validate_countdown, CountdownState};
pub use snapshot_state::SnapshotState;
