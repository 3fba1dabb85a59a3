//! Daggerheart rules domain.
//!
//! Pure rules, projection state, and the closed event and command sets.
//! Nothing here does I/O; randomness comes in through
//! [`game_systems::daggerheart::DiceRoller`].

pub mod aggregates;
pub mod commands;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;

pub use error::DomainError;
pub use game_systems::{DaggerheartSystem, GameSystem};
pub use ids::{AdversaryId, CampaignId, CardId, CharacterId, CountdownId, SessionId};
