//! Game system implementations.
//!
//! Each ruleset implements the traits defined in `traits.rs`. Only
//! Daggerheart lives here; other systems plug in beside it.

pub mod daggerheart;
mod traits;

pub use daggerheart::DaggerheartSystem;
pub use traits::GameSystem;
