//! Daggerheart engine library.
//!
//! Everything with a side effect around the pure rules in `daggerheart-domain`.
//!
//! ## Structure
//!
//! - `infrastructure/` - Ports, the in-memory store, dice, clock and config
//! - `use_cases/` - Event application, command execution and queries
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
