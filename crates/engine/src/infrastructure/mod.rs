//! Infrastructure - ports and their implementations.

pub mod clock;
pub mod config;
pub mod dice;
pub mod memory;
pub mod ports;
