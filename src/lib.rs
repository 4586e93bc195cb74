//! Evolutionary search over fixed-length gamepad action sequences.
//!
//! A genome is an ordered list of `(action, duration)` genes replayed
//! against an external simulated game behind the [`env::Environment`]
//! trait. The engine evaluates each genome from a deterministic reset,
//! shapes the environment's fitness signal, and evolves the population
//! through tournament selection, uniform crossover, per-gene mutation and
//! elitist replacement, returning the best individual ever observed.

pub mod actions;
pub mod config;
pub mod engines;
pub mod env;
pub mod error;

pub use error::{EvopadError, Result};
