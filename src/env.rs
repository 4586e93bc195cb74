use crate::actions::ActionId;
use crate::error::Result;

/// One advance of the simulation, or the end of the episode.
///
/// `Terminal` replaces the overloaded sentinel value older drivers stuffed
/// into the progress field: it carries no state (none is materialized once
/// the episode is over) and contributes zero fitness.
pub enum Step<S> {
    Advance {
        state: S,
        fitness_delta: f64,
        time_remaining: f64,
        progress: f64,
    },
    Terminal,
}

/// Contract for the simulated game the engine replays genomes against.
///
/// The engine owns exactly one instance; `reset`/`step` are inherently
/// serial against a single simulation. Implementations live outside this
/// crate (emulator bridges, scripted test doubles).
pub trait Environment {
    type State;

    /// Deterministically restart the episode, clearing any terminal flag.
    fn reset(&mut self) -> Result<Self::State>;

    /// Hold `action` for `duration` ticks. Once the episode has ended this
    /// returns `Step::Terminal` without advancing the simulation.
    fn step(&mut self, action: ActionId, duration: u32) -> Result<Step<Self::State>>;

    fn is_terminal(&self) -> bool;
}
