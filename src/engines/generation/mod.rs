pub mod best;
pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;

pub use best::BestEver;
pub use evolution_engine::{
    run_genetic_algorithm, ElitismPolicy, EvolutionConfig, EvolutionEngine, ProgressCallback,
};
pub use genome::{describe_genome, Gene, Genome, Individual};
pub use progress::{ConsoleProgressCallback, NullProgressCallback};
