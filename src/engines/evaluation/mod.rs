pub mod evaluator;

pub use evaluator::{repetition_penalty, shaped_fitness, FitnessEvaluator};
