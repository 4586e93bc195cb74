use crate::actions::ActionId;
use serde::{Deserialize, Serialize};

/// One replay instruction: hold `action` for `duration` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub action: ActionId,
    pub duration: u32,
}

/// Genome representation for the action-sequence search.
///
/// A genome is an ordered, fixed-length sequence of genes replayed strictly
/// in order against the environment. Linear sequences keep the variation
/// operators trivial: uniform crossover is a per-index coin flip and
/// mutation rewrites single genes, neither can produce an invalid genome
/// or change its length.
pub type Genome = Vec<Gene>;

/// A candidate strategy: a genome plus the scores derived from its last
/// evaluation. The score fields are recomputed every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: f64,
    pub shaped_fitness: f64,
    pub rightward_moves: u32,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: 0.0,
            shaped_fitness: 0.0,
            rightward_moves: 0,
        }
    }
}

/// Human-readable listing of a genome, one line per gene.
pub fn describe_genome(genome: &[Gene]) -> Vec<String> {
    genome
        .iter()
        .map(|gene| format!("{} for {} ticks", gene.action.name(), gene.duration))
        .collect()
}
