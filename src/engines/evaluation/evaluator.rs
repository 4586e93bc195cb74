use crate::actions::ActionId;
use crate::engines::generation::genome::{Gene, Individual};
use crate::env::{Environment, Step};
use crate::error::Result;
use log::warn;

const TIME_BONUS: f64 = 100.0;
const REPEAT_PENALTY_STEP: f64 = 10.0;
const RIGHTWARD_BONUS: f64 = 5.0;
const SHAPED_SCALE: f64 = 10000.0;

/// Replays genomes against the environment and scores them.
///
/// The raw fitness is the environment's accumulated signal plus shaping
/// terms: a flat bonus when any time was left on the clock, a reward per
/// rightward move, a penalty per adjacent duplicate gene, and a penalty for
/// ticks idled since the last rightward move.
pub struct FitnessEvaluator {
    rightward: Vec<ActionId>,
}

impl FitnessEvaluator {
    pub fn new(rightward: Vec<ActionId>) -> Self {
        Self { rightward }
    }

    /// Replay the individual's genome from a fresh reset, accumulate the
    /// environment's fitness signal, and store raw and shaped scores on the
    /// individual. Replay stops at the first `Terminal` step; the genes
    /// after it are never played.
    pub fn evaluate<E: Environment>(
        &self,
        individual: &mut Individual,
        environment: &mut E,
    ) -> Result<f64> {
        environment.reset()?;

        let mut raw_total = 0.0;
        let mut max_time_remaining: f64 = 0.0;
        let mut rightward_moves: u32 = 0;
        let mut idle_ticks: u32 = 0;
        let mut advances: usize = 0;

        for gene in &individual.genome {
            let step = environment.step(gene.action, gene.duration)?;

            if self.rightward.contains(&gene.action) {
                rightward_moves += 1;
                idle_ticks = 0;
            } else {
                idle_ticks += 1;
            }

            match step {
                Step::Advance {
                    fitness_delta,
                    time_remaining,
                    ..
                } => {
                    raw_total += fitness_delta;
                    max_time_remaining = max_time_remaining.max(time_remaining);
                    advances += 1;
                }
                Step::Terminal => break,
            }
        }

        if advances == 0 && !individual.genome.is_empty() {
            warn!("episode was terminal at reset; fitness reflects static terms only");
        }

        let time_bonus = if max_time_remaining > 0.0 { TIME_BONUS } else { 0.0 };
        let fitness = raw_total
            + time_bonus
            + RIGHTWARD_BONUS * f64::from(rightward_moves)
            + repetition_penalty(&individual.genome)
            - f64::from(idle_ticks);

        individual.fitness = fitness;
        individual.rightward_moves = rightward_moves;
        individual.shaped_fitness = shaped_fitness(fitness, rightward_moves);

        Ok(fitness)
    }
}

/// Normalized score used for all comparisons between individuals. Raw
/// accumulations can be dominated by large score deltas from the
/// environment; dividing them down and re-weighting forward progress keeps
/// individuals of very different raw magnitude comparable.
pub fn shaped_fitness(fitness: f64, rightward_moves: u32) -> f64 {
    fitness / SHAPED_SCALE + RIGHTWARD_BONUS * f64::from(rightward_moves)
}

/// Penalty over the whole static genome: -10 per adjacent pair of exactly
/// equal genes, whether or not replay ever reached them. Single streaming
/// pass, no allocation.
pub fn repetition_penalty(genome: &[Gene]) -> f64 {
    let repeats = genome.windows(2).filter(|pair| pair[0] == pair[1]).count();
    -REPEAT_PENALTY_STEP * repeats as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, Step};
    use crate::error::EvopadError;

    fn gene(action: ActionId, duration: u32) -> Gene {
        Gene { action, duration }
    }

    fn rightward_default() -> Vec<ActionId> {
        vec![ActionId::MoveRight, ActionId::JumpShort, ActionId::JumpLong]
    }

    /// Never terminates; every step yields the same report.
    struct ConstantEnv {
        fitness_delta: f64,
        time_remaining: f64,
        steps: usize,
    }

    impl Environment for ConstantEnv {
        type State = ();

        fn reset(&mut self) -> crate::error::Result<()> {
            self.steps = 0;
            Ok(())
        }

        fn step(&mut self, _action: ActionId, _duration: u32) -> crate::error::Result<Step<()>> {
            self.steps += 1;
            Ok(Step::Advance {
                state: (),
                fitness_delta: self.fitness_delta,
                time_remaining: self.time_remaining,
                progress: 0.0,
            })
        }

        fn is_terminal(&self) -> bool {
            false
        }
    }

    /// Advances `advances_before_terminal` times, then reports terminal.
    struct TerminalAfter {
        advances_before_terminal: usize,
        per_step_delta: f64,
        steps: usize,
    }

    impl Environment for TerminalAfter {
        type State = ();

        fn reset(&mut self) -> crate::error::Result<()> {
            self.steps = 0;
            Ok(())
        }

        fn step(&mut self, _action: ActionId, _duration: u32) -> crate::error::Result<Step<()>> {
            self.steps += 1;
            if self.steps > self.advances_before_terminal {
                return Ok(Step::Terminal);
            }
            Ok(Step::Advance {
                state: (),
                fitness_delta: self.per_step_delta,
                time_remaining: 0.0,
                progress: self.steps as f64,
            })
        }

        fn is_terminal(&self) -> bool {
            self.steps > self.advances_before_terminal
        }
    }

    /// A reset that fails to clear game-over: every step is terminal.
    struct StuckTerminalEnv;

    impl Environment for StuckTerminalEnv {
        type State = ();

        fn reset(&mut self) -> crate::error::Result<()> {
            Ok(())
        }

        fn step(&mut self, _action: ActionId, _duration: u32) -> crate::error::Result<Step<()>> {
            Ok(Step::Terminal)
        }

        fn is_terminal(&self) -> bool {
            true
        }
    }

    struct FailingEnv;

    impl Environment for FailingEnv {
        type State = ();

        fn reset(&mut self) -> crate::error::Result<()> {
            Ok(())
        }

        fn step(&mut self, _action: ActionId, _duration: u32) -> crate::error::Result<Step<()>> {
            Err(EvopadError::Environment("emulator crashed".to_string()))
        }

        fn is_terminal(&self) -> bool {
            false
        }
    }

    #[test]
    fn repetition_penalty_all_identical() {
        let genome = vec![gene(ActionId::Crouch, 2); 6];
        assert_eq!(repetition_penalty(&genome), -50.0);
    }

    #[test]
    fn repetition_penalty_no_adjacent_duplicates() {
        let genome = vec![
            gene(ActionId::MoveRight, 1),
            gene(ActionId::MoveRight, 2),
            gene(ActionId::MoveRight, 1),
        ];
        assert_eq!(repetition_penalty(&genome), 0.0);
    }

    #[test]
    fn fitness_formula_on_quiet_environment() {
        // Four identical (move-right, 1) genes against an environment that
        // never scores and never ends: 0 raw + 100 time bonus + 20 rightward
        // - 30 repetition - 0 idle = 90.
        let evaluator = FitnessEvaluator::new(rightward_default());
        let mut env = ConstantEnv {
            fitness_delta: 0.0,
            time_remaining: 1.0,
            steps: 0,
        };
        let mut individual = Individual::new(vec![gene(ActionId::MoveRight, 1); 4]);

        let fitness = evaluator.evaluate(&mut individual, &mut env).unwrap();

        assert_eq!(fitness, 90.0);
        assert_eq!(individual.rightward_moves, 4);
        assert_eq!(individual.shaped_fitness, 90.0 / 10000.0 + 20.0);
        assert_eq!(env.steps, 4);
    }

    #[test]
    fn idle_penalty_counts_ticks_since_last_rightward_move() {
        // right, left, crouch: idle counter ends at 2.
        let evaluator = FitnessEvaluator::new(rightward_default());
        let mut env = ConstantEnv {
            fitness_delta: 0.0,
            time_remaining: 0.0,
            steps: 0,
        };
        let mut individual = Individual::new(vec![
            gene(ActionId::MoveRight, 1),
            gene(ActionId::MoveLeft, 1),
            gene(ActionId::Crouch, 1),
        ]);

        let fitness = evaluator.evaluate(&mut individual, &mut env).unwrap();

        // 0 raw + 0 time + 5 rightward + 0 repetition - 2 idle
        assert_eq!(fitness, 3.0);
    }

    #[test]
    fn replay_stops_at_terminal_step() {
        let evaluator = FitnessEvaluator::new(rightward_default());
        let mut env = TerminalAfter {
            advances_before_terminal: 1,
            per_step_delta: 7.0,
            steps: 0,
        };
        let mut individual = Individual::new(vec![
            gene(ActionId::MoveRight, 1),
            gene(ActionId::MoveRight, 2),
            gene(ActionId::MoveRight, 3),
            gene(ActionId::MoveRight, 4),
            gene(ActionId::MoveRight, 5),
        ]);

        let fitness = evaluator.evaluate(&mut individual, &mut env).unwrap();

        // Genes 1 and 2 were stepped (the second reported terminal), genes
        // 3-5 never played. Raw total is the single advance's 7.0; both
        // attempted genes count as rightward moves.
        assert_eq!(env.steps, 2);
        assert_eq!(individual.rightward_moves, 2);
        assert_eq!(fitness, 7.0 + 10.0);
    }

    #[test]
    fn terminal_at_reset_yields_static_terms_only() {
        let evaluator = FitnessEvaluator::new(rightward_default());
        let mut individual = Individual::new(vec![
            gene(ActionId::MoveLeft, 1),
            gene(ActionId::MoveRight, 1),
        ]);

        let fitness = evaluator
            .evaluate(&mut individual, &mut StuckTerminalEnv)
            .unwrap();

        // Only the first gene is attempted; it idles, so: 0 raw + 0 time
        // + 0 rightward + 0 repetition - 1 idle.
        assert_eq!(fitness, -1.0);
    }

    #[test]
    fn environment_failure_propagates() {
        let evaluator = FitnessEvaluator::new(rightward_default());
        let mut individual = Individual::new(vec![gene(ActionId::MoveRight, 1)]);

        let err = evaluator
            .evaluate(&mut individual, &mut FailingEnv)
            .unwrap_err();

        assert!(matches!(err, EvopadError::Environment(_)));
    }
}
