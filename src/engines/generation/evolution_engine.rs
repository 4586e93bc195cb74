use crate::actions::{ActionId, ActionSampler};
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::best::BestEver;
use crate::engines::generation::genome::Individual;
use crate::engines::generation::operators::{crossover, mutate, random_genome, select};
use crate::engines::generation::progress::NullProgressCallback;
use crate::env::Environment;
use crate::error::{EvopadError, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// How the survivors of a generation are chosen.
///
/// `BestEver` carries a single clone of the best individual seen so far and
/// fills the rest with offspring; `TopSelected` carries the `count`
/// highest-shaped members of the mating pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElitismPolicy {
    BestEver,
    TopSelected { count: usize },
}

#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub genome_length: usize,
    pub durations: RangeInclusive<u32>,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub second_best_probability: f64,
    pub elitism: ElitismPolicy,
    pub spawn_weights: Vec<(ActionId, f64)>,
    pub mutation_weights: Vec<(ActionId, f64)>,
    pub rightward_actions: Vec<ActionId>,
    pub seed: Option<u64>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_shaped: f64);
    fn on_individual_evaluated(&mut self, individual_num: usize, total: usize);
}

pub struct EvolutionEngine<E: Environment> {
    config: EvolutionConfig,
    environment: E,
    evaluator: FitnessEvaluator,
    spawn_sampler: ActionSampler,
    mutation_sampler: ActionSampler,
    best: BestEver,
    rng: StdRng,
}

impl<E: Environment> EvolutionEngine<E> {
    /// Build an engine, failing fast on any invalid configuration. The
    /// environment is exclusively owned: replays are serial against one
    /// simulation instance.
    pub fn new(config: EvolutionConfig, environment: E) -> Result<Self> {
        validate(&config)?;

        let spawn_sampler = ActionSampler::new(&config.spawn_weights)?;
        let mutation_sampler = ActionSampler::new(&config.mutation_weights)?;
        let evaluator = FitnessEvaluator::new(config.rightward_actions.clone());
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            environment,
            evaluator,
            spawn_sampler,
            mutation_sampler,
            best: BestEver::new(),
            rng,
        })
    }

    /// Run the full evolution from a randomly initialized population.
    pub fn run<C: ProgressCallback>(&mut self, callback: C) -> Result<Individual> {
        let population = self.initialize_population();
        self.run_from(population, callback)
    }

    /// Run the full evolution from a caller-provided initial population and
    /// return the best individual observed across all generations.
    pub fn run_from<C: ProgressCallback>(
        &mut self,
        mut population: Vec<Individual>,
        mut callback: C,
    ) -> Result<Individual> {
        if population.len() != self.config.population_size {
            return Err(EvopadError::Configuration(format!(
                "initial population has {} individuals, expected {}",
                population.len(),
                self.config.population_size
            )));
        }
        if let Some(bad) = population
            .iter()
            .find(|ind| ind.genome.len() != self.config.genome_length)
        {
            return Err(EvopadError::Configuration(format!(
                "initial genome has length {}, expected {}",
                bad.genome.len(),
                self.config.genome_length
            )));
        }

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            self.evaluate_population(&mut population, &mut callback)?;
            callback.on_generation_complete(generation, self.best.shaped_fitness());

            if generation == self.config.generations - 1 {
                break;
            }

            population = self.next_generation(&population);
        }

        self.best
            .get()
            .cloned()
            .ok_or_else(|| EvopadError::Configuration("no individuals were evaluated".to_string()))
    }

    pub fn best(&self) -> Option<&Individual> {
        self.best.get()
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        (0..self.config.population_size)
            .map(|_| {
                Individual::new(random_genome(
                    self.config.genome_length,
                    &self.spawn_sampler,
                    self.config.durations.clone(),
                    &mut self.rng,
                ))
            })
            .collect()
    }

    fn evaluate_population<C: ProgressCallback>(
        &mut self,
        population: &mut [Individual],
        callback: &mut C,
    ) -> Result<()> {
        let total = population.len();
        for (i, individual) in population.iter_mut().enumerate() {
            let fitness = self.evaluator.evaluate(individual, &mut self.environment)?;
            self.best.try_update(individual);
            debug!(
                "individual {}/{}: fitness {:.2}, shaped {:.4}",
                i + 1,
                total,
                fitness,
                individual.shaped_fitness
            );
            callback.on_individual_evaluated(i + 1, total);
        }
        Ok(())
    }

    fn next_generation(&mut self, population: &[Individual]) -> Vec<Individual> {
        let pool = select(
            population,
            self.config.tournament_size,
            self.config.second_best_probability,
            &mut self.rng,
        );

        let elite_count = match self.config.elitism {
            ElitismPolicy::BestEver => 1,
            ElitismPolicy::TopSelected { count } => count,
        };
        let offspring_target = self.config.population_size - elite_count;

        let mut offspring = Vec::with_capacity(offspring_target + 1);
        while offspring.len() < offspring_target {
            let parents = rand::seq::index::sample(&mut self.rng, pool.len(), 2);
            let (child1, child2) = crossover(
                &pool[parents.index(0)].genome,
                &pool[parents.index(1)].genome,
                &mut self.rng,
            );
            offspring.push(Individual::new(child1));
            if offspring.len() < offspring_target {
                offspring.push(Individual::new(child2));
            }
        }

        for child in offspring.iter_mut() {
            mutate(
                &mut child.genome,
                self.config.mutation_rate,
                &self.mutation_sampler,
                self.config.durations.clone(),
                &mut self.rng,
            );
        }

        let mut next = Vec::with_capacity(self.config.population_size);
        match self.config.elitism {
            ElitismPolicy::BestEver => {
                if let Some(best) = self.best.get() {
                    next.push(best.clone());
                }
            }
            ElitismPolicy::TopSelected { count } => {
                let mut ranked = pool;
                ranked.sort_by(|a, b| by_shaped_desc(a, b));
                next.extend(ranked.into_iter().take(count));
            }
        }

        offspring.sort_by(|a, b| by_shaped_desc(a, b));
        next.extend(offspring);
        next.truncate(self.config.population_size);
        next
    }
}

fn by_shaped_desc(a: &Individual, b: &Individual) -> Ordering {
    b.shaped_fitness
        .partial_cmp(&a.shaped_fitness)
        .unwrap_or(Ordering::Equal)
}

fn validate(config: &EvolutionConfig) -> Result<()> {
    if config.population_size < 2 {
        return Err(EvopadError::Configuration(
            "population size must be at least 2".to_string(),
        ));
    }
    if config.generations == 0 {
        return Err(EvopadError::Configuration(
            "generation count must be positive".to_string(),
        ));
    }
    if config.genome_length == 0 {
        return Err(EvopadError::Configuration(
            "genome length must be positive".to_string(),
        ));
    }
    if config.durations.is_empty() || *config.durations.start() == 0 {
        return Err(EvopadError::Configuration(
            "duration range must cover at least one positive tick count".to_string(),
        ));
    }
    if config.tournament_size == 0 || config.tournament_size > config.population_size {
        return Err(EvopadError::Configuration(format!(
            "tournament size {} must be between 1 and the population size {}",
            config.tournament_size, config.population_size
        )));
    }
    if !(0.0..=1.0).contains(&config.mutation_rate) {
        return Err(EvopadError::Configuration(
            "mutation rate must be between 0 and 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.second_best_probability) {
        return Err(EvopadError::Configuration(
            "second-best probability must be between 0 and 1".to_string(),
        ));
    }
    if let ElitismPolicy::TopSelected { count } = config.elitism {
        if count == 0 || count >= config.population_size {
            return Err(EvopadError::Configuration(format!(
                "elite count {} must be between 1 and the population size {}",
                count, config.population_size
            )));
        }
    }
    Ok(())
}

/// Single library entry point: evolve `initial_population` against
/// `environment` for the configured number of generations and return the
/// best individual ever observed.
pub fn run_genetic_algorithm<E: Environment>(
    initial_population: Vec<Individual>,
    environment: E,
    config: EvolutionConfig,
) -> Result<Individual> {
    let mut engine = EvolutionEngine::new(config, environment)?;
    engine.run_from(initial_population, NullProgressCallback)
}
