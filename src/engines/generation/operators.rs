use crate::actions::ActionSampler;
use crate::engines::generation::genome::{Gene, Genome, Individual};
use rand::Rng;
use std::ops::RangeInclusive;

/// Draw a fresh genome: actions from the weighted spawn table, durations
/// uniform over the configured tick range.
pub fn random_genome<R: Rng>(
    length: usize,
    actions: &ActionSampler,
    durations: RangeInclusive<u32>,
    rng: &mut R,
) -> Genome {
    (0..length)
        .map(|_| Gene {
            action: actions.sample(rng),
            duration: rng.gen_range(durations.clone()),
        })
        .collect()
}

/// Tournament selection: pick the best-shaped of K distinct entrants.
///
/// With probability `second_best_probability` the top entrant is removed
/// before picking, occasionally letting the runner-up win. Ties go to the
/// first-encountered entrant. Returns the winner's population index.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    second_best_probability: f64,
    rng: &mut R,
) -> usize {
    let mut entrants: Vec<usize> =
        rand::seq::index::sample(rng, population.len(), tournament_size).into_vec();

    if entrants.len() > 1 && rng.gen::<f64>() < second_best_probability {
        let top = argmax_shaped(population, &entrants);
        entrants.remove(top);
    }

    let winner = argmax_shaped(population, &entrants);
    entrants[winner]
}

fn argmax_shaped(population: &[Individual], entrants: &[usize]) -> usize {
    let mut best = 0;
    for pos in 1..entrants.len() {
        if population[entrants[pos]].shaped_fitness > population[entrants[best]].shaped_fitness {
            best = pos;
        }
    }
    best
}

/// Fill a mating pool of the same size as the population by repeated
/// tournaments.
pub fn select<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    second_best_probability: f64,
    rng: &mut R,
) -> Vec<Individual> {
    let mut pool = Vec::with_capacity(population.len());
    while pool.len() < population.len() {
        let winner =
            tournament_selection(population, tournament_size, second_best_probability, rng);
        pool.push(population[winner].clone());
    }
    pool
}

/// Uniform crossover: per index, a fair coin keeps or swaps the gene pair.
/// Children are freshly allocated and never alias parent storage.
pub fn crossover<R: Rng>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> (Genome, Genome) {
    debug_assert_eq!(parent1.len(), parent2.len());

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent2.len());

    for (&gene1, &gene2) in parent1.iter().zip(parent2.iter()) {
        if rng.gen_bool(0.5) {
            child1.push(gene1);
            child2.push(gene2);
        } else {
            child1.push(gene2);
            child2.push(gene1);
        }
    }

    (child1, child2)
}

/// Per-gene mutation: with probability `rate`, rewrite the gene with an
/// action from the restricted mutation table and a fresh uniform duration.
/// Genome length never changes.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    rate: f64,
    actions: &ActionSampler,
    durations: RangeInclusive<u32>,
    rng: &mut R,
) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < rate {
            *gene = Gene {
                action: actions.sample(rng),
                duration: rng.gen_range(durations.clone()),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn_sampler() -> ActionSampler {
        ActionSampler::new(&[
            (ActionId::MoveLeft, 1.5),
            (ActionId::MoveRight, 3.5),
            (ActionId::JumpLong, 5.0),
        ])
        .unwrap()
    }

    fn individual_with_shaped(shaped: f64) -> Individual {
        let mut ind = Individual::new(vec![Gene {
            action: ActionId::MoveRight,
            duration: 1,
        }]);
        ind.shaped_fitness = shaped;
        ind
    }

    #[test]
    fn random_genome_has_requested_length_and_bounded_durations() {
        let mut rng = StdRng::seed_from_u64(1);
        let genome = random_genome(200, &spawn_sampler(), 1..=10, &mut rng);
        assert_eq!(genome.len(), 200);
        assert!(genome.iter().all(|g| (1..=10).contains(&g.duration)));
    }

    #[test]
    fn crossover_preserves_lengths() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = random_genome(50, &spawn_sampler(), 1..=10, &mut rng);
        let b = random_genome(50, &spawn_sampler(), 1..=10, &mut rng);
        let (c1, c2) = crossover(&a, &b, &mut rng);
        assert_eq!(c1.len(), a.len());
        assert_eq!(c2.len(), b.len());
    }

    #[test]
    fn crossover_matches_coin_flips_of_identically_seeded_rng() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_genome(4, &spawn_sampler(), 1..=10, &mut rng);
        let b: Genome = (0..4)
            .map(|i| Gene {
                action: ActionId::Crouch,
                duration: i + 1,
            })
            .collect();

        let mut cross_rng = StdRng::seed_from_u64(99);
        let (c1, c2) = crossover(&a, &b, &mut cross_rng);

        let mut replay_rng = StdRng::seed_from_u64(99);
        for i in 0..4 {
            if replay_rng.gen_bool(0.5) {
                assert_eq!(c1[i], a[i]);
                assert_eq!(c2[i], b[i]);
            } else {
                assert_eq!(c1[i], b[i]);
                assert_eq!(c2[i], a[i]);
            }
        }
    }

    #[test]
    fn mutation_with_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        let original = random_genome(100, &spawn_sampler(), 1..=10, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, 0.0, &spawn_sampler(), 1..=10, &mut rng);
        assert_eq!(mutated, original);
    }

    #[test]
    fn mutation_with_full_rate_draws_from_mutation_table() {
        let crouch_only = ActionSampler::new(&[(ActionId::Crouch, 3.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome = random_genome(60, &spawn_sampler(), 1..=10, &mut rng);
        mutate(&mut genome, 1.0, &crouch_only, 1..=10, &mut rng);
        assert_eq!(genome.len(), 60);
        assert!(genome
            .iter()
            .all(|g| g.action == ActionId::Crouch && (1..=10).contains(&g.duration)));
    }

    #[test]
    fn tournament_of_whole_population_without_drop_picks_the_best() {
        let population = vec![
            individual_with_shaped(1.0),
            individual_with_shaped(5.0),
            individual_with_shaped(9.0),
        ];
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..20 {
            let winner = tournament_selection(&population, 3, 0.0, &mut rng);
            assert_eq!(winner, 2);
        }
    }

    #[test]
    fn tournament_with_forced_drop_picks_the_runner_up() {
        let population = vec![
            individual_with_shaped(1.0),
            individual_with_shaped(5.0),
            individual_with_shaped(9.0),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let winner = tournament_selection(&population, 3, 1.0, &mut rng);
            assert_eq!(winner, 1);
        }
    }

    #[test]
    fn select_returns_pool_of_population_size() {
        let population: Vec<Individual> =
            (0..7).map(|i| individual_with_shaped(i as f64)).collect();
        let mut rng = StdRng::seed_from_u64(8);
        let pool = select(&population, 3, 0.2, &mut rng);
        assert_eq!(pool.len(), population.len());
    }
}
