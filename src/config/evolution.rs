use super::traits::ConfigSection;
use crate::error::EvopadError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub genome_length: usize,
    pub max_duration: u32,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub second_best_probability: f64,
    pub elitism: ElitismSetting,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElitismSetting {
    BestEver,
    TopSelected { count: usize },
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 100,
            genome_length: 5000,
            max_duration: 10,
            mutation_rate: 0.1,
            tournament_size: 3,
            second_best_probability: 0.2,
            elitism: ElitismSetting::TopSelected { count: 5 },
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvopadError> {
        if self.population_size < 2 {
            return Err(EvopadError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(EvopadError::Configuration(
                "Generation count must be positive".to_string(),
            ));
        }
        if self.genome_length == 0 {
            return Err(EvopadError::Configuration(
                "Genome length must be positive".to_string(),
            ));
        }
        if self.max_duration == 0 {
            return Err(EvopadError::Configuration(
                "Max duration must be at least 1 tick".to_string(),
            ));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(EvopadError::Configuration(
                "Tournament size must be between 1 and the population size".to_string(),
            ));
        }
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(EvopadError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.second_best_probability < 0.0 || self.second_best_probability > 1.0 {
            return Err(EvopadError::Configuration(
                "Second-best probability must be between 0 and 1".to_string(),
            ));
        }
        if let ElitismSetting::TopSelected { count } = self.elitism {
            if count == 0 || count >= self.population_size {
                return Err(EvopadError::Configuration(
                    "Elite count must be between 1 and the population size".to_string(),
                ));
            }
        }
        Ok(())
    }
}
