use super::{actions::ActionsConfig, evolution::EvolutionConfig, traits::ConfigSection};
use crate::engines::generation::evolution_engine::{self, ElitismPolicy};
use crate::error::EvopadError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub actions: ActionsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvopadError> {
        self.evolution.validate()?;
        self.actions.validate()?;
        Ok(())
    }

    /// Flatten the sections into the engine-level configuration.
    pub fn to_engine_config(&self) -> evolution_engine::EvolutionConfig {
        let elitism = match self.evolution.elitism {
            super::evolution::ElitismSetting::BestEver => ElitismPolicy::BestEver,
            super::evolution::ElitismSetting::TopSelected { count } => {
                ElitismPolicy::TopSelected { count }
            }
        };

        evolution_engine::EvolutionConfig {
            population_size: self.evolution.population_size,
            generations: self.evolution.generations,
            genome_length: self.evolution.genome_length,
            durations: 1..=self.evolution.max_duration,
            mutation_rate: self.evolution.mutation_rate,
            tournament_size: self.evolution.tournament_size,
            second_best_probability: self.evolution.second_best_probability,
            elitism,
            spawn_weights: self.actions.spawn_weights(),
            mutation_weights: self.actions.mutation_weights(),
            rightward_actions: self.actions.rightward.clone(),
            seed: self.evolution.seed,
        }
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvopadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvopadError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EvopadError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvopadError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| EvopadError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvopadError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), EvopadError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}
