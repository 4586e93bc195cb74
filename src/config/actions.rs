use super::traits::ConfigSection;
use crate::actions::ActionId;
use crate::error::EvopadError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionWeight {
    pub action: ActionId,
    pub weight: f64,
}

/// Weight tables and subsets driving genome construction and mutation.
///
/// Spawn weights cover the actions fresh genomes are drawn from; mutation
/// weights cover the restricted set mutation rewrites genes with; the
/// rightward subset marks the actions counted as forward progress by the
/// fitness shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub spawn: Vec<ActionWeight>,
    pub mutation: Vec<ActionWeight>,
    pub rightward: Vec<ActionId>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            spawn: vec![
                ActionWeight { action: ActionId::MoveLeft, weight: 1.5 },
                ActionWeight { action: ActionId::MoveRight, weight: 3.5 },
                ActionWeight { action: ActionId::JumpLong, weight: 5.0 },
            ],
            mutation: vec![
                ActionWeight { action: ActionId::Crouch, weight: 3.0 },
                ActionWeight { action: ActionId::MoveRight, weight: 1.0 },
            ],
            rightward: vec![ActionId::MoveRight, ActionId::JumpShort, ActionId::JumpLong],
        }
    }
}

fn validate_weights(name: &str, weights: &[ActionWeight]) -> Result<(), EvopadError> {
    if weights.is_empty() {
        return Err(EvopadError::Configuration(format!(
            "{} action set must not be empty",
            name
        )));
    }
    if weights.iter().any(|w| !w.weight.is_finite() || w.weight < 0.0) {
        return Err(EvopadError::Configuration(format!(
            "{} weights must be finite and non-negative",
            name
        )));
    }
    if weights.iter().map(|w| w.weight).sum::<f64>() <= 0.0 {
        return Err(EvopadError::Configuration(format!(
            "{} weights must not all be zero",
            name
        )));
    }
    Ok(())
}

impl ConfigSection for ActionsConfig {
    fn section_name() -> &'static str {
        "actions"
    }

    fn validate(&self) -> Result<(), EvopadError> {
        validate_weights("spawn", &self.spawn)?;
        validate_weights("mutation", &self.mutation)?;
        Ok(())
    }
}

impl ActionsConfig {
    pub fn spawn_weights(&self) -> Vec<(ActionId, f64)> {
        self.spawn.iter().map(|w| (w.action, w.weight)).collect()
    }

    pub fn mutation_weights(&self) -> Vec<(ActionId, f64)> {
        self.mutation.iter().map(|w| (w.action, w.weight)).collect()
    }
}
