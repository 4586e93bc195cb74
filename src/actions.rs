use crate::error::{EvopadError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Version of the action table. Adapters translate `ActionId` into
/// backend input events; bump this when the enumeration changes so
/// recorded genomes stay interpretable.
pub const ACTION_TABLE_VERSION: u32 = 1;

/// Closed set of inputs a genome can ask the environment to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionId {
    MoveLeft,
    MoveRight,
    Crouch,
    JumpShort,
    JumpLong,
}

impl ActionId {
    pub const ALL: [ActionId; 5] = [
        ActionId::MoveLeft,
        ActionId::MoveRight,
        ActionId::Crouch,
        ActionId::JumpShort,
        ActionId::JumpLong,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionId::MoveLeft => "move-left",
            ActionId::MoveRight => "move-right",
            ActionId::Crouch => "crouch",
            ActionId::JumpShort => "jump-short",
            ActionId::JumpLong => "jump-long",
        }
    }
}

/// Weighted discrete draw over a fixed action set.
///
/// Built once at engine construction; invalid weight tables are rejected
/// here rather than surfacing mid-run from the distribution.
pub struct ActionSampler {
    actions: Vec<ActionId>,
    index: WeightedIndex<f64>,
}

impl ActionSampler {
    pub fn new(weighted: &[(ActionId, f64)]) -> Result<Self> {
        if weighted.is_empty() {
            return Err(EvopadError::Configuration(
                "action weight table is empty".to_string(),
            ));
        }
        if weighted.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(EvopadError::Configuration(
                "action weights must be finite and non-negative".to_string(),
            ));
        }

        let actions: Vec<ActionId> = weighted.iter().map(|(a, _)| *a).collect();
        let index = WeightedIndex::new(weighted.iter().map(|(_, w)| *w)).map_err(|e| {
            EvopadError::Configuration(format!("invalid action weights: {}", e))
        })?;

        Ok(Self { actions, index })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionId {
        self.actions[self.index.sample(rng)]
    }
}
