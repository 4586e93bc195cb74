pub mod actions;
pub mod evolution;
pub mod manager;
pub mod traits;

pub use actions::{ActionWeight, ActionsConfig};
pub use evolution::{ElitismSetting, EvolutionConfig};
pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
