use anyhow::Context;
use evopad::actions::ActionId;
use evopad::config::ConfigManager;
use evopad::engines::evaluation::FitnessEvaluator;
use evopad::engines::generation::{describe_genome, ConsoleProgressCallback, EvolutionEngine};
use evopad::env::{Environment, Step};
use log::info;

const COURSE_LENGTH: f64 = 600.0;
const TIME_BUDGET: f64 = 400.0;

/// Deterministic side-scrolling course for exercising the engine without an
/// emulator attached. Rightward motion scores, the clock runs down a quarter
/// tick per held tick, and the episode ends at the flag or at time zero.
struct DemoCourse {
    position: f64,
    time_left: f64,
    over: bool,
}

impl DemoCourse {
    fn new() -> Self {
        Self {
            position: 0.0,
            time_left: TIME_BUDGET,
            over: false,
        }
    }
}

impl Environment for DemoCourse {
    type State = f64;

    fn reset(&mut self) -> evopad::Result<f64> {
        self.position = 0.0;
        self.time_left = TIME_BUDGET;
        self.over = false;
        Ok(self.position)
    }

    fn step(&mut self, action: ActionId, duration: u32) -> evopad::Result<Step<f64>> {
        if self.over {
            return Ok(Step::Terminal);
        }

        let speed = match action {
            ActionId::MoveRight => 1.0,
            ActionId::JumpLong => 1.4,
            ActionId::JumpShort => 0.6,
            ActionId::MoveLeft => -0.5,
            ActionId::Crouch => 0.0,
        };
        let advance = speed * f64::from(duration);
        self.position = (self.position + advance).max(0.0);
        self.time_left -= 0.25 * f64::from(duration);

        if self.time_left <= 0.0 || self.position >= COURSE_LENGTH {
            self.over = true;
        }

        Ok(Step::Advance {
            state: self.position,
            fitness_delta: 2.0 * advance.max(0.0),
            time_remaining: self.time_left.max(0.0),
            progress: self.position,
        })
    }

    fn is_terminal(&self) -> bool {
        self.over
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut config_path: Option<String> = None;
    let mut export_path: Option<String> = None;
    let mut replay = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replay" => replay = true,
            "--export" => {
                export_path = Some(
                    args.next()
                        .context("--export requires a file path")?,
                );
            }
            _ => config_path = Some(arg),
        }
    }

    let manager = ConfigManager::new();
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?;
        info!("loaded configuration from {}", path);
    }
    let app = manager.get();

    let mut engine = EvolutionEngine::new(app.to_engine_config(), DemoCourse::new())?;
    let best = engine.run(ConsoleProgressCallback)?;

    info!(
        "best individual: shaped fitness {:.4}, raw fitness {:.2}, {} rightward moves",
        best.shaped_fitness, best.fitness, best.rightward_moves
    );
    for line in describe_genome(&best.genome).iter().take(20) {
        info!("  {}", line);
    }
    if best.genome.len() > 20 {
        info!("  ... {} more genes", best.genome.len() - 20);
    }

    if let Some(path) = export_path {
        std::fs::write(&path, serde_json::to_string_pretty(&best)?)?;
        info!("exported best individual to {}", path);
    }

    if replay {
        let evaluator = FitnessEvaluator::new(app.actions.rightward.clone());
        let mut course = DemoCourse::new();
        let mut rerun = best.clone();
        let fitness = evaluator.evaluate(&mut rerun, &mut course)?;
        info!(
            "replay finished: fitness {:.2}, terminal: {}",
            fitness,
            course.is_terminal()
        );
    }

    Ok(())
}
