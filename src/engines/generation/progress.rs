use super::evolution_engine::ProgressCallback;

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        println!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_shaped: f64) {
        println!(
            "Generation {} complete. Best shaped fitness: {:.4}",
            generation + 1,
            best_shaped
        );
    }

    fn on_individual_evaluated(&mut self, individual_num: usize, total: usize) {
        if individual_num == total {
            println!("  Evaluated {}/{} individuals", individual_num, total);
        }
    }
}

/// No-op callback for library callers and tests.
pub struct NullProgressCallback;

impl ProgressCallback for NullProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best_shaped: f64) {}

    fn on_individual_evaluated(&mut self, _individual_num: usize, _total: usize) {}
}
