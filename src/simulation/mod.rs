//! Monte Carlo resampling of a reference lexicon
//!
//! Every simulator draws samples with replacement from a reference lexicon
//! and compares them with an observed sublexicon. A run is one synchronous
//! pass: `Idle → Sampling → Aggregating → Done`. Draws are independent and
//! run in parallel, each with its own generator seeded from a master
//! generator, so the aggregate output depends only on the inputs and the
//! configured seed.
mod grid;
mod handler;
mod monte_carlo;
mod syllable_count;

pub use grid::{CappedInventories, GridComparison, GridComparisonResult};
pub use handler::{DrawHandler, ProgressBar};
pub use monte_carlo::{
    AbsentClass, MonteCarloSimulator, SimulationResult, NO_CLASS,
};
pub use syllable_count::{SyllableCountResult, SyllableCountSim};

use log::info;
use natclass_utils::task_seeds;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;
use serde::Serialize;

/// Where a simulator is in its run
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sampling,
    Aggregating,
    Done,
}

/// Run `n_draws` draws in parallel. Draw `i` gets the `i`-th seed produced
/// by a master generator seeded with `seed`; outcomes are returned in draw
/// order.
pub(crate) fn run_draws<T, F, H>(
    n_draws: usize,
    seed: u64,
    handler: &H,
    draw: F,
) -> Vec<T>
where
    T: Send,
    F: Fn(&mut Xoshiro256Plus) -> T + Sync,
    H: DrawHandler,
{
    let mut master = Xoshiro256Plus::seed_from_u64(seed);
    let seeds = task_seeds(n_draws, &mut master);

    seeds
        .par_iter()
        .enumerate()
        .map(|(ix, &draw_seed)| {
            let mut rng = Xoshiro256Plus::seed_from_u64(draw_seed);
            let outcome = draw(&mut rng);
            handler.draw_finished(ix);
            outcome
        })
        .collect()
}

/// Move to `next`, logging the transition
pub(crate) fn advance(phase: &mut Phase, next: Phase, name: &str) {
    info!("{name}: {phase:?} -> {next:?}");
    *phase = next;
}
