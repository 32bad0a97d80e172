/// Observer of a simulation run.
///
/// Used for progress reporting. Draws run in parallel, so `draw_finished`
/// may be called from several threads at once and in any order.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use natclass::simulation::{DrawHandler, SyllableCountSim};
/// use natclass::SimulationConfig;
///
/// #[derive(Clone, Default)]
/// struct Counter(Arc<AtomicUsize>);
///
/// impl DrawHandler for Counter {
///     fn draw_finished(&self, _draw_ix: usize) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let counter = Counter::default();
/// let config = SimulationConfig::new().n_draws(25).seed(7);
/// let mut sim =
///     SyllableCountSim::new(vec![1, 2, 3], &[1, 2], config).unwrap();
/// sim.run_with_handler(counter.clone()).unwrap();
///
/// assert_eq!(counter.0.load(Ordering::Relaxed), 25);
/// ```
pub trait DrawHandler: Send + Sync {
    /// Called once before the first draw
    fn global_init(&mut self, _n_draws: usize) {}

    /// Called after each draw
    fn draw_finished(&self, _draw_ix: usize) {}

    /// Called once after the last draw
    fn finalize(&mut self) {}
}

impl DrawHandler for () {}

/// Show a progress bar on stderr
#[derive(Clone, Debug, Default)]
pub enum ProgressBar {
    #[default]
    UnInitialized,
    Initialized(indicatif::ProgressBar),
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::UnInitialized
    }
}

impl DrawHandler for ProgressBar {
    fn global_init(&mut self, n_draws: usize) {
        use indicatif::ProgressStyle;

        let bar = indicatif::ProgressBar::new(n_draws as u64);
        let template = concat!(
            "{wide_bar:.white/white} │{pos}/{len}, ",
            "Elapsed {elapsed_precise} ETA {eta_precise}│"
        );
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            bar.set_style(style.progress_chars("━╾ "));
        }
        *self = Self::Initialized(bar);
    }

    fn draw_finished(&self, _draw_ix: usize) {
        if let Self::Initialized(bar) = self {
            bar.inc(1);
        }
    }

    fn finalize(&mut self) {
        if let Self::Initialized(bar) = std::mem::take(self) {
            bar.finish_and_clear();
        }
    }
}
