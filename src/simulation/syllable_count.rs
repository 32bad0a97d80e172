use std::collections::BTreeMap;

use natclass_utils::{
    ci95, choose_ixs_with_replacement, tally, ConfidenceInterval, MinMax,
};
use serde::Serialize;

use super::{advance, run_draws, DrawHandler, Phase};
use crate::config::SimulationConfig;
use crate::error::SimulationError;

/// Aggregate output of a `SyllableCountSim` run
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SyllableCountResult {
    pub n_draws: usize,
    pub sample_size: usize,
    pub seed: u64,
    pub threshold: usize,
    /// Longest word per draw
    pub max_syllables: ConfidenceInterval,
    /// Shortest word per draw
    pub min_syllables: ConfidenceInterval,
    /// Draws whose longest word exceeds the threshold
    pub n_over_threshold: usize,
    pub over_threshold_ratio: f64,
    /// Longest word → number of draws
    pub max_lengths: BTreeMap<usize, usize>,
}

/// Resample syllable counts and track the longest and shortest word of
/// each draw
#[derive(Clone, Debug)]
pub struct SyllableCountSim {
    lexicon: Vec<usize>,
    sample_size: usize,
    threshold: usize,
    config: SimulationConfig,
    phase: Phase,
}

impl SyllableCountSim {
    /// `lexicon` and `sublexicon` are the syllable counts of their words
    pub fn new(
        lexicon: Vec<usize>,
        sublexicon: &[usize],
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        if lexicon.is_empty() {
            return Err(SimulationError::EmptyLexicon);
        }
        let sublex_max = sublexicon
            .iter()
            .copied()
            .max()
            .ok_or(SimulationError::EmptySublexicon)?;

        let sample_size = config.sample_size.unwrap_or(sublexicon.len());
        if sample_size == 0 || config.n_draws == 0 {
            return Err(SimulationError::EmptySample {
                sample_size,
                n_draws: config.n_draws,
            });
        }

        Ok(Self {
            lexicon,
            sample_size,
            threshold: config.max_syllables.unwrap_or(sublex_max),
            config,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn run(&mut self) -> Result<SyllableCountResult, SimulationError> {
        self.run_with_handler(())
    }

    pub fn run_with_handler<H: DrawHandler>(
        &mut self,
        mut handler: H,
    ) -> Result<SyllableCountResult, SimulationError> {
        if self.phase != Phase::Idle {
            return Err(SimulationError::AlreadyRun);
        }
        let name = "syllable count simulation";

        advance(&mut self.phase, Phase::Sampling, name);
        handler.global_init(self.config.n_draws);
        let lexicon = &self.lexicon;
        let sample_size = self.sample_size;
        let extremes: Vec<(usize, usize)> =
            run_draws(self.config.n_draws, self.config.seed, &handler, |rng| {
                choose_ixs_with_replacement(lexicon.len(), sample_size, rng)
                    .into_iter()
                    .map(|ix| lexicon[ix])
                    .minmax()
                    .unwrap_or((0, 0))
            });
        handler.finalize();

        advance(&mut self.phase, Phase::Aggregating, name);
        let maxes: Vec<f64> =
            extremes.iter().map(|&(_, max)| max as f64).collect();
        let mins: Vec<f64> =
            extremes.iter().map(|&(min, _)| min as f64).collect();
        let mut max_lengths = BTreeMap::new();
        extremes
            .iter()
            .for_each(|&(_, max)| tally(&mut max_lengths, max, 1));
        let n_over_threshold = extremes
            .iter()
            .filter(|&&(_, max)| max > self.threshold)
            .count();

        let result = SyllableCountResult {
            n_draws: self.config.n_draws,
            sample_size,
            seed: self.config.seed,
            threshold: self.threshold,
            max_syllables: summarize(&maxes, self.config.n_draws)?,
            min_syllables: summarize(&mins, self.config.n_draws)?,
            n_over_threshold,
            over_threshold_ratio: n_over_threshold as f64
                / self.config.n_draws as f64,
            max_lengths,
        };

        advance(&mut self.phase, Phase::Done, name);
        Ok(result)
    }
}

/// The 95% interval of a per-draw statistic
pub(crate) fn summarize(
    xs: &[f64],
    n_draws: usize,
) -> Result<ConfidenceInterval, SimulationError> {
    ci95(xs).ok_or(SimulationError::EmptySample {
        sample_size: xs.len(),
        n_draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_come_from_the_sublexicon() {
        let sim = SyllableCountSim::new(
            vec![1, 2, 3, 4],
            &[1, 2, 2],
            SimulationConfig::new(),
        )
        .unwrap();
        assert_eq!(sim.sample_size(), 3);
        assert_eq!(sim.threshold(), 2);
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let config = SimulationConfig::new();
        assert_eq!(
            SyllableCountSim::new(vec![], &[1], config.clone()).unwrap_err(),
            SimulationError::EmptyLexicon
        );
        assert_eq!(
            SyllableCountSim::new(vec![1], &[], config.clone()).unwrap_err(),
            SimulationError::EmptySublexicon
        );
        assert!(matches!(
            SyllableCountSim::new(vec![1], &[1], config.n_draws(0)),
            Err(SimulationError::EmptySample { n_draws: 0, .. })
        ));
    }

    #[test]
    fn constant_lexicon_has_no_spread() {
        let config = SimulationConfig::new().n_draws(50).seed(3);
        let mut sim =
            SyllableCountSim::new(vec![2; 5], &[1, 1], config).unwrap();
        let res = sim.run().unwrap();
        assert_relative_eq!(res.max_syllables.mean, 2.0);
        assert_relative_eq!(res.min_syllables.half_width(), 0.0);
        assert_eq!(res.n_over_threshold, 50);
        assert_eq!(res.max_lengths.get(&2), Some(&50));
        assert_eq!(sim.phase(), Phase::Done);
    }

    #[test]
    fn second_run_is_rejected() {
        let config = SimulationConfig::new().n_draws(5).seed(3);
        let mut sim = SyllableCountSim::new(vec![1, 2], &[1], config).unwrap();
        assert!(sim.run().is_ok());
        assert_eq!(sim.run().unwrap_err(), SimulationError::AlreadyRun);
    }

    #[test]
    fn same_seed_same_result() {
        let config = SimulationConfig::new().n_draws(200).seed(42);
        let run = || {
            SyllableCountSim::new(vec![1, 2, 3, 5], &[1, 2], config.clone())
                .unwrap()
                .run()
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
