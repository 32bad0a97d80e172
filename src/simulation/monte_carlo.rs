use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use natclass_features::{
    ClassSummary, ClassTable, FeatureClassIndex, SegmentSet,
};
use natclass_utils::{
    choose_ixs_with_replacement, tally, tolerance, ConfidenceInterval, MinMax,
};
use serde::Serialize;

use super::syllable_count::summarize;
use super::{advance, run_draws, DrawHandler, Phase};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::lexicon::Lexicon;

/// Label of draws whose final segments are in no common class
pub const NO_CLASS: &str = "None";

/// A natural class that never occurs word-finally in the sublexicon, with
/// how often it was also missing from the finals of a draw
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AbsentClass {
    pub description: String,
    pub segments: String,
    pub size: usize,
    /// Draws in which no word ended in the class
    pub n_absent: usize,
    /// `n_absent / n_draws`: how often chance alone produces the gap
    pub ratio: f64,
    /// Not properly contained in another absent class
    pub maximal: bool,
    /// `false` when the description also selects segments the table
    /// cannot tell apart from the class members
    pub reliable: bool,
}

/// Aggregate output of a `MonteCarloSimulator` run
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SimulationResult {
    pub n_draws: usize,
    pub sample_size: usize,
    pub seed: u64,
    pub threshold: usize,
    /// Longest word per draw, in syllables
    pub max_syllables: ConfidenceInterval,
    /// Shortest word per draw, in syllables
    pub min_syllables: ConfidenceInterval,
    /// Draws whose longest word exceeds the threshold
    pub n_over_threshold: usize,
    pub sublexicon_max_syllables: usize,
    pub sublexicon_size: usize,
    /// Exceptions a generalization over the sublexicon can bear, `n / ln n`.
    /// `None` for fewer than two words.
    pub sublexicon_tolerance: Option<f64>,
    /// Tightest class of the sublexicon's final segments
    pub sublexicon_class: Option<ClassSummary>,
    /// Draws at most as long as the sublexicon whose final class is within
    /// the sublexicon's final class. `None` when the sublexicon's finals are
    /// in no class.
    pub joint: Option<usize>,
    /// Class key of each draw's finals (or `None`) → number of draws
    pub final_classes: BTreeMap<String, usize>,
    /// Longest word → number of draws
    pub max_lengths: BTreeMap<usize, usize>,
    pub absent_classes: Vec<AbsentClass>,
}

impl SimulationResult {
    pub fn joint_ratio(&self) -> Option<f64> {
        self.joint.map(|n| n as f64 / self.n_draws as f64)
    }

    pub fn maximal_absent_classes(&self) -> impl Iterator<Item = &AbsentClass> {
        self.absent_classes.iter().filter(|class| class.maximal)
    }
}

#[derive(Clone, Copy, Debug)]
struct WordProfile {
    syllables: usize,
    final_ix: usize,
}

struct DrawOutcome {
    min: usize,
    max: usize,
    finals: SegmentSet,
    final_class: Option<SegmentSet>,
}

/// Resamples a lexicon and compares each draw's length and word-final
/// natural class with the sublexicon's
pub struct MonteCarloSimulator<'a> {
    classes: &'a ClassTable,
    lexicon: Vec<WordProfile>,
    sublexicon_finals: SegmentSet,
    sublexicon_max_syllables: usize,
    sublexicon_size: usize,
    sublexicon_class: Option<SegmentSet>,
    sample_size: usize,
    threshold: usize,
    config: SimulationConfig,
    phase: Phase,
}

impl<'a> MonteCarloSimulator<'a> {
    /// Validate the inputs. Every precondition is checked here, before any
    /// draw: the sample size and draw count, both lexicons being non-empty,
    /// the table having a syllabic feature, and every word-final segment
    /// being in the table.
    pub fn new(
        index: &FeatureClassIndex,
        classes: &'a ClassTable,
        lexicon: &Lexicon,
        sublexicon: &Lexicon,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        if lexicon.is_empty() {
            return Err(SimulationError::EmptyLexicon);
        }
        if sublexicon.is_empty() {
            return Err(SimulationError::EmptySublexicon);
        }
        let sample_size = config.sample_size.unwrap_or(sublexicon.len());
        if sample_size == 0 || config.n_draws == 0 {
            return Err(SimulationError::EmptySample {
                sample_size,
                n_draws: config.n_draws,
            });
        }

        let inventory = index.inventory();
        let vowels = index.vowels()?;

        // validates every final segment of the lexicon at once
        lexicon.final_set(inventory)?;
        let lexicon: Vec<WordProfile> = lexicon
            .iter()
            .filter_map(|word| {
                inventory.segment_ix(word.final_segment()).map(|final_ix| {
                    WordProfile {
                        syllables: word.syllable_count(vowels, inventory),
                        final_ix,
                    }
                })
            })
            .collect();

        let sublexicon_finals = sublexicon.final_set(inventory)?;
        let sublexicon_max_syllables = sublexicon
            .syllable_counts(vowels, inventory)
            .into_iter()
            .max()
            .unwrap_or(0);
        info!(
            "The maximum syllable count in the sublexicon is {}",
            sublexicon_max_syllables
        );

        let tightest = classes.tightest_class(&sublexicon_finals);
        let sublexicon_class = match tightest {
            Ok(tightest) => {
                let class = tightest.first();
                info!("Sublexicon finals form the class {class}");
                Some(class.extension().clone())
            }
            Err(err) => {
                warn!("Sublexicon finals have no class: {err}");
                None
            }
        };

        Ok(Self {
            classes,
            lexicon,
            sublexicon_finals,
            sublexicon_max_syllables,
            sublexicon_size: sublexicon.len(),
            sublexicon_class,
            sample_size,
            threshold: config.max_syllables.unwrap_or(sublexicon_max_syllables),
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

    pub fn sublexicon_max_syllables(&self) -> usize {
        self.sublexicon_max_syllables
    }

    pub fn run(&mut self) -> Result<SimulationResult, SimulationError> {
        self.run_with_handler(())
    }

    pub fn run_with_handler<H: DrawHandler>(
        &mut self,
        mut handler: H,
    ) -> Result<SimulationResult, SimulationError> {
        if self.phase != Phase::Idle {
            return Err(SimulationError::AlreadyRun);
        }
        let name = "Monte Carlo simulation";
        let n_draws = self.config.n_draws;

        advance(&mut self.phase, Phase::Sampling, name);
        handler.global_init(n_draws);
        let outcomes: Vec<DrawOutcome> =
            run_draws(n_draws, self.config.seed, &handler, |rng| {
                let ixs = choose_ixs_with_replacement(
                    self.lexicon.len(),
                    self.sample_size,
                    rng,
                );
                self.outcome(&ixs)
            });
        handler.finalize();

        advance(&mut self.phase, Phase::Aggregating, name);
        let result = self.aggregate(&outcomes)?;

        advance(&mut self.phase, Phase::Done, name);
        Ok(result)
    }

    fn outcome(&self, ixs: &[usize]) -> DrawOutcome {
        let (min, max) = ixs
            .iter()
            .map(|&ix| self.lexicon[ix].syllables)
            .minmax()
            .unwrap_or((0, 0));
        let mut finals = self.classes.inventory().empty_segments();
        ixs.iter().for_each(|&ix| {
            finals.insert(self.lexicon[ix].final_ix);
        });
        let final_class = self
            .classes
            .tightest_class(&finals)
            .ok()
            .map(|tightest| tightest.first().extension().clone());
        DrawOutcome {
            min,
            max,
            finals,
            final_class,
        }
    }

    fn aggregate(
        &self,
        outcomes: &[DrawOutcome],
    ) -> Result<SimulationResult, SimulationError> {
        let n_draws = self.config.n_draws;
        let inventory = self.classes.inventory();

        let maxes: Vec<f64> = outcomes.iter().map(|o| o.max as f64).collect();
        let mins: Vec<f64> = outcomes.iter().map(|o| o.min as f64).collect();

        let mut max_lengths = BTreeMap::new();
        let mut final_classes = BTreeMap::new();
        outcomes.iter().for_each(|o| {
            tally(&mut max_lengths, o.max, 1);
            let label = o
                .final_class
                .as_ref()
                .map_or_else(|| NO_CLASS.to_owned(), |ext| inventory.key(ext));
            tally(&mut final_classes, label, 1);
        });

        let n_over_threshold =
            outcomes.iter().filter(|o| o.max > self.threshold).count();

        let joint = self.sublexicon_class.as_ref().map(|sublex_class| {
            outcomes
                .iter()
                .filter(|o| {
                    o.max <= self.sublexicon_max_syllables
                        && o.final_class.as_ref().map_or(false, |class| {
                            class.is_subset(sublex_class)
                        })
                })
                .count()
        });

        let maximal: BTreeSet<&SegmentSet> = self
            .classes
            .maximal_missing_classes(&self.sublexicon_finals)
            .into_iter()
            .map(|class| class.extension())
            .collect();
        let absent_classes: Vec<AbsentClass> = self
            .classes
            .missing_classes(&self.sublexicon_finals)
            .into_iter()
            .map(|class| {
                let n_absent = outcomes
                    .iter()
                    .filter(|o| class.extension().is_disjoint(&o.finals))
                    .count();
                AbsentClass {
                    description: class.description_string(),
                    segments: class.key(),
                    size: class.len(),
                    n_absent,
                    ratio: n_absent as f64 / n_draws as f64,
                    maximal: maximal.contains(class.extension()),
                    reliable: class.is_reliable(),
                }
            })
            .collect();
        info!(
            "{} of {} classes never occur word-finally in the sublexicon",
            absent_classes.len(),
            self.classes.len()
        );

        Ok(SimulationResult {
            n_draws,
            sample_size: self.sample_size,
            seed: self.config.seed,
            threshold: self.threshold,
            max_syllables: summarize(&maxes, n_draws)?,
            min_syllables: summarize(&mins, n_draws)?,
            n_over_threshold,
            sublexicon_max_syllables: self.sublexicon_max_syllables,
            sublexicon_size: self.sublexicon_size,
            sublexicon_tolerance: tolerance(self.sublexicon_size),
            sublexicon_class: self
                .sublexicon_class
                .as_ref()
                .and_then(|ext| self.classes.get(ext))
                .map(|class| class.to_summary()),
            joint,
            final_classes,
            max_lengths,
            absent_classes,
        })
    }
}
