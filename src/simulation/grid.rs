use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use natclass_utils::{choose_with_replacement, merge_tallies, tally};
use serde::Serialize;

use super::{advance, run_draws, DrawHandler, Phase};
use crate::config::GridComparisonConfig;
use crate::error::SimulationError;
use crate::prosody::grid_syllables;

/// Grid inventories of the draws whose longest grid has exactly `cap`
/// syllables
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CappedInventories {
    pub cap: usize,
    pub n_draws: usize,
    /// Comma-joined grid types (spaces removed) → number of draws
    pub inventories: BTreeMap<String, usize>,
}

/// Aggregate output of a `GridComparison` run
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GridComparisonResult {
    pub n_draws: usize,
    pub sample_size: usize,
    pub seed: u64,
    /// Draws whose set of grid types equals the sublexicon's
    pub n_same_inventory: usize,
    pub same_inventory_ratio: f64,
    /// Grid type → total times drawn, over every draw. Lexicon types never
    /// drawn are included with 0.
    pub type_counts: BTreeMap<String, usize>,
    pub capped: Option<CappedInventories>,
}

/// Compare a sublexicon's distribution of grid types with samples of the
/// same size from the lexicon's
#[derive(Clone, Debug)]
pub struct GridComparison {
    population: Vec<String>,
    lexicon_types: BTreeSet<String>,
    sublexicon_types: BTreeSet<String>,
    sample_size: usize,
    config: GridComparisonConfig,
    phase: Phase,
}

impl GridComparison {
    /// `lexicon` and `sublexicon` map grids (or any prosodic profile) to the
    /// number of words with them
    pub fn new(
        lexicon: &BTreeMap<String, usize>,
        sublexicon: &BTreeMap<String, usize>,
        config: GridComparisonConfig,
    ) -> Result<Self, SimulationError> {
        // every word is one entry, so sampling follows type frequency
        let population: Vec<String> = lexicon
            .iter()
            .flat_map(|(grid, &count)| {
                std::iter::repeat(grid.clone()).take(count)
            })
            .collect();
        if population.is_empty() {
            return Err(SimulationError::EmptyLexicon);
        }

        let n_sublex: usize = sublexicon.values().sum();
        if n_sublex == 0 {
            return Err(SimulationError::EmptySublexicon);
        }

        let sample_size = config.sample_size.unwrap_or(n_sublex);
        if sample_size == 0 || config.n_draws == 0 {
            return Err(SimulationError::EmptySample {
                sample_size,
                n_draws: config.n_draws,
            });
        }

        Ok(Self {
            population,
            lexicon_types: lexicon.keys().cloned().collect(),
            sublexicon_types: sublexicon
                .iter()
                .filter(|(_, &count)| count > 0)
                .map(|(grid, _)| grid.clone())
                .collect(),
            sample_size,
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

    pub fn run(&mut self) -> Result<GridComparisonResult, SimulationError> {
        self.run_with_handler(())
    }

    pub fn run_with_handler<H: DrawHandler>(
        &mut self,
        mut handler: H,
    ) -> Result<GridComparisonResult, SimulationError> {
        if self.phase != Phase::Idle {
            return Err(SimulationError::AlreadyRun);
        }
        let name = "grid comparison";

        advance(&mut self.phase, Phase::Sampling, name);
        handler.global_init(self.config.n_draws);
        let population = &self.population;
        let sample_size = self.sample_size;
        let draws: Vec<BTreeMap<&str, usize>> =
            run_draws(self.config.n_draws, self.config.seed, &handler, |rng| {
                let mut counts = BTreeMap::new();
                choose_with_replacement(population.as_slice(), sample_size, rng)
                    .into_iter()
                    .for_each(|grid| tally(&mut counts, grid.as_str(), 1));
                counts
            });
        handler.finalize();

        advance(&mut self.phase, Phase::Aggregating, name);
        let mut type_counts: BTreeMap<String, usize> = self
            .lexicon_types
            .iter()
            .map(|grid| (grid.clone(), 0))
            .collect();
        let mut n_same_inventory = 0;
        let mut capped = self.config.syllable_cap.map(|cap| CappedInventories {
            cap,
            n_draws: 0,
            inventories: BTreeMap::new(),
        });

        for draw in &draws {
            let owned: BTreeMap<String, usize> = draw
                .iter()
                .map(|(grid, &count)| ((*grid).to_owned(), count))
                .collect();
            merge_tallies(&mut type_counts, &owned);

            if draw.len() == self.sublexicon_types.len()
                && draw
                    .keys()
                    .all(|grid| self.sublexicon_types.contains(*grid))
            {
                n_same_inventory += 1;
            }

            if let Some(capped) = capped.as_mut() {
                let longest =
                    draw.keys().map(|grid| grid_syllables(grid)).max();
                if longest == Some(capped.cap) {
                    capped.n_draws += 1;
                    let key = draw
                        .keys()
                        .map(|grid| grid.replace(' ', ""))
                        .join(",");
                    tally(&mut capped.inventories, key, 1);
                }
            }
        }

        let result = GridComparisonResult {
            n_draws: self.config.n_draws,
            sample_size: self.sample_size,
            seed: self.config.seed,
            n_same_inventory,
            same_inventory_ratio: n_same_inventory as f64
                / self.config.n_draws as f64,
            type_counts,
            capped,
        };

        advance(&mut self.phase, Phase::Done, name);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    #[test]
    fn sample_size_defaults_to_sublexicon_tokens() {
        let lex = btreemap! {
            "# x #".to_owned() => 10,
            "# x x #".to_owned() => 20,
        };
        let sublex = btreemap! {
            "# x #".to_owned() => 3,
            "# x x #".to_owned() => 2,
        };
        let sim =
            GridComparison::new(&lex, &sublex, GridComparisonConfig::new())
                .unwrap();
        assert_eq!(sim.sample_size(), 5);
    }

    #[test]
    fn single_type_always_matches() {
        let lex = btreemap! { "# x #".to_owned() => 4 };
        let sublex = btreemap! { "# x #".to_owned() => 2 };
        let config = GridComparisonConfig::new()
            .n_draws(20)
            .seed(1)
            .syllable_cap(Some(1));
        let res = GridComparison::new(&lex, &sublex, config)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(res.n_same_inventory, 20);
        assert_eq!(res.type_counts["# x #"], 40);
        let capped = res.capped.unwrap();
        assert_eq!(capped.n_draws, 20);
        assert_eq!(capped.inventories["#x#"], 20);
    }

    #[test]
    fn unreachable_inventory_never_matches() {
        let lex = btreemap! {
            "# x #".to_owned() => 4,
            "# x X #".to_owned() => 1,
        };
        let sublex = btreemap! { "# X x x #".to_owned() => 1 };
        let config = GridComparisonConfig::new().n_draws(30).seed(9);
        let res = GridComparison::new(&lex, &sublex, config)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(res.n_same_inventory, 0);
        assert_eq!(res.type_counts.values().sum::<usize>(), 30);
        assert!(res.capped.is_none());
    }

    #[test]
    fn empty_sublexicon_is_rejected() {
        let lex = btreemap! { "# x #".to_owned() => 4 };
        let sublex = BTreeMap::new();
        assert_eq!(
            GridComparison::new(&lex, &sublex, GridComparisonConfig::new())
                .unwrap_err(),
            SimulationError::EmptySublexicon
        );
    }
}
