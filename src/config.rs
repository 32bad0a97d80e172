//! Run configuration
use std::fs::File;
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Read any configuration from a YAML file
pub fn from_yaml_path<T, P>(path: P) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    info!("Reading config at {:?}...", path.as_ref());
    let file = File::open(path.as_ref())?;
    let config = serde_yaml::from_reader(file)?;
    Ok(config)
}

/// Configuration for `MonteCarloSimulator` and `SyllableCountSim`
///
/// The number of draws and the seed are required. The sample size defaults
/// to the size of the sublexicon and the syllable threshold to the
/// sublexicon's largest syllable count.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of independent draws
    pub n_draws: usize,
    /// Seed of the master generator
    pub seed: u64,
    /// Words per draw
    #[serde(default)]
    pub sample_size: Option<usize>,
    /// A draw whose longest word has more syllables than this is counted
    /// as over the threshold
    #[serde(default)]
    pub max_syllables: Option<usize>,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            n_draws: 1_000,
            seed: 0,
            sample_size: None,
            max_syllables: None,
        }
    }

    pub fn n_draws(mut self, n_draws: usize) -> Self {
        self.n_draws = n_draws;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn max_syllables(mut self, max_syllables: Option<usize>) -> Self {
        self.max_syllables = max_syllables;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for `GridComparison`
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridComparisonConfig {
    pub n_draws: usize,
    pub seed: u64,
    /// Grid tokens per draw. Defaults to the number of sublexicon tokens.
    #[serde(default)]
    pub sample_size: Option<usize>,
    /// Tally the grid inventories of draws whose longest grid has exactly
    /// this many syllables
    #[serde(default)]
    pub syllable_cap: Option<usize>,
    /// Collapse stressed and unstressed syllables
    #[serde(default)]
    pub ignore_stress: bool,
}

impl GridComparisonConfig {
    pub fn new() -> Self {
        Self {
            n_draws: 1_000,
            seed: 0,
            sample_size: None,
            syllable_cap: None,
            ignore_stress: false,
        }
    }

    pub fn n_draws(mut self, n_draws: usize) -> Self {
        self.n_draws = n_draws;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn syllable_cap(mut self, cap: Option<usize>) -> Self {
        self.syllable_cap = cap;
        self
    }

    pub fn ignore_stress(mut self, ignore_stress: bool) -> Self {
        self.ignore_stress = ignore_stress;
        self
    }
}

impl Default for GridComparisonConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_strip_boundaries() -> bool {
    true
}

fn default_morpheme_boundary() -> Option<String> {
    Some(String::from("|"))
}

/// How word-list lines become words
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WordListConfig {
    /// Drop `#` word-boundary markers
    #[serde(default = "default_strip_boundaries")]
    pub strip_boundaries: bool,
    /// Symbol removed from words wherever it occurs as a segment
    #[serde(default = "default_morpheme_boundary")]
    pub morpheme_boundary: Option<String>,
}

impl WordListConfig {
    pub fn new() -> Self {
        Self {
            strip_boundaries: default_strip_boundaries(),
            morpheme_boundary: default_morpheme_boundary(),
        }
    }

    pub fn strip_boundaries(mut self, strip: bool) -> Self {
        self.strip_boundaries = strip;
        self
    }

    pub fn morpheme_boundary(mut self, symbol: Option<String>) -> Self {
        self.morpheme_boundary = symbol;
        self
    }
}

impl Default for WordListConfig {
    fn default() -> Self {
        Self::new()
    }
}
