use clap::{Parser, Subcommand, ValueEnum};
use natclass::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "natclass", author, version, about)]
pub struct Opt {
    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute every natural class of a feature table
    Classes(ClassesArgs),
    /// Query the natural classes of a feature table
    Query(QueryArgs),
    /// Count syllables, CV skeleta, or x-grids in a word list
    Prosody(ProsodyArgs),
    /// Count segment or natural-class n-grams in a word list
    Ngrams(NgramsArgs),
    /// Simulate word length and word-final classes by resampling a lexicon
    Simulate(SimulateArgs),
    /// Compare x-grid distributions by resampling a lexicon
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
pub struct ClassesArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Write the class table here instead of stdout
    #[clap(long, short)]
    pub output: Option<PathBuf>,
    /// List the classes of every segment instead
    #[clap(long)]
    pub by_segment: bool,
    /// Only report segments the table cannot tell apart
    #[clap(long, conflicts_with = "by_segment")]
    pub check: bool,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Find the tightest class containing these comma-separated segments
    #[clap(long, group = "query")]
    pub tightest: Option<String>,
    /// Find the classes sharing no segment with these comma-separated
    /// segments
    #[clap(long, group = "query")]
    pub missing: Option<String>,
    /// Find the classes a segment belongs to
    #[clap(long, group = "query")]
    pub segment: Option<String>,
    /// Find the segments bearing every one of these comma-separated features
    #[clap(long, group = "query")]
    pub features_of: Option<String>,
    /// With --missing, only report classes not contained in another missing
    /// class
    #[clap(long, requires = "missing")]
    pub maximal: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    Syllables,
    Cv,
    Grids,
}

#[derive(Parser, Debug)]
pub struct WordListArgs {
    /// Keep `#` boundary markers as segments
    #[clap(long)]
    pub keep_boundaries: bool,
    /// Morpheme-boundary symbol removed from words
    #[clap(long, default_value = "|")]
    pub morpheme_boundary: String,
}

impl WordListArgs {
    pub fn config(&self) -> natclass::WordListConfig {
        natclass::WordListConfig::new()
            .strip_boundaries(!self.keep_boundaries)
            .morpheme_boundary(Some(self.morpheme_boundary.clone()))
    }
}

#[derive(Parser, Debug)]
pub struct ProsodyArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Path to the word list
    #[clap(name = "WORDS")]
    pub words: PathBuf,
    /// Which profile to count
    #[clap(long, value_enum, default_value = "grids")]
    pub profile: Profile,
    /// Count n-grams of the profile and compare with this sublexicon
    #[clap(long)]
    pub sublexicon: Option<PathBuf>,
    /// Only list n-grams of the lexicon missing from the sublexicon
    #[clap(long, requires = "sublexicon")]
    pub diff: bool,
    /// Do not distinguish stressed syllables in grids
    #[clap(long)]
    pub ignore_stress: bool,
    #[clap(flatten)]
    pub word_list: WordListArgs,
}

#[derive(Parser, Debug)]
pub struct NgramsArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Path to the word list
    #[clap(name = "WORDS")]
    pub words: PathBuf,
    /// Count natural-class n-grams instead of segment n-grams
    #[clap(long)]
    pub classes: bool,
    /// Compare with this sublexicon
    #[clap(long)]
    pub sublexicon: Option<PathBuf>,
    /// Only list n-grams of the lexicon missing from the sublexicon
    #[clap(long, requires = "sublexicon")]
    pub diff: bool,
    #[clap(flatten)]
    pub word_list: WordListArgs,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Path to the reference lexicon
    #[clap(name = "LEXICON")]
    pub lexicon: PathBuf,
    /// Path to the sublexicon
    #[clap(name = "SUBLEXICON")]
    pub sublexicon: PathBuf,
    /// Number of draws
    #[clap(long, short = 'n', default_value = "1000")]
    pub n_draws: usize,
    /// The PRNG seed
    #[clap(long, default_value = "0")]
    pub seed: u64,
    /// Words per draw. Defaults to the size of the sublexicon.
    #[clap(long)]
    pub sample_size: Option<usize>,
    /// Syllable threshold. Defaults to the sublexicon's longest word.
    #[clap(long)]
    pub max_syllables: Option<usize>,
    /// Path to a simulation config YAML
    #[clap(
        long,
        conflicts_with_all = &[
            "n_draws",
            "seed",
            "sample_size",
            "max_syllables",
        ],
    )]
    pub config: Option<PathBuf>,
    /// Only simulate word length
    #[clap(long)]
    pub lengths_only: bool,
    /// Count every distinct word once. By default repeated lines are kept,
    /// weighting the draws and the default sample size.
    #[clap(long)]
    pub types: bool,
    /// Format of the report
    #[clap(long, short = 'f', default_value = "text")]
    pub output_format: OutputFormat,
    /// Do not display run progress
    #[clap(long, short)]
    pub quiet: bool,
    #[clap(flatten)]
    pub word_list: WordListArgs,
}

impl SimulateArgs {
    pub fn simulation_config(
        &self,
    ) -> Result<natclass::SimulationConfig, natclass::ConfigError> {
        match &self.config {
            Some(path) => natclass::config::from_yaml_path(path),
            None => Ok(natclass::SimulationConfig::new()
                .n_draws(self.n_draws)
                .seed(self.seed)
                .sample_size(self.sample_size)
                .max_syllables(self.max_syllables)),
        }
    }
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Path to the tab-separated feature table
    #[clap(name = "FEATURES")]
    pub features: PathBuf,
    /// Path to the reference lexicon
    #[clap(name = "LEXICON")]
    pub lexicon: PathBuf,
    /// Path to the sublexicon
    #[clap(name = "SUBLEXICON")]
    pub sublexicon: PathBuf,
    /// Number of draws
    #[clap(long, short = 'n', default_value = "1000")]
    pub n_draws: usize,
    /// The PRNG seed
    #[clap(long, default_value = "0")]
    pub seed: u64,
    /// Grids per draw. Defaults to the size of the sublexicon.
    #[clap(long)]
    pub sample_size: Option<usize>,
    /// Tally the inventories of draws whose longest grid has this many
    /// syllables
    #[clap(long)]
    pub cap: Option<usize>,
    /// Do not distinguish stressed syllables
    #[clap(long)]
    pub ignore_stress: bool,
    /// Path to a grid comparison config YAML
    #[clap(
        long,
        conflicts_with_all = &[
            "n_draws",
            "seed",
            "sample_size",
            "cap",
            "ignore_stress",
        ],
    )]
    pub config: Option<PathBuf>,
    /// Format of the report
    #[clap(long, short = 'f', default_value = "text")]
    pub output_format: OutputFormat,
    /// Do not display run progress
    #[clap(long, short)]
    pub quiet: bool,
    #[clap(flatten)]
    pub word_list: WordListArgs,
}

impl CompareArgs {
    pub fn comparison_config(
        &self,
    ) -> Result<natclass::GridComparisonConfig, natclass::ConfigError> {
        match &self.config {
            Some(path) => natclass::config::from_yaml_path(path),
            None => Ok(natclass::GridComparisonConfig::new()
                .n_draws(self.n_draws)
                .seed(self.seed)
                .sample_size(self.sample_size)
                .syllable_cap(self.cap)
                .ignore_stress(self.ignore_stress)),
        }
    }
}
