//! Natural classes and lexicon statistics for phonological analysis.
//!
//! Compute every natural class of a segment × feature table, profile the
//! words of a lexicon (syllable counts, CV skeleta, stress grids, segment
//! and natural-class n-grams), and test by Monte Carlo resampling whether a
//! sublexicon's restrictions could arise by chance.
//!
//! # Example
//!
//! Does a sublexicon whose words all end in nasals look like a random sample
//! of the lexicon?
//!
//! ```
//! use natclass::{ClassTable, FeatureTable, Lexicon, SimulationConfig};
//! use natclass::simulation::MonteCarloSimulator;
//! use indoc::indoc;
//!
//! let table = FeatureTable::from_tsv(indoc!(
//!     "
//!     \tsyll\tcons\tnasal\tlab
//!     p\t-\t+\t-\t+
//!     t\t-\t+\t-\t-
//!     m\t-\t+\t+\t+
//!     n\t-\t+\t+\t-
//!     a\t+\t-\t0\t0
//!     "
//! ))
//! .unwrap();
//! let index = table.invert();
//! let classes = ClassTable::from_feature_table(&table);
//!
//! let lexicon =
//!     Lexicon::from_transcriptions(["p a m", "t a n", "p a t", "m a"]);
//! let sublexicon = Lexicon::from_transcriptions(["p a m", "t a n"]);
//!
//! let config = SimulationConfig::new().n_draws(500).seed(1337);
//! let mut sim = MonteCarloSimulator::new(
//!     &index,
//!     &classes,
//!     &lexicon,
//!     &sublexicon,
//!     config,
//! )
//! .unwrap();
//! let result = sim.run().unwrap();
//!
//! let sublex_class = result.sublexicon_class.as_ref().unwrap();
//! assert_eq!(sublex_class.description, vec!["+nasal"]);
//! assert!(result.joint.unwrap() < 500);
//! ```
#![warn(unused_extern_crates)]
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]

pub mod config;
pub mod error;
pub mod lexicon;
pub mod ngrams;
pub mod prosody;
pub mod report;
pub mod simulation;

pub use config::{GridComparisonConfig, SimulationConfig, WordListConfig};
pub use error::{ConfigError, LexiconError, ReportError, SimulationError};
pub use lexicon::{Lexicon, Word};
pub use natclass_features::{
    Ambiguity, AmbiguityKind, ClassRef, ClassTable, FeatureClassIndex,
    FeatureTable, IncoherentClassQuery, MissingFeatureError, TightestClass,
};
pub use prosody::Prosody;
pub use report::{ambiguity_marker, emit, KeyValueReport, OutputFormat};

pub use natclass_features as features;
pub use natclass_utils as utils;
