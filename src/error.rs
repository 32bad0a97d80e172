use std::io;

use natclass_features::{MissingFeatureError, UnknownSegmentError};
use thiserror::Error;

/// Errors reading a word list
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    /// A line that is not blank but has no segments once boundaries are
    /// removed
    #[error("Line {line} has no segments")]
    EmptyWord { line: usize },
}

/// Errors loading a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("YamlError: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Precondition failures of the simulators. All of them are raised before
/// the first draw.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error(
        "Cannot simulate with sample size {sample_size} and {n_draws} \
        draws. Both must be at least 1"
    )]
    EmptySample { sample_size: usize, n_draws: usize },
    #[error("The reference lexicon is empty")]
    EmptyLexicon,
    #[error("The sublexicon is empty")]
    EmptySublexicon,
    #[error("{0}")]
    MissingFeature(#[from] MissingFeatureError),
    #[error("Word-final segments missing from the feature table. {0}")]
    UnknownSegments(#[from] UnknownSegmentError),
    #[error("The simulation has already been run")]
    AlreadyRun,
}

/// Errors rendering a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("YamlError: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
}
