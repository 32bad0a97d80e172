use std::io;
use thiserror::Error;

/// Errors that abort feature-table construction before any class
/// computation happens
#[derive(Debug, Error)]
pub enum FeatureTableError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("CsvError: {0}")]
    Csv(#[from] csv::Error),
    #[error("The feature table has no header row")]
    EmptyTable,
    #[error("The feature table header names no features")]
    NoFeatures,
    #[error("The feature table has no segment rows")]
    NoSegments,
    #[error(
        "Row {line} (`{segment}`) has {found} feature values but the header \
        names {expected} features"
    )]
    MalformedRow {
        line: usize,
        segment: String,
        expected: usize,
        found: usize,
    },
    #[error(
        "Invalid value `{value}` for feature `{feature}` of segment \
        `{segment}`. Values must be `+`, `-`, or `0`"
    )]
    InvalidValue {
        segment: String,
        feature: String,
        value: String,
    },
    #[error("Segment `{0}` has more than one row")]
    DuplicateSegment(String),
    #[error("Feature `{0}` appears more than once in the header")]
    DuplicateFeature(String),
}

/// A feature the analysis needs is not a column of the table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("The feature table does not include [{feature}]")]
pub struct MissingFeatureError {
    pub feature: String,
}

/// One or more segment symbols are not rows of the feature table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown segments: {}", .segments.join(", "))]
pub struct UnknownSegmentError {
    pub segments: Vec<String>,
}

/// A set of segments that does not correspond to, and is not contained in,
/// any natural class. This is a diagnostic about the segments, not a failure
/// of the class table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IncoherentClassQuery {
    #[error("Cannot find the class of an empty set of segments")]
    Empty,
    #[error("{0}")]
    UnknownSegments(#[from] UnknownSegmentError),
    #[error("{} do not form a natural class", .0.join(","))]
    NoContainingClass(Vec<String>),
}

/// Errors reading a class table back from its text form
#[derive(Debug, Error)]
pub enum ClassTableReadError {
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line} should be `features<TAB>segments`")]
    MalformedLine { line: usize },
    #[error("Line {line}: unknown feature `{token}`")]
    UnknownFeature { line: usize, token: String },
    #[error("Line {line}: {source}")]
    UnknownSegment {
        line: usize,
        source: UnknownSegmentError,
    },
    #[error("Line {line}: class `{key}` appears more than once")]
    DuplicateClass { line: usize, key: String },
}
