use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The value of a feature on a segment. Zero-valued features are not stored.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn symbol(&self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }

    /// Parse a feature-table cell. `0` is unspecified and yields `None`.
    pub fn from_cell(cell: &str) -> Result<Option<Self>, InvalidSignError> {
        match cell {
            "+" => Ok(Some(Self::Plus)),
            "-" => Ok(Some(Self::Minus)),
            "0" => Ok(None),
            _ => Err(InvalidSignError(cell.to_owned())),
        }
    }

    /// Offset of this sign within a feature's pair of ids
    pub(crate) fn offset(&self) -> usize {
        match self {
            Self::Plus => 0,
            Self::Minus => 1,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{0}` is not a feature value")]
pub struct InvalidSignError(pub String);

/// A (sign, name) pair such as `+nasal`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValuedFeature {
    pub sign: Sign,
    pub name: String,
}

impl ValuedFeature {
    pub fn new(sign: Sign, name: impl Into<String>) -> Self {
        Self {
            sign,
            name: name.into(),
        }
    }

    pub fn plus(name: impl Into<String>) -> Self {
        Self::new(Sign::Plus, name)
    }

    pub fn minus(name: impl Into<String>) -> Self {
        Self::new(Sign::Minus, name)
    }
}

impl fmt::Display for ValuedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign.symbol(), self.name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{0}` is not a valued feature; expected e.g. `+nasal` or `-son`")]
pub struct ParseValuedFeatureError(pub String);

impl FromStr for ValuedFeature {
    type Err = ParseValuedFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let sign = match chars.next() {
            Some('+') => Sign::Plus,
            Some('-') => Sign::Minus,
            _ => return Err(ParseValuedFeatureError(s.to_owned())),
        };
        let name = chars.as_str();
        if name.is_empty() {
            Err(ParseValuedFeatureError(s.to_owned()))
        } else {
            Ok(Self::new(sign, name))
        }
    }
}
