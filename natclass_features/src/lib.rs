//! Natural classes of a phonological feature table.
//!
//! A feature table assigns each segment a `+`, `-`, or `0` value for each
//! feature. A natural class is a set of segments picked out by the
//! conjunction of some valued features. This crate enumerates every natural
//! class of a table, finds the minimal description of each, and answers
//! membership queries over the result.
//!
//! # Example
//!
//! ```
//! use natclass_features::{ClassTable, FeatureTable};
//! use indoc::indoc;
//!
//! let table = FeatureTable::from_tsv(indoc!(
//!     "
//!     \tsyll\tcons\tson\tcont\thigh
//!     p\t0\t+\t-\t-\t0
//!     a\t+\t-\t+\t0\t0
//!     i\t+\t-\t+\t0\t+
//!     "
//! ))
//! .unwrap();
//!
//! let classes = ClassTable::from_feature_table(&table);
//! let vowels = classes.tightest_class_by_names(&["a", "i"]).unwrap();
//!
//! assert!(vowels.is_exact());
//! assert_eq!(vowels.first().description_string(), "+syll");
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

mod classes;
pub mod compact;
pub mod enumerate;
pub mod error;
mod feature;
mod index;
mod inventory;
mod query;
mod table;

pub use classes::{ClassRef, ClassSummary, ClassTable};
pub use error::*;
pub use feature::{
    InvalidSignError, ParseValuedFeatureError, Sign, ValuedFeature,
};
pub use index::FeatureClassIndex;
pub use inventory::{FeatureSet, Inventory, SegmentSet};
pub use query::TightestClass;
pub use table::{Ambiguity, AmbiguityKind, FeatureTable};
