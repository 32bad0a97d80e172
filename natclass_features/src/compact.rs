//! Minimal descriptions for enumerated classes.
//!
//! A class's description is replaced by the shortest proper subset of it that
//! selects exactly the same segments. Among equally short candidates the one
//! whose features have the smallest mean extension size wins, i.e. the
//! candidate built from the most specific features. Remaining ties go to the
//! candidate that comes first in canonical feature order, comparing the
//! sorted feature ids lexicographically. The choice is therefore a total
//! order and does not depend on enumeration or thread scheduling.
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::classes::ClassTable;
use crate::enumerate::VerboseClasses;
use crate::index::FeatureClassIndex;
use crate::inventory::{FeatureSet, SegmentSet};

/// Find the minimal description of every class
pub fn compact(
    classes: &VerboseClasses,
    index: &FeatureClassIndex,
) -> ClassTable {
    let inventory = Arc::clone(index.inventory());

    let compacted: Vec<(SegmentSet, FeatureSet)> = classes
        .par_iter()
        .map(|(ext, desc)| (ext.clone(), minimal_description(ext, desc, index)))
        .collect();

    let classes: BTreeMap<SegmentSet, FeatureSet> =
        compacted.into_iter().collect();

    // A description can select more than its extension only when segments
    // are indistinguishable
    let unreliable: Vec<SegmentSet> = classes
        .iter()
        .filter(|(ext, desc)| &index.select(desc) != *ext)
        .map(|(ext, _)| ext.clone())
        .collect();

    unreliable.iter().for_each(|ext| {
        warn!(
            "Class {{{}}} cannot be described uniquely; its membership is \
            unreliable",
            inventory.key(ext)
        )
    });

    info!("{} classes compacted", classes.len());
    ClassTable::new(inventory, classes, unreliable.into_iter().collect())
}

/// Candidate ordering key: (number of features, summed extension size,
/// feature ids). With the size fixed, a smaller sum is a smaller mean.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CandidateKey {
    n_features: usize,
    extension_sum: usize,
    ids: Vec<usize>,
}

/// The minimal description of `extension` among the proper subsets of
/// `description`, or `description` itself if no proper subset works.
pub fn minimal_description(
    extension: &SegmentSet,
    description: &FeatureSet,
    index: &FeatureClassIndex,
) -> FeatureSet {
    let features: Vec<usize> = description.iter().collect();
    let n_ids = index.inventory().n_feature_ids();

    // Candidates are searched by increasing size; the first size with any
    // candidate holds every shortest one.
    for size in 1..features.len() {
        let best = features
            .iter()
            .copied()
            .combinations(size)
            .map(|ids| FeatureSet::from_indices(n_ids, ids))
            .filter(|candidate| &index.select(candidate) == extension)
            .min_by(|a, b| compare_descriptions(a, b, index));

        if let Some(best) = best {
            debug!(
                "{} described by {} features instead of {}",
                index.inventory().key(extension),
                best.len(),
                features.len()
            );
            return best;
        }
    }

    description.clone()
}

/// Order two descriptions by size, then by mean extension size, then by
/// canonical feature order
pub fn compare_descriptions(
    a: &FeatureSet,
    b: &FeatureSet,
    index: &FeatureClassIndex,
) -> Ordering {
    let key = |set: &FeatureSet| CandidateKey {
        n_features: set.len(),
        extension_sum: index.extension_size_sum(set.iter()),
        ids: set.iter().collect(),
    };
    key(a).cmp(&key(b))
}
