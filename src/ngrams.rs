//! Segment and natural-class n-grams, and lexicon/sublexicon comparison
use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::{info, warn};
use natclass_features::{ClassTable, UnknownSegmentError};
use natclass_utils::tally;
use serde::Serialize;

use crate::lexicon::{Lexicon, BOUNDARY};

/// Longest segment n-gram counted
pub const MAX_SEGMENT_N: usize = 3;

/// Count every n-gram, `1 <= n <= max_n`, of `tokens`, adding `weight` per
/// occurrence. N-grams are the tokens joined by spaces.
pub fn count_ngrams<S: AsRef<str>>(
    tokens: &[S],
    max_n: usize,
    weight: usize,
    counts: &mut BTreeMap<String, usize>,
) {
    for n in 1..=max_n {
        tokens.windows(n).for_each(|window| {
            let gram = window.iter().map(|t| t.as_ref()).join(" ");
            tally(counts, gram, weight);
        });
    }
}

/// Segment uni-, bi-, and trigrams over boundary-marked words
pub fn segment_ngrams(lexicon: &Lexicon) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    lexicon.iter().for_each(|word| {
        count_ngrams(&word.bounded(), MAX_SEGMENT_N, 1, &mut counts)
    });
    info!("{} segment n-grams", counts.len());
    counts
}

/// Expand every segment n-gram into the n-grams of the natural classes its
/// segments belong to. Each class n-gram gets the counts of every segment
/// n-gram it expands. The boundary maps to itself.
pub fn class_ngrams(
    segment_ngrams: &BTreeMap<String, usize>,
    classes: &ClassTable,
) -> Result<BTreeMap<String, usize>, UnknownSegmentError> {
    let labels: BTreeMap<String, Vec<String>> = classes
        .segment_class_map()
        .into_iter()
        .map(|(seg, classes)| {
            (seg, classes.iter().map(|class| class.label()).collect())
        })
        .collect();
    let boundary = vec![BOUNDARY.to_owned()];

    let mut unknown = BTreeSet::new();
    let mut counts = BTreeMap::new();
    for (gram, &count) in segment_ngrams {
        let expansions: Vec<&Vec<String>> = gram
            .split(' ')
            .filter_map(|seg| {
                if seg == BOUNDARY {
                    Some(&boundary)
                } else {
                    let found = labels.get(seg);
                    if found.is_none() {
                        unknown.insert(seg.to_owned());
                    }
                    found
                }
            })
            .collect();

        if !unknown.is_empty() {
            continue;
        }

        expansions
            .into_iter()
            .multi_cartesian_product()
            .for_each(|class_gram| {
                tally(&mut counts, class_gram.iter().join(" "), count)
            });
    }

    if unknown.is_empty() {
        info!("{} natural class n-grams", counts.len());
        Ok(counts)
    } else {
        Err(UnknownSegmentError {
            segments: unknown.into_iter().collect(),
        })
    }
}

/// Counts of one n-gram in a lexicon and a sublexicon
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JointCounts {
    pub lex: usize,
    pub sublex: usize,
}

/// Every n-gram of either table with its count in each
pub fn joint_table(
    lex: &BTreeMap<String, usize>,
    sublex: &BTreeMap<String, usize>,
) -> BTreeMap<String, JointCounts> {
    let mut joint: BTreeMap<String, JointCounts> = lex
        .iter()
        .map(|(gram, &count)| {
            (gram.clone(), JointCounts { lex: count, sublex: 0 })
        })
        .collect();
    sublex.iter().for_each(|(gram, &count)| {
        joint.entry(gram.clone()).or_default().sublex = count;
    });
    joint
}

/// N-grams of the lexicon that do not occur in the sublexicon. N-grams
/// found only in the sublexicon are reported and included.
pub fn ngram_diff(
    lex: &BTreeMap<String, usize>,
    sublex: &BTreeMap<String, usize>,
) -> BTreeSet<String> {
    let mut diff: BTreeSet<String> = lex
        .keys()
        .filter(|gram| !sublex.contains_key(*gram))
        .cloned()
        .collect();
    sublex.keys().filter(|gram| !lex.contains_key(*gram)).for_each(|gram| {
        warn!("`{gram}` is in the sublexicon but not in the lexicon");
        diff.insert(gram.clone());
    });
    info!(
        "{} n-grams of the lexicon do not occur in the sublexicon",
        diff.len()
    );
    diff
}
