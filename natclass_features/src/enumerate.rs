//! Exhaustive enumeration of natural classes.
//!
//! Every segment is a class by itself. Beyond that, every non-empty subset of
//! a segment's features picks out the segments sharing all of them; each such
//! set with at least two members is a natural class whose full description
//! is the intersection of its members' feature sets.
use std::collections::{BTreeMap, HashSet};

use log::info;
use rayon::prelude::*;

use crate::index::FeatureClassIndex;
use crate::inventory::{FeatureSet, SegmentSet};
use crate::table::FeatureTable;

/// Extension → full (non-minimal) description
pub type VerboseClasses = BTreeMap<SegmentSet, FeatureSet>;

/// Enumerate every natural class of the table.
///
/// Exponential in the number of features per segment. Subsets are visited
/// depth-first with a running intersection, and a branch is cut as soon as
/// the running extension shrinks to the segment itself, since no superset of
/// those features can select anything else.
pub fn enumerate_all(
    table: &FeatureTable,
    index: &FeatureClassIndex,
) -> VerboseClasses {
    let per_segment: Vec<Vec<(SegmentSet, FeatureSet)>> = (0..table
        .n_segments())
        .into_par_iter()
        .map(|seg_ix| classes_of_segment(table, index, seg_ix))
        .collect();

    let mut classes = VerboseClasses::new();
    per_segment.into_iter().flatten().for_each(|(ext, desc)| {
        // the description is a function of the extension, so repeats agree
        classes.entry(ext).or_insert(desc);
    });

    info!("{} natural classes", classes.len());
    classes
}

fn classes_of_segment(
    table: &FeatureTable,
    index: &FeatureClassIndex,
    seg_ix: usize,
) -> Vec<(SegmentSet, FeatureSet)> {
    let inventory = table.inventory();
    let spec = table.features_of(seg_ix);

    let mut singleton = inventory.empty_segments();
    singleton.insert(seg_ix);

    let mut found: Vec<(SegmentSet, FeatureSet)> =
        vec![(singleton, spec.clone())];
    let mut seen: HashSet<SegmentSet> = HashSet::new();

    let features: Vec<usize> = spec.iter().collect();
    let all = inventory.all_segments();
    visit(&features, 0, &all, index, &mut |ext: &SegmentSet| {
        if seen.insert(ext.clone()) {
            found.push((ext.clone(), table.segs_to_feats(ext)));
        }
    });

    found
}

fn visit<F>(
    features: &[usize],
    start: usize,
    current: &SegmentSet,
    index: &FeatureClassIndex,
    record: &mut F,
) where
    F: FnMut(&SegmentSet),
{
    for i in start..features.len() {
        let next = current.intersection(index.extension(features[i]));
        if next.len() >= 2 {
            record(&next);
            visit(features, i + 1, &next, index, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const PAI: &str = indoc!(
        "
        \tsyll\tcons\tson\tcont\thigh
        p\t0\t+\t-\t-\t0
        a\t+\t-\t+\t0\t0
        i\t+\t-\t+\t0\t+
        "
    );

    fn keyed(
        table: &FeatureTable,
        classes: &VerboseClasses,
    ) -> Vec<(String, String)> {
        let inv = table.inventory();
        let mut out: Vec<(String, String)> = classes
            .iter()
            .map(|(ext, desc)| (inv.key(ext), inv.description(desc)))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn enumerates_singletons_and_shared_classes() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let classes = enumerate_all(&table, &table.invert());
        assert_eq!(
            keyed(&table, &classes),
            vec![
                ("a".to_owned(), "+syll,-cons,+son".to_owned()),
                ("a,i".to_owned(), "+syll,-cons,+son".to_owned()),
                ("i".to_owned(), "+syll,-cons,+son,+high".to_owned()),
                ("p".to_owned(), "+cons,-son,-cont".to_owned()),
            ]
        );
    }

    #[test]
    fn classes_are_unions_over_segments() {
        let text = indoc!(
            "
            \tcons\tson\tnasal\tvoice
            p\t+\t-\t-\t-
            b\t+\t-\t-\t+
            m\t+\t+\t+\t+
            a\t-\t+\t-\t+
            "
        );
        let table = FeatureTable::from_tsv(text).unwrap();
        let classes = enumerate_all(&table, &table.invert());
        let keys: Vec<String> =
            keyed(&table, &classes).into_iter().map(|(k, _)| k).collect();
        for key in [
            "a", "b", "m", "p", "b,p", "a,m", "b,m", "b,m,p", "a,b", "a,b,m",
            "a,b,p",
        ] {
            assert!(keys.contains(&key.to_owned()), "missing class {key}");
        }
        // m and p share only +cons, which also picks out b
        assert!(!keys.contains(&"m,p".to_owned()));
    }

    #[test]
    fn every_description_selects_at_least_its_extension() {
        let text = indoc!(
            "
            \tcons\tson\tnasal\tvoice
            p\t+\t-\t-\t-
            b\t+\t-\t-\t+
            m\t+\t+\t+\t+
            a\t-\t+\t-\t+
            "
        );
        let table = FeatureTable::from_tsv(text).unwrap();
        let index = table.invert();
        let classes = enumerate_all(&table, &index);
        for (ext, desc) in &classes {
            assert!(index.select(desc).is_superset(ext));
            if ext.len() > 1 {
                assert_eq!(&index.select(desc), ext);
            }
        }
    }
}
