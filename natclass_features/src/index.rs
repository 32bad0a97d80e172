use std::sync::Arc;

use crate::error::MissingFeatureError;
use crate::inventory::{FeatureSet, Inventory, SegmentSet};

/// Feature → segments index, the inverse of a `FeatureTable`
#[derive(Clone, Debug)]
pub struct FeatureClassIndex {
    inventory: Arc<Inventory>,
    extensions: Vec<SegmentSet>,
}

impl FeatureClassIndex {
    pub(crate) fn new(
        inventory: Arc<Inventory>,
        extensions: Vec<SegmentSet>,
    ) -> Self {
        Self {
            inventory,
            extensions,
        }
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    /// Segments bearing the valued feature `id`
    #[inline]
    pub fn extension(&self, id: usize) -> &SegmentSet {
        &self.extensions[id]
    }

    /// Segments bearing the valued feature `token`, e.g. `+nasal`
    pub fn lookup(&self, token: &str) -> Option<&SegmentSet> {
        self.inventory.token_id(token).map(|id| &self.extensions[id])
    }

    /// Segments bearing every feature in `features`. The empty conjunction
    /// selects every segment.
    pub fn select(&self, features: &FeatureSet) -> SegmentSet {
        let mut segments = self.inventory.all_segments();
        features
            .iter()
            .for_each(|id| segments.intersect_with(&self.extensions[id]));
        segments
    }

    /// Like `select`, but over a slice of feature ids
    pub fn select_ids(&self, ids: &[usize]) -> SegmentSet {
        let mut segments = self.inventory.all_segments();
        ids.iter()
            .for_each(|&id| segments.intersect_with(&self.extensions[id]));
        segments
    }

    /// Segments bearing every feature token
    pub fn feats_to_segs<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<SegmentSet, MissingFeatureError> {
        let ids = tokens
            .iter()
            .map(|t| {
                self.inventory.token_id(t.as_ref()).ok_or_else(|| {
                    MissingFeatureError {
                        feature: t.as_ref().to_owned(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.select_ids(&ids))
    }

    /// Mean extension size of the features. The empty set has size 1 by
    /// convention.
    pub fn mean_extension_size(&self, features: &FeatureSet) -> f64 {
        let n = features.len();
        if n == 0 {
            1.0
        } else {
            self.extension_size_sum(features.iter()) as f64 / n as f64
        }
    }

    pub(crate) fn extension_size_sum<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        ids.into_iter().map(|id| self.extensions[id].len()).sum()
    }

    /// The first of `tokens` that names a column of the table
    fn first_present(
        &self,
        tokens: &[&str],
    ) -> Result<&SegmentSet, MissingFeatureError> {
        tokens
            .iter()
            .find_map(|token| self.lookup(token))
            .ok_or_else(|| MissingFeatureError {
                feature: tokens[0].trim_start_matches(['+', '-']).to_owned(),
            })
    }

    /// `+syllabic` (or `+syll`) segments
    pub fn vowels(&self) -> Result<&SegmentSet, MissingFeatureError> {
        self.first_present(&["+syllabic", "+syll"])
    }

    /// `-syllabic` (or `-syll`) segments
    pub fn consonants(&self) -> Result<&SegmentSet, MissingFeatureError> {
        self.first_present(&["-syllabic", "-syll"])
    }

    /// `-consonantal` (or `-cons`) segments: vowels and glides
    pub fn vocoids(&self) -> Result<&SegmentSet, MissingFeatureError> {
        self.first_present(&["-consonantal", "-cons"])
    }

    /// `+stress` segments
    pub fn stressed(&self) -> Result<&SegmentSet, MissingFeatureError> {
        self.first_present(&["+stress"])
    }
}

#[cfg(test)]
mod tests {
    use crate::FeatureTable;
    use indoc::indoc;

    const TABLE: &str = indoc!(
        "
        \tsyllabic\tconsonantal\tstress\tnasal
        p\t-\t+\t0\t-
        m\t-\t+\t0\t+
        a\t+\t-\t-\t-
        á\t+\t-\t+\t-
        "
    );

    #[test]
    fn well_known_classes() {
        let table = FeatureTable::from_tsv(TABLE).unwrap();
        let index = table.invert();
        let inv = table.inventory();
        assert_eq!(inv.key(index.vowels().unwrap()), "a,á");
        assert_eq!(inv.key(index.consonants().unwrap()), "m,p");
        assert_eq!(inv.key(index.vocoids().unwrap()), "a,á");
        assert_eq!(inv.key(index.stressed().unwrap()), "á");
    }

    #[test]
    fn short_feature_names_are_accepted() {
        let table =
            FeatureTable::from_tsv("\tsyll\tcons\np\t-\t+\na\t+\t-\n").unwrap();
        let index = table.invert();
        assert_eq!(table.inventory().key(index.vowels().unwrap()), "a");
    }

    #[test]
    fn missing_stress_is_reported() {
        let table =
            FeatureTable::from_tsv("\tsyll\tcons\np\t-\t+\na\t+\t-\n").unwrap();
        let err = table.invert().stressed().unwrap_err();
        assert_eq!(err.feature, "stress");
    }

    #[test]
    fn conjunction_selects_intersection() {
        let table = FeatureTable::from_tsv(TABLE).unwrap();
        let index = table.invert();
        let segs = index.feats_to_segs(&["-syllabic", "-nasal"]).unwrap();
        assert_eq!(table.inventory().key(&segs), "p");
        let all = index.feats_to_segs::<&str>(&[]).unwrap();
        assert_eq!(all.len(), 4);
        assert!(index.feats_to_segs(&["+lateral"]).is_err());
    }

    #[test]
    fn mean_extension_size() {
        let table = FeatureTable::from_tsv(TABLE).unwrap();
        let index = table.invert();
        let inv = table.inventory();
        let feats = natclass_utils::BitSet::from_indices(
            inv.n_feature_ids(),
            [
                inv.token_id("-nasal").unwrap(),
                inv.token_id("+nasal").unwrap(),
            ],
        );
        // |-nasal| = 3, |+nasal| = 1
        assert!((index.mean_extension_size(&feats) - 2.0).abs() < 1e-12);
    }
}
