use std::collections::HashMap;

use natclass_utils::BitSet;

use crate::error::UnknownSegmentError;
use crate::feature::{Sign, ValuedFeature};

/// A set of segments, by segment index
pub type SegmentSet = BitSet;

/// A set of valued features, by feature id
pub type FeatureSet = BitSet;

/// Interns segment symbols and feature names as dense indices.
///
/// Segment `i` is the `i`-th row of the feature table. Valued feature ids
/// follow the column order of the header: the feature in column `c` has id
/// `2c` when `+` and `2c + 1` when `-`. Id order is the canonical feature
/// order used wherever descriptions are enumerated or printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    segments: Vec<String>,
    features: Vec<String>,
    segment_lookup: HashMap<String, usize>,
    feature_lookup: HashMap<String, usize>,
}

impl Inventory {
    pub(crate) fn new(segments: Vec<String>, features: Vec<String>) -> Self {
        let segment_lookup = segments
            .iter()
            .enumerate()
            .map(|(ix, s)| (s.clone(), ix))
            .collect();
        let feature_lookup = features
            .iter()
            .enumerate()
            .map(|(ix, f)| (f.clone(), ix))
            .collect();
        Self {
            segments,
            features,
            segment_lookup,
            feature_lookup,
        }
    }

    #[inline]
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// Number of feature columns
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Number of valued-feature ids (two per column)
    #[inline]
    pub fn n_feature_ids(&self) -> usize {
        2 * self.features.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    pub fn segment_ix(&self, segment: &str) -> Option<usize> {
        self.segment_lookup.get(segment).copied()
    }

    pub fn segment_name(&self, ix: usize) -> &str {
        &self.segments[ix]
    }

    pub fn feature_id(&self, feature: &ValuedFeature) -> Option<usize> {
        self.feature_lookup
            .get(&feature.name)
            .map(|&col| 2 * col + feature.sign.offset())
    }

    /// Look up a feature id from a token like `+syllabic`
    pub fn token_id(&self, token: &str) -> Option<usize> {
        token
            .parse::<ValuedFeature>()
            .ok()
            .and_then(|vf| self.feature_id(&vf))
    }

    pub fn valued_feature(&self, id: usize) -> ValuedFeature {
        let sign = if id % 2 == 0 { Sign::Plus } else { Sign::Minus };
        ValuedFeature::new(sign, self.features[id / 2].clone())
    }

    pub fn token(&self, id: usize) -> String {
        self.valued_feature(id).to_string()
    }

    pub fn empty_segments(&self) -> SegmentSet {
        SegmentSet::new(self.n_segments())
    }

    pub fn all_segments(&self) -> SegmentSet {
        SegmentSet::full(self.n_segments())
    }

    pub fn empty_features(&self) -> FeatureSet {
        FeatureSet::new(self.n_feature_ids())
    }

    /// Convert segment symbols into a set. Every unknown symbol is reported.
    pub fn segment_set<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<SegmentSet, UnknownSegmentError> {
        let mut set = self.empty_segments();
        let mut unknown = Vec::new();
        for seg in segments {
            match self.segment_ix(seg.as_ref()) {
                Some(ix) => {
                    set.insert(ix);
                }
                None => unknown.push(seg.as_ref().to_owned()),
            }
        }
        if unknown.is_empty() {
            Ok(set)
        } else {
            Err(UnknownSegmentError { segments: unknown })
        }
    }

    /// Segment symbols of a set, sorted
    pub fn segment_names(&self, set: &SegmentSet) -> Vec<&str> {
        let mut names: Vec<&str> =
            set.iter().map(|ix| self.segments[ix].as_str()).collect();
        names.sort_unstable();
        names
    }

    /// The canonical class key: sorted, comma-joined segment symbols
    pub fn key(&self, set: &SegmentSet) -> String {
        self.segment_names(set).join(",")
    }

    /// Feature tokens of a set in canonical (column) order
    pub fn tokens(&self, set: &FeatureSet) -> Vec<String> {
        set.iter().map(|id| self.token(id)).collect()
    }

    /// Comma-joined feature tokens in canonical order
    pub fn description(&self, set: &FeatureSet) -> String {
        self.tokens(set).join(",")
    }
}
