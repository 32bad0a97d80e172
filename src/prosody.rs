//! Prosodic profiles: syllable counts, CV skeleta, and x-grids
//!
//! An x-grid abstracts a word to its syllables: `# x X x #` is a
//! three-syllable word stressed on the second syllable. A CV skeleton maps
//! consonants to `C` and vowels to `V`, or `VV` for vowels written with
//! more than one character.
use std::collections::BTreeMap;

use natclass_features::{
    FeatureClassIndex, Inventory, MissingFeatureError, SegmentSet,
};
use natclass_utils::tally;

use crate::lexicon::{Lexicon, Word, BOUNDARY};
use crate::ngrams::count_ngrams;

/// Longest grid n-gram counted
pub const MAX_GRID_N: usize = 4;

/// Syllable-level views of words under one feature table
///
/// Vowels (`+syllabic`) are required. Consonants are needed only for CV
/// skeleta and stress only for stress-sensitive grids.
pub struct Prosody<'a> {
    inventory: &'a Inventory,
    vowels: &'a SegmentSet,
    consonants: Result<&'a SegmentSet, MissingFeatureError>,
    stressed: Result<&'a SegmentSet, MissingFeatureError>,
}

impl<'a> Prosody<'a> {
    pub fn new(
        index: &'a FeatureClassIndex,
    ) -> Result<Self, MissingFeatureError> {
        Ok(Self {
            inventory: index.inventory(),
            vowels: index.vowels()?,
            consonants: index.consonants(),
            stressed: index.stressed(),
        })
    }

    fn is_in(&self, set: &SegmentSet, seg: &str) -> bool {
        self.inventory
            .segment_ix(seg)
            .map_or(false, |ix| set.contains(ix))
    }

    pub fn syllable_count(&self, word: &Word) -> usize {
        word.syllable_count(self.vowels, self.inventory)
    }

    /// Histogram: syllable count → number of words
    pub fn syllable_counts(&self, lexicon: &Lexicon) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        lexicon
            .iter()
            .for_each(|word| tally(&mut counts, self.syllable_count(word), 1));
        counts
    }

    /// Word → syllable count
    pub fn syllable_count_map(
        &self,
        lexicon: &Lexicon,
    ) -> BTreeMap<String, usize> {
        lexicon
            .iter()
            .map(|word| (word.to_string(), self.syllable_count(word)))
            .collect()
    }

    /// The boundary-marked skeleton, e.g. `# C V C VV #`. Symbols that are
    /// neither consonants nor vowels are kept as they are.
    pub fn cv_skeleton(
        &self,
        word: &Word,
    ) -> Result<String, MissingFeatureError> {
        let consonants = self.consonants.clone()?;
        let skeleton: Vec<&str> = word
            .bounded()
            .into_iter()
            .map(|seg| {
                if seg == BOUNDARY {
                    seg
                } else if self.is_in(consonants, seg) {
                    "C"
                } else if self.is_in(self.vowels, seg) {
                    if seg.chars().count() > 1 {
                        "VV"
                    } else {
                        "V"
                    }
                } else {
                    seg
                }
            })
            .collect();
        Ok(skeleton.join(" "))
    }

    /// The boundary-marked x-grid, e.g. `# x X #`. Stress is required unless
    /// it is ignored, in which case every syllable is `x`.
    pub fn x_grid(
        &self,
        word: &Word,
        ignore_stress: bool,
    ) -> Result<String, MissingFeatureError> {
        let stressed = if ignore_stress {
            None
        } else {
            Some(self.stressed.clone()?)
        };
        let mut grid = vec![BOUNDARY];
        word.segments()
            .iter()
            .filter(|seg| self.is_in(self.vowels, seg))
            .for_each(|seg| match stressed {
                Some(stressed) if self.is_in(stressed, seg) => grid.push("X"),
                _ => grid.push("x"),
            });
        grid.push(BOUNDARY);
        Ok(grid.join(" "))
    }

    /// Skeleton → number of words with it
    pub fn cv_skeleta(
        &self,
        lexicon: &Lexicon,
    ) -> Result<BTreeMap<String, usize>, MissingFeatureError> {
        let mut counts = BTreeMap::new();
        for word in lexicon {
            tally(&mut counts, self.cv_skeleton(word)?, 1);
        }
        Ok(counts)
    }

    /// Grid → number of words with it
    pub fn x_grids(
        &self,
        lexicon: &Lexicon,
        ignore_stress: bool,
    ) -> Result<BTreeMap<String, usize>, MissingFeatureError> {
        let mut counts = BTreeMap::new();
        for word in lexicon {
            tally(&mut counts, self.x_grid(word, ignore_stress)?, 1);
        }
        Ok(counts)
    }
}

/// Number of syllables in an x-grid
pub fn grid_syllables(grid: &str) -> usize {
    grid.split(' ')
        .filter(|token| token.eq_ignore_ascii_case("x"))
        .count()
}

/// N-grams (`n <= 4`) over the tokens of grids or skeleta, each weighted
/// by the number of words with that grid
pub fn grid_ngrams(
    profile: &BTreeMap<String, usize>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    profile.iter().for_each(|(grid, &count)| {
        let tokens: Vec<&str> = grid.split(' ').collect();
        count_ngrams(&tokens, MAX_GRID_N, count, &mut counts);
    });
    counts
}
