//! Word lists
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use natclass_features::{Inventory, SegmentSet, UnknownSegmentError};

use crate::config::WordListConfig;
use crate::error::LexiconError;

/// The word-boundary marker
pub const BOUNDARY: &str = "#";

/// A word: a non-empty sequence of segment symbols
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word {
    segments: Vec<String>,
}

impl Word {
    /// `None` if there are no segments
    pub fn new(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Parse a space-separated transcription
    pub fn parse(text: &str, config: &WordListConfig) -> Option<Self> {
        let segments = text
            .split_whitespace()
            .filter(|seg| !(config.strip_boundaries && *seg == BOUNDARY))
            .filter(|seg| config.morpheme_boundary.as_deref() != Some(*seg))
            .map(String::from)
            .collect();
        Self::new(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn final_segment(&self) -> &str {
        // never empty
        self.segments[self.segments.len() - 1].as_str()
    }

    /// The segments with a boundary marker at each edge
    pub fn bounded(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.segments.len() + 2);
        out.push(BOUNDARY);
        out.extend(self.segments.iter().map(String::as_str));
        out.push(BOUNDARY);
        out
    }

    /// Number of segments in `vowels`. Symbols not in the inventory are
    /// not syllabic.
    pub fn syllable_count(
        &self,
        vowels: &SegmentSet,
        inventory: &Inventory,
    ) -> usize {
        self.segments
            .iter()
            .filter(|seg| {
                inventory
                    .segment_ix(seg)
                    .map_or(false, |ix| vowels.contains(ix))
            })
            .count()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(" "))
    }
}

/// An ordered list of words. Repeated words are kept unless the list is
/// reduced to types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: Vec<Word>,
}

impl Lexicon {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Parse one word per line. Anything after the first tab is metadata.
    /// Blank lines are skipped.
    pub fn from_reader<R: BufRead>(
        reader: R,
        config: &WordListConfig,
    ) -> Result<Self, LexiconError> {
        let mut words = Vec::new();
        for (ix, line) in reader.lines().enumerate() {
            let line = line?;
            let text = line.split('\t').next().unwrap_or_default();
            if text.trim().is_empty() {
                continue;
            }
            let word = Word::parse(text, config)
                .ok_or(LexiconError::EmptyWord { line: ix + 1 })?;
            words.push(word);
        }
        Ok(Self { words })
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        config: &WordListConfig,
    ) -> Result<Self, LexiconError> {
        info!("Reading word list at {:?}...", path.as_ref());
        let file = File::open(path.as_ref())?;
        let lexicon = Self::from_reader(BufReader::new(file), config)?;
        info!("{} words read", lexicon.len());
        Ok(lexicon)
    }

    /// Parse words from space-separated transcriptions with the default
    /// config. Entries without segments are skipped.
    pub fn from_transcriptions<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = WordListConfig::default();
        Self {
            words: words
                .into_iter()
                .filter_map(|text| Word::parse(text.as_ref(), &config))
                .collect(),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words that occur more than once, each listed once in order of first
    /// repetition
    pub fn doublets(&self) -> Vec<&Word> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.words
            .iter()
            .filter(|word| !seen.insert(*word) && reported.insert(*word))
            .collect()
    }

    /// Keep the first occurrence of every word. Each doublet is reported.
    pub fn types(&self) -> Self {
        self.doublets()
            .iter()
            .for_each(|word| warn!("`{word}` appears more than once"));
        let mut seen = HashSet::new();
        Self {
            words: self
                .words
                .iter()
                .filter(|word| seen.insert(*word))
                .cloned()
                .collect(),
        }
    }

    /// Word-final segment symbols, in word order
    pub fn finals(&self) -> Vec<&str> {
        self.words.iter().map(Word::final_segment).collect()
    }

    /// The set of word-final segments
    pub fn final_set(
        &self,
        inventory: &Inventory,
    ) -> Result<SegmentSet, UnknownSegmentError> {
        inventory.segment_set(&self.finals())
    }

    /// Syllable count of every word, in word order
    pub fn syllable_counts(
        &self,
        vowels: &SegmentSet,
        inventory: &Inventory,
    ) -> Vec<usize> {
        self.words
            .iter()
            .map(|word| word.syllable_count(vowels, inventory))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use natclass_features::FeatureTable;

    #[test]
    fn boundaries_and_metadata_are_removed() {
        let text = indoc!(
            "
            # p a t a #\tnoun
            k a | t i

            # a #
            "
        );
        let lex =
            Lexicon::from_reader(text.as_bytes(), &WordListConfig::default())
                .unwrap();
        assert_eq!(lex.len(), 3);
        assert_eq!(lex.words()[0].to_string(), "p a t a");
        assert_eq!(lex.words()[1].to_string(), "k a t i");
        assert_eq!(lex.finals(), vec!["a", "i", "a"]);
    }

    #[test]
    fn boundaries_can_be_kept() {
        let config = WordListConfig::new()
            .strip_boundaries(false)
            .morpheme_boundary(None);
        let word = Word::parse("# k a | t i #", &config).unwrap();
        assert_eq!(word.len(), 7);
    }

    #[test]
    fn line_of_only_markers_is_an_error() {
        let res = Lexicon::from_reader(
            "p a\n# #\n".as_bytes(),
            &WordListConfig::default(),
        );
        assert!(matches!(res, Err(LexiconError::EmptyWord { line: 2 })));
    }

    #[test]
    fn doublets_are_found_and_dropped_from_types() {
        let lex = Lexicon::from_transcriptions(["p a", "t a", "p a", "p a"]);
        let doublets: Vec<String> =
            lex.doublets().iter().map(|w| w.to_string()).collect();
        assert_eq!(doublets, vec!["p a"]);
        let types = lex.types();
        assert_eq!(types.len(), 2);
        assert_eq!(types.words()[1].to_string(), "t a");
    }

    #[test]
    fn syllables_are_vowels() {
        let table =
            FeatureTable::from_tsv("\tsyll\tcons\np\t-\t+\na\t+\t-\n").unwrap();
        let index = table.invert();
        let vowels = index.vowels().unwrap();
        let word =
            Word::parse("p a p a p", &WordListConfig::default()).unwrap();
        assert_eq!(word.syllable_count(vowels, table.inventory()), 2);
        assert_eq!(word.bounded().first(), Some(&"#"));
        assert_eq!(word.bounded().len(), 7);
    }
}
