//! Fixed-width bit sets over a known universe of indices.
//!
//! Segments and valued features are interned as dense indices, so segment
//! sets and feature sets are plain bit sets. All sets drawn from the same
//! universe have the same number of words, which keeps the derived `Eq`,
//! `Hash`, and `Ord` meaningful.

/// A bit set backed by a vector of u64 words.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    const BITS_PER_WORD: usize = 64;

    /// An empty set able to hold indices `0..capacity`
    pub fn new(capacity: usize) -> Self {
        let n_words = capacity.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; n_words],
        }
    }

    /// The set `{0, 1, ..., capacity - 1}`
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        (0..capacity).for_each(|ix| {
            set.insert(ix);
        });
        set
    }

    /// Build a set from indices. Panics if an index is out of range.
    pub fn from_indices<I>(capacity: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::new(capacity);
        indices.into_iter().for_each(|ix| {
            set.insert(ix);
        });
        set
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    /// Returns the number of set bits
    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        word < self.words.len() && (self.words[word] >> bit) & 1 == 1
    }

    /// Sets the bit at `index`. Returns true if the bit was not already set.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        let mask = 1_u64 << bit;
        let was_clear = self.words[word] & mask == 0;
        self.words[word] |= mask;
        was_clear
    }

    /// Clears the bit at `index`. Returns true if the bit was set.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        if word >= self.words.len() {
            return false;
        }
        let mask = 1_u64 << bit;
        let was_set = self.words[word] & mask != 0;
        self.words[word] &= !mask;
        was_set
    }

    /// In-place intersection
    #[inline]
    pub fn intersect_with(&mut self, other: &Self) {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words
            .iter_mut()
            .zip(other.words.iter())
            .for_each(|(a, b)| *a &= b);
    }

    /// In-place union
    #[inline]
    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words
            .iter_mut()
            .zip(other.words.iter())
            .for_each(|(a, b)| *a |= b);
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// True if every element of `self` is in `other`
    #[inline]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    #[inline]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// True if `self` is a subset of `other` and not equal to it
    #[inline]
    pub fn is_proper_subset(&self, other: &Self) -> bool {
        self.is_subset(other) && self != other
    }

    #[inline]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & b == 0)
    }

    /// Iterate over the set indices in ascending order
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            words: &self.words,
            word_ix: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

pub struct BitSetIter<'a> {
    words: &'a [u64],
    word_ix: usize,
    current: u64,
}

impl<'a> Iterator for BitSetIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                // clear lowest set bit
                self.current &= self.current - 1;
                return Some(self.word_ix * BitSet::BITS_PER_WORD + bit);
            }
            self.word_ix += 1;
            if self.word_ix >= self.words.len() {
                return None;
            }
            self.current = self.words[self.word_ix];
        }
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
