use std::collections::BTreeMap;
use std::mem::swap;

pub trait MinMax {
    type Inner: PartialOrd;
    /// Simultaneously compute the min and max of items in an Iterator. Returns
    /// `None` if the iterator is empty.
    fn minmax(&mut self) -> Option<(Self::Inner, Self::Inner)>;
}

impl<T> MinMax for T
where
    T: Iterator,
    T::Item: PartialOrd + Clone,
{
    type Inner = T::Item;
    fn minmax(&mut self) -> Option<(Self::Inner, Self::Inner)> {
        let mut min = self.next()?;

        let mut max = if let Some(item) = self.next() {
            item
        } else {
            return Some((min.clone(), min));
        };

        if min > max {
            swap(&mut min, &mut max);
        }

        for item in self {
            if item > max {
                max = item;
            } else if item < min {
                min = item;
            }
        }
        Some((min, max))
    }
}

/// Add `count` to the tally for `key`
#[inline]
pub fn tally<K: Ord>(counts: &mut BTreeMap<K, usize>, key: K, count: usize) {
    *counts.entry(key).or_insert(0) += count;
}

/// Merge the tallies in `other` into `counts`
pub fn merge_tallies<K: Ord + Clone>(
    counts: &mut BTreeMap<K, usize>,
    other: &BTreeMap<K, usize>,
) {
    other
        .iter()
        .for_each(|(k, &n)| tally(counts, k.clone(), n));
}

/// Keys of `counts` sorted by descending count, ties in key order
pub fn keys_by_count_desc<K: Ord + Clone>(
    counts: &BTreeMap<K, usize>,
) -> Vec<K> {
    let mut keys: Vec<(&K, usize)> =
        counts.iter().map(|(k, &n)| (k, n)).collect();
    // BTreeMap iteration is key-ordered and the sort is stable
    keys.sort_by(|a, b| b.1.cmp(&a.1));
    keys.into_iter().map(|(k, _)| k.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minmax_of_empty_is_none() {
        let xs: Vec<usize> = vec![];
        assert!(xs.iter().minmax().is_none());
    }

    #[test]
    fn minmax_of_one_is_that_one() {
        assert_eq!(vec![4_usize].into_iter().minmax(), Some((4, 4)));
    }

    #[test]
    fn minmax_unordered() {
        let xs = vec![3_usize, 1, 4, 1, 5, 9, 2, 6];
        assert_eq!(xs.into_iter().minmax(), Some((1, 9)));
    }

    #[test]
    fn tally_accumulates() {
        let mut counts = BTreeMap::new();
        tally(&mut counts, "a", 1);
        tally(&mut counts, "b", 2);
        tally(&mut counts, "a", 3);
        assert_eq!(counts["a"], 4);
        assert_eq!(counts["b"], 2);
    }

    #[test]
    fn merge_is_additive() {
        let mut a = BTreeMap::new();
        tally(&mut a, 1_usize, 2);
        let mut b = BTreeMap::new();
        tally(&mut b, 1_usize, 3);
        tally(&mut b, 2_usize, 1);
        merge_tallies(&mut a, &b);
        assert_eq!(a[&1], 5);
        assert_eq!(a[&2], 1);
    }

    #[test]
    fn keys_by_count_breaks_ties_by_key() {
        let mut counts = BTreeMap::new();
        tally(&mut counts, "c", 2);
        tally(&mut counts, "a", 2);
        tally(&mut counts, "b", 5);
        assert_eq!(keys_by_count_desc(&counts), vec!["b", "a", "c"]);
    }
}
