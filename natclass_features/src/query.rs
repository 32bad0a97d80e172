//! Membership queries over a compact class table
use std::collections::BTreeMap;

use log::warn;

use crate::classes::{ClassRef, ClassTable};
use crate::error::{IncoherentClassQuery, UnknownSegmentError};
use crate::inventory::SegmentSet;

/// Result of a tightest-class query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TightestClass<'a> {
    /// A class has exactly the queried segments
    Exact(ClassRef<'a>),
    /// The smallest classes containing the queried segments, in key order.
    /// Never empty.
    Tightest(Vec<ClassRef<'a>>),
}

impl<'a> TightestClass<'a> {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// Every candidate class
    pub fn classes(&self) -> Vec<ClassRef<'a>> {
        match self {
            Self::Exact(class) => vec![*class],
            Self::Tightest(classes) => classes.clone(),
        }
    }

    /// The single label used when one class is needed: the exact class, or
    /// the tied candidate with the smallest key
    pub fn first(&self) -> ClassRef<'a> {
        match self {
            Self::Exact(class) => *class,
            Self::Tightest(classes) => classes[0],
        }
    }
}

impl ClassTable {
    /// The class with exactly `segments`, or else every smallest class whose
    /// extension contains them
    pub fn tightest_class(
        &self,
        segments: &SegmentSet,
    ) -> Result<TightestClass<'_>, IncoherentClassQuery> {
        if segments.is_empty() {
            return Err(IncoherentClassQuery::Empty);
        }

        if let Some(class) = self.get(segments) {
            return Ok(TightestClass::Exact(class));
        }

        let containing: Vec<ClassRef<'_>> = self
            .classes()
            .iter()
            .filter(|(ext, _)| ext.is_superset(segments))
            .map(|(ext, desc)| self.class_ref(ext, desc))
            .collect();

        let min_len = containing.iter().map(|class| class.len()).min();
        match min_len {
            None => {
                let names: Vec<String> = self
                    .inventory()
                    .segment_names(segments)
                    .into_iter()
                    .map(String::from)
                    .collect();
                let err = IncoherentClassQuery::NoContainingClass(names);
                warn!("{err}");
                Err(err)
            }
            Some(min_len) => {
                let mut tightest: Vec<ClassRef<'_>> = containing
                    .into_iter()
                    .filter(|class| class.len() == min_len)
                    .collect();
                tightest.sort_by_cached_key(|class| class.key());
                Ok(TightestClass::Tightest(tightest))
            }
        }
    }

    /// `tightest_class` over segment symbols
    pub fn tightest_class_by_names<S: AsRef<str>>(
        &self,
        segments: &[S],
    ) -> Result<TightestClass<'_>, IncoherentClassQuery> {
        let set = self.inventory().segment_set(segments)?;
        self.tightest_class(&set)
    }

    /// Every class sharing no segment with `segments`, in key order
    pub fn missing_classes(&self, segments: &SegmentSet) -> Vec<ClassRef<'_>> {
        self.iter()
            .filter(|class| class.extension().is_disjoint(segments))
            .collect()
    }

    /// Missing classes that are not properly contained in another missing
    /// class
    pub fn maximal_missing_classes(
        &self,
        segments: &SegmentSet,
    ) -> Vec<ClassRef<'_>> {
        let missing = self.missing_classes(segments);
        missing
            .iter()
            .filter(|class| {
                !missing.iter().any(|other| {
                    class.extension().is_proper_subset(other.extension())
                })
            })
            .copied()
            .collect()
    }

    /// Every class containing segment `ix`, in key order
    pub fn segment_classes(&self, ix: usize) -> Vec<ClassRef<'_>> {
        self.iter()
            .filter(|class| class.extension().contains(ix))
            .collect()
    }

    /// Every class containing the named segment
    pub fn classes_of_segment(
        &self,
        segment: &str,
    ) -> Result<Vec<ClassRef<'_>>, UnknownSegmentError> {
        let ix = self.inventory().segment_ix(segment).ok_or_else(|| {
            UnknownSegmentError {
                segments: vec![segment.to_owned()],
            }
        })?;
        Ok(self.segment_classes(ix))
    }

    /// Every segment mapped to the classes it belongs to
    pub fn segment_class_map(&self) -> BTreeMap<String, Vec<ClassRef<'_>>> {
        let inventory = self.inventory();
        (0..inventory.n_segments())
            .map(|ix| {
                let name = inventory.segment_name(ix).to_owned();
                (name, self.segment_classes(ix))
            })
            .collect()
    }
}
