use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use serde::Serialize;

use crate::error::FeatureTableError;
use crate::feature::Sign;
use crate::index::FeatureClassIndex;
use crate::inventory::{FeatureSet, Inventory, SegmentSet};

/// How one segment fails to be distinguishable from another
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AmbiguityKind {
    /// Both segments have exactly the same feature set
    Identical,
    /// The segment's feature set is a proper subset of the other's, so any
    /// description of the segment also picks out the other one
    Subset,
}

/// A pair of segments the table cannot tell apart. Reported, never fatal.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ambiguity {
    pub kind: AmbiguityKind,
    pub segment: String,
    pub other: String,
}

/// Segment × feature matrix
///
/// Each segment maps to the set of its non-zero valued features.
#[derive(Clone, Debug)]
pub struct FeatureTable {
    inventory: Arc<Inventory>,
    specs: Vec<FeatureSet>,
    ambiguities: Vec<Ambiguity>,
}

impl FeatureTable {
    /// Build a table from rows of cells. The first row is the header of
    /// feature names; a leading empty header cell (the segment column) is
    /// dropped. Every other row is a segment symbol followed by one of `+`,
    /// `-`, or `0` per feature.
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self, FeatureTableError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows = rows.into_iter();

        let features: Vec<String> = {
            let header = rows.next().ok_or(FeatureTableError::EmptyTable)?;
            let mut cells: Vec<String> = header
                .into_iter()
                .map(|cell| cell.as_ref().trim().to_owned())
                .collect();
            drop_trailing_empty(&mut cells);
            if cells.first().map_or(false, |c| c.is_empty()) {
                cells.remove(0);
            }
            cells
        };

        if features.is_empty() {
            return Err(FeatureTableError::NoFeatures);
        }

        {
            let mut seen = HashSet::new();
            if let Some(dup) = features.iter().find(|f| !seen.insert(*f)) {
                return Err(FeatureTableError::DuplicateFeature(dup.clone()));
            }
        }

        let mut segments: Vec<String> = Vec::new();
        let mut values: Vec<Vec<Option<Sign>>> = Vec::new();
        let mut seen = HashSet::new();

        for (ix, row) in rows.enumerate() {
            // the header is line 1
            let line = ix + 2;
            let mut cells: Vec<String> = row
                .into_iter()
                .map(|cell| cell.as_ref().trim().to_owned())
                .collect();
            drop_trailing_empty(&mut cells);

            if cells.is_empty() {
                continue;
            }

            let segment = cells[0].clone();
            let found = cells.len() - 1;
            if found != features.len() {
                return Err(FeatureTableError::MalformedRow {
                    line,
                    segment,
                    expected: features.len(),
                    found,
                });
            }

            if !seen.insert(segment.clone()) {
                return Err(FeatureTableError::DuplicateSegment(segment));
            }

            let row_values = cells[1..]
                .iter()
                .zip(features.iter())
                .map(|(cell, feature)| {
                    Sign::from_cell(cell).map_err(|_| {
                        FeatureTableError::InvalidValue {
                            segment: segment.clone(),
                            feature: feature.clone(),
                            value: cell.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            segments.push(segment);
            values.push(row_values);
        }

        if segments.is_empty() {
            return Err(FeatureTableError::NoSegments);
        }

        let inventory = Inventory::new(segments, features);
        let specs: Vec<FeatureSet> = values
            .iter()
            .map(|row| {
                let mut spec = inventory.empty_features();
                row.iter().enumerate().for_each(|(col, sign)| {
                    if let Some(sign) = sign {
                        spec.insert(2 * col + sign.offset());
                    }
                });
                spec
            })
            .collect();

        let ambiguities = find_ambiguities(&inventory, &specs);
        if ambiguities.is_empty() {
            info!(
                "Feature table is well-formed: {} segments, {} features",
                inventory.n_segments(),
                inventory.n_features()
            );
        } else {
            ambiguities.iter().for_each(|amb| match amb.kind {
                AmbiguityKind::Identical => warn!(
                    "`{}` and `{}` have identical feature specifications",
                    amb.segment, amb.other
                ),
                AmbiguityKind::Subset => warn!(
                    "`{}` has a subset of the features of `{}`",
                    amb.segment, amb.other
                ),
            });
        }

        Ok(Self {
            inventory: Arc::new(inventory),
            specs,
            ambiguities,
        })
    }

    /// Read a tab-separated feature table
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FeatureTableError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

        Self::from_rows(
            records
                .iter()
                .map(|record| record.iter().collect::<Vec<&str>>()),
        )
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Self, FeatureTableError> {
        info!("Reading feature table at {:?}...", path.as_ref());
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse a table held in a string
    pub fn from_tsv(text: &str) -> Result<Self, FeatureTableError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    #[inline]
    pub fn n_segments(&self) -> usize {
        self.inventory.n_segments()
    }

    pub fn segments(&self) -> &[String] {
        self.inventory.segments()
    }

    /// The valued features of segment `ix`
    pub fn features_of(&self, ix: usize) -> &FeatureSet {
        &self.specs[ix]
    }

    /// The valued-feature tokens of a segment, if it is in the table
    pub fn feature_tokens(&self, segment: &str) -> Option<Vec<String>> {
        self.inventory
            .segment_ix(segment)
            .map(|ix| self.inventory.tokens(&self.specs[ix]))
    }

    /// Pairs of segments the features cannot distinguish
    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }

    /// True if every segment can be picked out uniquely by its features
    pub fn is_well_formed(&self) -> bool {
        self.ambiguities.is_empty()
    }

    /// Segments that take part in any ambiguity
    pub fn ambiguous_segments(&self) -> SegmentSet {
        let mut set = self.inventory.empty_segments();
        self.ambiguities.iter().for_each(|amb| {
            for seg in [&amb.segment, &amb.other] {
                if let Some(ix) = self.inventory.segment_ix(seg) {
                    set.insert(ix);
                }
            }
        });
        set
    }

    /// Features shared by every segment in `segments`.
    ///
    /// The empty set of segments shares every feature.
    pub fn segs_to_feats(&self, segments: &SegmentSet) -> FeatureSet {
        let mut shared = FeatureSet::full(self.inventory.n_feature_ids());
        segments
            .iter()
            .for_each(|ix| shared.intersect_with(&self.specs[ix]));
        shared
    }

    /// Produce the feature → segments index
    pub fn invert(&self) -> FeatureClassIndex {
        let n_ids = self.inventory.n_feature_ids();
        let mut extensions = vec![self.inventory.empty_segments(); n_ids];
        self.specs.iter().enumerate().for_each(|(seg_ix, spec)| {
            spec.iter().for_each(|id| {
                extensions[id].insert(seg_ix);
            })
        });
        FeatureClassIndex::new(Arc::clone(&self.inventory), extensions)
    }
}

fn find_ambiguities(
    inventory: &Inventory,
    specs: &[FeatureSet],
) -> Vec<Ambiguity> {
    let mut out = Vec::new();
    for i in 0..specs.len() {
        for j in (i + 1)..specs.len() {
            let (a, b) = (&specs[i], &specs[j]);
            let name = |ix: usize| inventory.segment_name(ix).to_owned();
            if a == b {
                out.push(Ambiguity {
                    kind: AmbiguityKind::Identical,
                    segment: name(i),
                    other: name(j),
                });
            } else if a.is_subset(b) {
                out.push(Ambiguity {
                    kind: AmbiguityKind::Subset,
                    segment: name(i),
                    other: name(j),
                });
            } else if b.is_subset(a) {
                out.push(Ambiguity {
                    kind: AmbiguityKind::Subset,
                    segment: name(j),
                    other: name(i),
                });
            }
        }
    }
    out
}

/// Lines ending in a tab leave empty cells behind
fn drop_trailing_empty(cells: &mut Vec<String>) {
    while cells.last().map_or(false, |c| c.is_empty()) {
        cells.pop();
    }
}
