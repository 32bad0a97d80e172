use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::compact::compact;
use crate::enumerate::enumerate_all;
use crate::error::ClassTableReadError;
use crate::inventory::{FeatureSet, Inventory, SegmentSet};
use crate::table::FeatureTable;

/// The compact class table: every natural class of a feature table, each
/// with its single minimal description.
///
/// A pure function of the feature table; computed once and never mutated.
#[derive(Clone, Debug)]
pub struct ClassTable {
    inventory: Arc<Inventory>,
    classes: BTreeMap<SegmentSet, FeatureSet>,
    unreliable: BTreeSet<SegmentSet>,
}

impl ClassTable {
    pub(crate) fn new(
        inventory: Arc<Inventory>,
        classes: BTreeMap<SegmentSet, FeatureSet>,
        unreliable: BTreeSet<SegmentSet>,
    ) -> Self {
        Self {
            inventory,
            classes,
            unreliable,
        }
    }

    /// Enumerate and compact every class of `table`
    pub fn from_feature_table(table: &FeatureTable) -> Self {
        let index = table.invert();
        let verbose = enumerate_all(table, &index);
        compact(&verbose, &index)
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    /// Extension → minimal description
    pub fn classes(&self) -> &BTreeMap<SegmentSet, FeatureSet> {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn description(&self, extension: &SegmentSet) -> Option<&FeatureSet> {
        self.classes.get(extension)
    }

    /// The class with exactly this extension, if there is one
    pub fn get(&self, extension: &SegmentSet) -> Option<ClassRef<'_>> {
        self.classes
            .get_key_value(extension)
            .map(|(ext, desc)| self.class_ref(ext, desc))
    }

    /// Look up a class by its key, e.g. `"a,i"`
    pub fn get_by_key(&self, key: &str) -> Option<ClassRef<'_>> {
        let names: Vec<&str> = key.split(',').map(str::trim).collect();
        let set = self.inventory.segment_set(&names).ok()?;
        self.get(&set)
    }

    /// False if the class's description also selects segments outside its
    /// extension, which happens only with indistinguishable segments
    pub fn is_reliable(&self, extension: &SegmentSet) -> bool {
        !self.unreliable.contains(extension)
    }

    /// Iterate over the classes in key order
    pub fn iter(&self) -> impl Iterator<Item = ClassRef<'_>> {
        let mut refs: Vec<ClassRef<'_>> = self
            .classes
            .iter()
            .map(|(ext, desc)| self.class_ref(ext, desc))
            .collect();
        refs.sort_by_cached_key(|class| class.key());
        refs.into_iter()
    }

    pub(crate) fn class_ref<'a>(
        &'a self,
        extension: &'a SegmentSet,
        description: &'a FeatureSet,
    ) -> ClassRef<'a> {
        ClassRef {
            extension,
            description,
            inventory: &self.inventory,
            reliable: self.is_reliable(extension),
        }
    }

    /// Description string → extension, the inverse view of the table
    pub fn description_index(&self) -> BTreeMap<String, SegmentSet> {
        self.classes
            .iter()
            .map(|(ext, desc)| (self.inventory.description(desc), ext.clone()))
            .collect()
    }

    /// Write one `features<TAB>segments` line per class, in key order.
    /// Classes with unreliable membership carry a third `ambiguous` column.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for class in self.iter() {
            if class.is_reliable() {
                let desc = class.description_string();
                writeln!(writer, "{}\t{}", desc, class.key())?;
            } else {
                writeln!(
                    writer,
                    "{}\t{}\tambiguous",
                    class.description_string(),
                    class.key()
                )?;
            }
        }
        info!("{} classes written", self.len());
        Ok(())
    }

    /// Read classes written by `write_to` against the table they came from
    pub fn read_from<R: BufRead>(
        reader: R,
        table: &FeatureTable,
    ) -> Result<Self, ClassTableReadError> {
        let inventory = Arc::clone(table.inventory());
        let mut classes = BTreeMap::new();
        let mut unreliable = BTreeSet::new();

        for (ix, line) in reader.lines().enumerate() {
            let line_no = ix + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 2 || cols.len() > 3 {
                let err = ClassTableReadError::MalformedLine { line: line_no };
                return Err(err);
            }

            let mut desc = inventory.empty_features();
            for token in cols[0].split(',').filter(|t| !t.is_empty()) {
                let id = inventory.token_id(token).ok_or_else(|| {
                    ClassTableReadError::UnknownFeature {
                        line: line_no,
                        token: token.to_owned(),
                    }
                })?;
                desc.insert(id);
            }

            let names: Vec<&str> = cols[1].split(',').collect();
            let ext = inventory.segment_set(&names).map_err(|source| {
                ClassTableReadError::UnknownSegment {
                    line: line_no,
                    source,
                }
            })?;

            if cols.get(2).map_or(false, |c| c.trim() == "ambiguous") {
                unreliable.insert(ext.clone());
            }

            if classes.insert(ext, desc).is_some() {
                return Err(ClassTableReadError::DuplicateClass {
                    line: line_no,
                    key: cols[1].to_owned(),
                });
            }
        }

        Ok(Self::new(inventory, classes, unreliable))
    }
}

/// A borrowed view of one class of a `ClassTable`
#[derive(Clone, Copy, Debug)]
pub struct ClassRef<'a> {
    extension: &'a SegmentSet,
    description: &'a FeatureSet,
    inventory: &'a Inventory,
    reliable: bool,
}

impl<'a> ClassRef<'a> {
    pub fn extension(&self) -> &'a SegmentSet {
        self.extension
    }

    pub fn description(&self) -> &'a FeatureSet {
        self.description
    }

    /// Number of segments in the class
    pub fn len(&self) -> usize {
        self.extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension.is_empty()
    }

    pub fn is_reliable(&self) -> bool {
        self.reliable
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.inventory
            .segment_ix(segment)
            .map_or(false, |ix| self.extension.contains(ix))
    }

    /// Sorted segment symbols
    pub fn segments(&self) -> Vec<&'a str> {
        self.inventory.segment_names(self.extension)
    }

    /// Sorted, comma-joined segment symbols
    pub fn key(&self) -> String {
        self.inventory.key(self.extension)
    }

    /// Feature tokens in canonical order
    pub fn tokens(&self) -> Vec<String> {
        self.inventory.tokens(self.description)
    }

    /// Comma-joined feature tokens in canonical order
    pub fn description_string(&self) -> String {
        self.inventory.description(self.description)
    }

    /// Bracketed description, e.g. `[+syll]`
    pub fn label(&self) -> String {
        format!("[{}]", self.description_string())
    }

    pub fn to_summary(&self) -> ClassSummary {
        ClassSummary {
            description: self.tokens(),
            segments: self.segments().into_iter().map(String::from).collect(),
            reliable: self.reliable,
        }
    }
}

impl<'a> PartialEq for ClassRef<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.extension == other.extension
            && self.description == other.description
    }
}

impl<'a> Eq for ClassRef<'a> {}

impl<'a> fmt::Display for ClassRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.label(), self.key())
    }
}

/// Owned, serializable record of a class
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClassSummary {
    pub description: Vec<String>,
    pub segments: Vec<String>,
    pub reliable: bool,
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

    #[test]
    fn written_lines_are_description_then_segments() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let classes = ClassTable::from_feature_table(&table);
        let mut buf = Vec::new();
        classes.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "+syll,-cons,+son\ta\tambiguous\n+syll\ta,i\n+high\ti\n+cons\tp\n"
        );
    }

    #[test]
    fn written_table_reads_back() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let classes = ClassTable::from_feature_table(&table);
        let mut buf = Vec::new();
        classes.write_to(&mut buf).unwrap();
        let read = ClassTable::read_from(buf.as_slice(), &table).unwrap();
        assert_eq!(read.classes(), classes.classes());
        let a = table.inventory().segment_set(&["a"]).unwrap();
        assert!(!read.is_reliable(&a));
    }

    #[test]
    fn reading_rejects_unknown_tokens() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let res = ClassTable::read_from("+lateral\tp\n".as_bytes(), &table);
        assert!(matches!(
            res,
            Err(ClassTableReadError::UnknownFeature { line: 1, .. })
        ));
        let res = ClassTable::read_from("+cons\tq\n".as_bytes(), &table);
        assert!(matches!(
            res,
            Err(ClassTableReadError::UnknownSegment { line: 1, .. })
        ));
        let res = ClassTable::read_from("+cons\n".as_bytes(), &table);
        assert!(matches!(
            res,
            Err(ClassTableReadError::MalformedLine { line: 1 })
        ));
    }

    #[test]
    fn description_index_inverts_classes() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let classes = ClassTable::from_feature_table(&table);
        let index = classes.description_index();
        let inv = table.inventory();
        assert_eq!(inv.key(&index["+syll"]), "a,i");
        assert_eq!(inv.key(&index["+cons"]), "p");
    }

    #[test]
    fn class_ref_accessors() {
        let table = FeatureTable::from_tsv(PAI).unwrap();
        let classes = ClassTable::from_feature_table(&table);
        let vowels = classes.get_by_key("a,i").unwrap();
        assert_eq!(vowels.len(), 2);
        assert!(vowels.contains("i"));
        assert!(!vowels.contains("p"));
        assert_eq!(vowels.label(), "[+syll]");
        assert_eq!(vowels.to_string(), "[+syll] {a,i}");
        assert_eq!(vowels.to_summary().segments, vec!["a", "i"]);
    }
}
