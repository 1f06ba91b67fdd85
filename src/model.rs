//! Record model shared by the materializer, navigation and search engines
//!
//! These are pure data types: one tag occurrence (`Element`), the per-file
//! collection of occurrences (`DatasetEntry`), and the keys used to identify
//! and refer back to them. Parsing lives in [`crate::dicom`]; nothing here
//! touches the filesystem.

use std::fmt;

/// Identity of a tag independent of which file it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKey {
    /// Group identifier (high-order half of the tag).
    pub group: u16,
    /// Element identifier within the group.
    pub element: u16,
}

impl TagKey {
    /// Create a new tag key.
    #[must_use]
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04x},{:04x})", self.group, self.element)
    }
}

/// Renderable value of a tag occurrence.
///
/// Sequence-valued elements are never flattened to text; they carry a marker
/// so the materializer can suppress inline rendering and the diff projection
/// can treat them uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// A primitive value, pre-rendered to text by the parsing collaborator.
    Text(String),
    /// A sequence (or otherwise non-textual composite) value.
    Sequence,
}

impl ElementValue {
    /// The textual rendering, or `None` for sequence values.
    #[must_use]
    pub fn rendered(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Sequence => None,
        }
    }
}

/// One tag occurrence inside one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag identity.
    pub tag: TagKey,
    /// Name resolved from the tag dictionary; empty for unknown tags.
    pub name: String,
    /// Value representation code (e.g. "PN", "SQ").
    pub vr: String,
    /// Value length in bytes as declared by the file.
    pub length: u32,
    /// The renderable value.
    pub value: ElementValue,
}

impl Element {
    /// The rendered value text, treating sequences as empty.
    ///
    /// This is the form used for distinct-value comparison in the diff
    /// projection: two sequence values always compare equal.
    #[must_use]
    pub fn rendered_value(&self) -> &str {
        self.value.rendered().unwrap_or_default()
    }
}

/// All tag occurrences parsed from a single source file, in file order.
///
/// Group ids ascend within a file by construction of the upstream parser;
/// the materializer relies on this and never sorts.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    /// The source file's name (not its full path).
    pub filename: String,
    /// The file's elements in natural record order.
    pub elements: Vec<Element>,
}

impl DatasetEntry {
    /// Create a new dataset entry.
    #[must_use]
    pub const fn new(filename: String, elements: Vec<Element>) -> Self {
        Self { filename, elements }
    }
}

/// Stable reference from a tree node back to the element it denotes.
///
/// Indices into the entry list the tree was built from; the tree itself
/// never owns element data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    /// Index of the dataset entry (source file).
    pub entry: usize,
    /// Index of the element within that entry.
    pub element: usize,
}

impl ElementRef {
    /// Create a new element reference.
    #[must_use]
    pub const fn new(entry: usize, element: usize) -> Self {
        Self { entry, element }
    }

    /// Resolve the reference against the entry list it was created from.
    #[must_use]
    pub fn resolve<'a>(&self, entries: &'a [DatasetEntry]) -> Option<&'a Element> {
        entries.get(self.entry)?.elements.get(self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_key_ordering() {
        let a = TagKey::new(0x0008, 0x0020);
        let b = TagKey::new(0x0010, 0x0010);
        assert!(a < b);
        assert_eq!(a, TagKey::new(0x0008, 0x0020));
    }

    #[test]
    fn test_tag_key_display() {
        assert_eq!(TagKey::new(0x0010, 0x0010).to_string(), "(0010,0010)");
    }

    #[test]
    fn test_sequence_value_has_no_rendering() {
        assert_eq!(ElementValue::Sequence.rendered(), None);
        assert_eq!(ElementValue::Text("CT".into()).rendered(), Some("CT"));
    }

    #[test]
    fn test_element_ref_resolution() {
        let entry = DatasetEntry::new(
            "a.dcm".into(),
            vec![Element {
                tag: TagKey::new(0x0008, 0x0060),
                name: "Modality".into(),
                vr: "CS".into(),
                length: 2,
                value: ElementValue::Text("CT".into()),
            }],
        );
        let entries = vec![entry];

        let found = ElementRef::new(0, 0).resolve(&entries).unwrap();
        assert_eq!(found.name, "Modality");
        assert!(ElementRef::new(0, 1).resolve(&entries).is_none());
        assert!(ElementRef::new(1, 0).resolve(&entries).is_none());
    }
}
