//! Testing utilities for dcmtree
//!
//! Fixture builders for dataset entries so tests don't need real DICOM
//! files on disk. Only available when compiled with `cfg(test)`.

use crate::model::{DatasetEntry, Element, ElementValue, TagKey};

/// Build a primitive-valued element. The declared length is the rendered
/// value's byte length.
#[must_use]
pub fn element(group: u16, elem: u16, name: &str, vr: &str, value: &str) -> Element {
    Element {
        tag: TagKey::new(group, elem),
        name: name.to_owned(),
        vr: vr.to_owned(),
        length: value.len() as u32,
        value: ElementValue::Text(value.to_owned()),
    }
}

/// Build a sequence-valued element (no inline rendering).
#[must_use]
pub fn sequence_element(group: u16, elem: u16, name: &str) -> Element {
    Element {
        tag: TagKey::new(group, elem),
        name: name.to_owned(),
        vr: "SQ".to_owned(),
        length: 0,
        value: ElementValue::Sequence,
    }
}

/// Build a dataset entry from a filename and elements.
#[must_use]
pub fn entry(filename: &str, elements: Vec<Element>) -> DatasetEntry {
    DatasetEntry::new(filename.to_owned(), elements)
}

/// Canonical two-file corpus: `Modality` agrees between the files,
/// `PatientName` differs.
#[must_use]
pub fn patient_corpus() -> Vec<DatasetEntry> {
    vec![
        entry(
            "A.dcm",
            vec![
                element(0x0008, 0x0060, "Modality", "CS", "CT"),
                element(0x0010, 0x0010, "PatientName", "PN", "Doe^John"),
            ],
        ),
        entry(
            "B.dcm",
            vec![
                element(0x0008, 0x0060, "Modality", "CS", "CT"),
                element(0x0010, 0x0010, "PatientName", "PN", "Smith^Jane"),
            ],
        ),
    ]
}
