//! DICOM record acquisition
//!
//! The parsing collaborator: reads one file or a directory of files and
//! converts every data element into the pure [`Element`] record the tree
//! engine consumes. All `dicom-rs` types stay behind this boundary; the rest
//! of the crate never sees them.

use std::fs;
use std::path::{Path, PathBuf};

use dicom_core::VR;
use dicom_core::dictionary::DataDictionary;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::{DefaultDicomObject, open_file};
use thiserror::Error;

use crate::model::{DatasetEntry, Element, ElementValue, TagKey};

/// Errors raised while loading DICOM input.
#[derive(Debug, Error)]
pub enum DicomError {
    /// A file could not be parsed as DICOM.
    #[error("failed to read DICOM data from '{filename}': {source}")]
    Read {
        filename: String,
        #[source]
        source: dicom_object::ReadError,
    },

    /// Filesystem enumeration failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory was given but contained no files at all.
    #[error("no DICOM files found in '{0}'")]
    EmptyDirectory(String),
}

/// Load a DICOM file, or every file of a directory in filename order.
///
/// Returns the display label for the tree root (the file or directory name)
/// together with one [`DatasetEntry`] per parsed file.
///
/// # Errors
///
/// Fails when the path cannot be enumerated, any file fails to parse, or a
/// directory turns out to hold no files.
pub fn load_path(path: &Path) -> Result<(String, Vec<DatasetEntry>), DicomError> {
    let label = display_name(path);

    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        // read_dir order is platform-dependent; present entries by name.
        files.sort();

        if files.is_empty() {
            return Err(DicomError::EmptyDirectory(path.display().to_string()));
        }

        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            entries.push(load_file(file)?);
        }
        Ok((label, entries))
    } else {
        let entry = load_file(path)?;
        Ok((label, vec![entry]))
    }
}

fn load_file(path: &Path) -> Result<DatasetEntry, DicomError> {
    let filename = display_name(path);
    let object = open_file(path).map_err(|source| DicomError::Read {
        filename: filename.clone(),
        source,
    })?;
    Ok(DatasetEntry::new(filename, convert_elements(object)))
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Convert the parsed object into pure records, in tag order.
fn convert_elements(object: DefaultDicomObject) -> Vec<Element> {
    let mut elements = Vec::new();
    for elem in object {
        let tag = TagKey::new(elem.header().tag.group(), elem.header().tag.element());
        let vr = elem.header().vr;
        let length = elem.header().len.0;

        let value = if vr == VR::SQ {
            ElementValue::Sequence
        } else {
            // Values without a text rendering (e.g. pixel data) degrade to
            // an empty string, never an error.
            elem.to_str().map_or(ElementValue::Text(String::new()), |text| {
                ElementValue::Text(text.trim_end().to_owned())
            })
        };

        elements.push(Element {
            tag,
            name: tag_name(tag).to_owned(),
            vr: format!("{vr:?}"),
            length,
            value,
        });
    }
    elements
}

/// Resolve a tag's name from the standard data-element dictionary.
///
/// Unknown (e.g. private) tags resolve to the empty string.
#[must_use]
pub fn tag_name(tag: TagKey) -> &'static str {
    StandardDataDictionary
        .by_tag(dicom_core::Tag(tag.group, tag.element))
        .map_or("", |entry| entry.alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_resolves_standard_tags() {
        assert_eq!(tag_name(TagKey::new(0x0010, 0x0010)), "PatientName");
        assert_eq!(tag_name(TagKey::new(0x0008, 0x0060)), "Modality");
    }

    #[test]
    fn test_tag_name_empty_for_private_tags() {
        assert_eq!(tag_name(TagKey::new(0x0009, 0x0001)), "");
    }

    #[test]
    fn test_load_path_rejects_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(dir.path()).unwrap_err();
        assert!(matches!(err, DicomError::EmptyDirectory(_)));
    }

    #[test]
    fn test_load_path_rejects_non_dicom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_dicom.txt");
        fs::write(&path, b"plain text").unwrap();
        assert!(load_path(&path).is_err());
    }
}
