//! Tree materialization: projecting datasets into a `TagTree`
//!
//! Each call builds a fresh tree from scratch; expand state and the cursor
//! never survive a rebuild. The materializer consults no navigation state
//! and performs no sorting — group ids ascend within a file by construction
//! of the parser, and cross-file orderings follow first appearance.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::{NodeId, TagTree};
use crate::model::{DatasetEntry, Element, ElementRef, TagKey};

/// Display budget for inline values; longer renderings are truncated with an
/// ellipsis marker.
pub const DEFAULT_VALUE_DISPLAY_LIMIT: usize = 80;

/// Materialization errors.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input held no dataset entries at all.
    #[error("no records to display")]
    NoRecords,
}

/// The projection used to shape the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// One subtree per file, groups in file order. The only meaningful
    /// projection for a single input file.
    #[default]
    ByFile,
    /// Group, then tag, then one occurrence per file.
    ByTag,
    /// Like [`Self::ByTag`], restricted to tags whose rendered values
    /// differ between files.
    ByTagDiffOnly,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByFile => write!(f, "by filename"),
            Self::ByTag => write!(f, "by tag"),
            Self::ByTagDiffOnly => write!(f, "by tag, differing values only"),
        }
    }
}

/// Build a tree over `entries` under the given projection.
///
/// With exactly one entry the file node becomes the root (a redundant top
/// level would otherwise hold a single child), and the tag projections
/// degrade to [`SortMode::ByFile`] since grouping by tag across one file is
/// meaningless.
///
/// # Errors
///
/// Returns [`TreeError::NoRecords`] when `entries` is empty.
pub fn build_tree(
    root_label: &str,
    entries: &[DatasetEntry],
    mode: SortMode,
    value_display_limit: usize,
) -> Result<TagTree, TreeError> {
    if entries.is_empty() {
        return Err(TreeError::NoRecords);
    }
    let tree = match mode {
        SortMode::ByFile => build_by_file(root_label, entries, value_display_limit),
        SortMode::ByTag if entries.len() > 1 => {
            build_by_tag(root_label, entries, value_display_limit, false)
        }
        SortMode::ByTagDiffOnly if entries.len() > 1 => {
            build_by_tag(root_label, entries, value_display_limit, true)
        }
        // Tag grouping over a single file degrades to file order.
        SortMode::ByTag | SortMode::ByTagDiffOnly => {
            build_by_file(root_label, entries, value_display_limit)
        }
    };
    Ok(tree)
}

fn build_by_file(root_label: &str, entries: &[DatasetEntry], limit: usize) -> TagTree {
    if let [entry] = entries {
        let mut tree = TagTree::new(entry.filename.clone());
        let root = tree.root();
        add_file_elements(&mut tree, root, 0, entry, limit);
        return tree;
    }

    let mut tree = TagTree::new(root_label);
    for (entry_idx, entry) in entries.iter().enumerate() {
        let root = tree.root();
        let file_node = tree.add_child(root, entry.filename.clone(), None);
        add_file_elements(&mut tree, file_node, entry_idx, entry, limit);
    }
    tree
}

/// Walk one file's elements in order, opening a new group node whenever the
/// group id changes from the previous element.
fn add_file_elements(
    tree: &mut TagTree,
    file_node: NodeId,
    entry_idx: usize,
    entry: &DatasetEntry,
    limit: usize,
) {
    let mut current_group: Option<(u16, NodeId)> = None;
    for (elem_idx, element) in entry.elements.iter().enumerate() {
        let group_node = match current_group {
            Some((group, id)) if group == element.tag.group => id,
            _ => {
                let id = tree.add_child(file_node, group_label(element.tag.group), None);
                current_group = Some((element.tag.group, id));
                id
            }
        };
        tree.add_child(
            group_node,
            element_label(element, limit),
            Some(ElementRef::new(entry_idx, elem_idx)),
        );
    }
}

fn build_by_tag(
    root_label: &str,
    entries: &[DatasetEntry],
    limit: usize,
    diff_only: bool,
) -> TagTree {
    // The filter decision for a tag must be known before its first
    // occurrence is emitted, hence a full pass up front.
    let distinct = diff_only.then(|| distinct_rendered_values(entries));

    let mut tree = TagTree::new(root_label);
    let mut group_nodes: HashMap<u16, NodeId> = HashMap::new();
    let mut tag_nodes: HashMap<TagKey, NodeId> = HashMap::new();

    for (entry_idx, entry) in entries.iter().enumerate() {
        for (elem_idx, element) in entry.elements.iter().enumerate() {
            // Group headers are created on first sighting even when the
            // diff filter later drops all of their children; pruning empty
            // headers is a presentation concern.
            let group_node = match group_nodes.get(&element.tag.group) {
                Some(&id) => id,
                None => {
                    let root = tree.root();
                    let id = tree.add_child(root, group_label(element.tag.group), None);
                    group_nodes.insert(element.tag.group, id);
                    id
                }
            };

            if let Some(distinct) = &distinct {
                let differs = distinct.get(&element.tag).is_some_and(|values| values.len() > 1);
                if !differs {
                    continue;
                }
            }

            let tag_node = match tag_nodes.get(&element.tag) {
                Some(&id) => id,
                None => {
                    let id = tree.add_child(
                        group_node,
                        tag_label(element),
                        Some(ElementRef::new(entry_idx, elem_idx)),
                    );
                    tag_nodes.insert(element.tag, id);
                    id
                }
            };

            tree.add_child(
                tag_node,
                occurrence_label(entry, element, limit),
                Some(ElementRef::new(entry_idx, elem_idx)),
            );
        }
    }
    tree
}

/// Distinct rendered values per tag across all files. Sequence values all
/// render empty and therefore never count as differing.
fn distinct_rendered_values(entries: &[DatasetEntry]) -> HashMap<TagKey, HashSet<String>> {
    let mut values: HashMap<TagKey, HashSet<String>> = HashMap::new();
    for entry in entries {
        for element in &entry.elements {
            values
                .entry(element.tag)
                .or_default()
                .insert(element.rendered_value().to_owned());
        }
    }
    values
}

fn group_label(group: u16) -> String {
    format!("{group:04x}")
}

fn tag_label(element: &Element) -> String {
    format!("{:04x} {}", element.tag.element, element.name)
}

fn element_label(element: &Element, limit: usize) -> String {
    let mut label = format!(
        "{:04x} {} ({}, {})",
        element.tag.element, element.name, element.vr, element.length
    );
    if let Some(value) = element.value.rendered()
        && !value.is_empty()
    {
        label.push_str(": ");
        label.push_str(&truncated(value, limit));
    }
    label
}

fn occurrence_label(entry: &DatasetEntry, element: &Element, limit: usize) -> String {
    match element.value.rendered() {
        Some(value) if !value.is_empty() => {
            format!("{}: {}", entry.filename, truncated(value, limit))
        }
        _ => entry.filename.clone(),
    }
}

fn truncated(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        value.to_owned()
    } else {
        let mut out: String = value.chars().take(limit).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{element, entry, patient_corpus, sequence_element};

    /// Pre-order (depth, label) snapshot for structural comparison.
    fn shape(tree: &TagTree) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        tree.walk(|id, _, depth| {
            out.push((depth, tree.node(id).label.clone()));
            true
        });
        out
    }

    #[test]
    fn test_single_file_flattens_to_file_root() {
        let entries = vec![entry(
            "scan.dcm",
            vec![element(0x0008, 0x0060, "Modality", "CS", "CT")],
        )];
        let tree = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();

        assert_eq!(tree.node(tree.root()).label, "scan.dcm");
        assert_eq!(tree.node(tree.root()).children.len(), 1);
    }

    #[test]
    fn test_tag_modes_degrade_to_by_file_for_single_entry() {
        let entries = vec![entry(
            "scan.dcm",
            vec![
                element(0x0008, 0x0060, "Modality", "CS", "CT"),
                element(0x0010, 0x0010, "PatientName", "PN", "Doe^John"),
            ],
        )];

        let by_file = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();
        let by_tag = build_tree("dir", &entries, SortMode::ByTag, 80).unwrap();
        let diff = build_tree("dir", &entries, SortMode::ByTagDiffOnly, 80).unwrap();

        assert_eq!(shape(&by_file), shape(&by_tag));
        assert_eq!(shape(&by_file), shape(&diff));
    }

    #[test]
    fn test_group_nodes_split_on_group_change() {
        // Three elements with groups 0008, 0008, 0010: exactly two group
        // nodes in first-appearance order.
        let entries = vec![entry(
            "scan.dcm",
            vec![
                element(0x0008, 0x0020, "StudyDate", "DA", "20240101"),
                element(0x0008, 0x0060, "Modality", "CS", "CT"),
                element(0x0010, 0x0010, "PatientName", "PN", "Doe^John"),
            ],
        )];
        let tree = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();

        let root = tree.root();
        let groups: Vec<&str> = tree.node(root)
            .children
            .iter()
            .map(|&id| tree.node(id).label.as_str())
            .collect();
        assert_eq!(groups, vec!["0008", "0010"]);

        let first_group = tree.node(root).children[0];
        assert_eq!(tree.node(first_group).children.len(), 2);
        let second_group = tree.node(root).children[1];
        assert_eq!(tree.node(second_group).children.len(), 1);
    }

    #[test]
    fn test_group_zero_opens_a_group_node() {
        let entries = vec![entry(
            "scan.dcm",
            vec![element(0x0000, 0x0002, "AffectedSOPClassUID", "UI", "1.2")],
        )];
        let tree = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();
        assert_eq!(tree.node(tree.node(tree.root()).children[0]).label, "0000");
    }

    #[test]
    fn test_by_file_leaf_references_cover_all_elements() {
        let entries = patient_corpus();
        let tree = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();

        let mut refs = Vec::new();
        tree.walk(|id, _, _| {
            let node = tree.node(id);
            if node.is_leaf()
                && let Some(reference) = node.reference
            {
                refs.push(reference);
            }
            true
        });

        let total: usize = entries.iter().map(|e| e.elements.len()).sum();
        assert_eq!(refs.len(), total);
        for (entry_idx, entry) in entries.iter().enumerate() {
            for elem_idx in 0..entry.elements.len() {
                assert!(refs.contains(&ElementRef::new(entry_idx, elem_idx)));
            }
        }
    }

    #[test]
    fn test_by_tag_groups_by_first_appearance() {
        let entries = vec![
            entry(
                "a.dcm",
                vec![
                    element(0x0010, 0x0010, "PatientName", "PN", "Doe^John"),
                    element(0x0008, 0x0060, "Modality", "CS", "CT"),
                ],
            ),
            entry(
                "b.dcm",
                vec![element(0x0008, 0x0060, "Modality", "CS", "MR")],
            ),
        ];
        let tree = build_tree("dir", &entries, SortMode::ByTag, 80).unwrap();

        // 0010 appears before 0008 in the first file, so it comes first
        // even though it is numerically larger.
        let groups: Vec<&str> = tree.node(tree.root())
            .children
            .iter()
            .map(|&id| tree.node(id).label.as_str())
            .collect();
        assert_eq!(groups, vec!["0010", "0008"]);
    }

    #[test]
    fn test_by_tag_occurrences_carry_filename_and_value() {
        let entries = patient_corpus();
        let tree = build_tree("dir", &entries, SortMode::ByTag, 80).unwrap();

        let mut labels = Vec::new();
        tree.walk(|id, _, _| {
            if tree.node(id).is_leaf() {
                labels.push(tree.node(id).label.clone());
            }
            true
        });
        assert!(labels.contains(&"A.dcm: Doe^John".to_owned()));
        assert!(labels.contains(&"B.dcm: Smith^Jane".to_owned()));
    }

    #[test]
    fn test_diff_only_keeps_exactly_differing_tags() {
        let tree = build_tree("dir", &patient_corpus(), SortMode::ByTagDiffOnly, 80).unwrap();

        let mut labels = Vec::new();
        tree.walk(|id, _, _| {
            labels.push(tree.node(id).label.clone());
            true
        });

        // PatientName differs between the two files; Modality does not.
        assert!(labels.iter().any(|l| l.contains("PatientName")));
        assert!(!labels.iter().any(|l| l.contains("Modality")));
        assert!(!labels.iter().any(|l| l.contains("CT")));
    }

    #[test]
    fn test_diff_only_concrete_two_file_scenario() {
        let entries = vec![
            entry("A.dcm", vec![element(0x0010, 0x0010, "PatientName", "PN", "Doe^John")]),
            entry("B.dcm", vec![element(0x0010, 0x0010, "PatientName", "PN", "Smith^Jane")]),
        ];
        let tree = build_tree("dir", &entries, SortMode::ByTagDiffOnly, 80).unwrap();

        let root = tree.root();
        assert_eq!(tree.node(root).children.len(), 1);
        let group = tree.node(root).children[0];
        assert_eq!(tree.node(group).label, "0010");
        assert_eq!(tree.node(group).children.len(), 1);

        let tag = tree.node(group).children[0];
        assert!(tree.node(tag).label.contains("PatientName"));
        assert!(tree.node(tag).reference.is_some());

        let occurrences: Vec<&str> = tree.node(tag)
            .children
            .iter()
            .map(|&id| tree.node(id).label.as_str())
            .collect();
        assert_eq!(occurrences, vec!["A.dcm: Doe^John", "B.dcm: Smith^Jane"]);
    }

    #[test]
    fn test_diff_only_sequences_never_differ() {
        let entries = vec![
            entry("a.dcm", vec![sequence_element(0x0008, 0x1140, "ReferencedImageSequence")]),
            entry("b.dcm", vec![sequence_element(0x0008, 0x1140, "ReferencedImageSequence")]),
        ];
        let tree = build_tree("dir", &entries, SortMode::ByTagDiffOnly, 80).unwrap();

        let mut labels = Vec::new();
        tree.walk(|id, _, _| {
            labels.push(tree.node(id).label.clone());
            true
        });
        assert!(!labels.iter().any(|l| l.contains("ReferencedImageSequence")));
        // The group header is still emitted by the first-sighting rule.
        assert!(labels.iter().any(|l| l == "0008"));
    }

    #[test]
    fn test_value_truncation_appends_ellipsis() {
        let long = "x".repeat(100);
        let entries = vec![entry(
            "scan.dcm",
            vec![element(0x0008, 0x0008, "ImageType", "CS", &long)],
        )];
        let tree = build_tree("dir", &entries, SortMode::ByFile, 10).unwrap();

        let group = tree.node(tree.root()).children[0];
        let leaf = tree.node(group).children[0];
        let label = &tree.node(leaf).label;
        assert!(label.ends_with('…'));
        assert!(label.contains(&"x".repeat(10)));
        assert!(!label.contains(&"x".repeat(11)));
    }

    #[test]
    fn test_sequence_values_not_rendered_inline() {
        let entries = vec![entry(
            "scan.dcm",
            vec![sequence_element(0x0008, 0x1140, "ReferencedImageSequence")],
        )];
        let tree = build_tree("dir", &entries, SortMode::ByFile, 80).unwrap();

        let group = tree.node(tree.root()).children[0];
        let leaf = tree.node(group).children[0];
        assert!(!tree.node(leaf).label.contains(':'));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = build_tree("dir", &[], SortMode::ByFile, 80).unwrap_err();
        assert!(matches!(err, TreeError::NoRecords));
        assert_eq!(err.to_string(), "no records to display");
    }

    #[test]
    fn test_fresh_tree_starts_collapsed_at_root() {
        let tree = build_tree("dir", &patient_corpus(), SortMode::ByFile, 80).unwrap();
        assert_eq!(tree.cursor(), tree.root());
        assert_eq!(tree.visible_nodes(), vec![tree.root()]);
    }
}
