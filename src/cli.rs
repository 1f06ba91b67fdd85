//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for dcmtree using the `clap` crate.
//! The binary takes a single input path (a DICOM file or a directory of
//! DICOM files) plus an optional initial projection.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::tree::SortMode;

/// Initial projection selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// One subtree per file, groups in file order
    File,
    /// Group by tag across all files
    Tag,
    /// Group by tag, keeping only tags whose values differ between files
    TagDiff,
}

impl From<SortOrder> for SortMode {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::File => Self::ByFile,
            SortOrder::Tag => Self::ByTag,
            SortOrder::TagDiff => Self::ByTagDiffOnly,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "dcmtree",
    version,
    about = "Browse the tags of DICOM files as a navigable tree"
)]
pub struct Cli {
    /// DICOM file or directory of DICOM files to inspect
    pub input: PathBuf,

    /// Initial tree projection (overrides the configured default)
    #[arg(short, long, value_enum)]
    pub sort: Option<SortOrder>,
}

impl Cli {
    /// Parse arguments from the process environment.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_input_and_sort() {
        let cli = Cli::try_parse_from(["dcmtree", "study/", "--sort", "tag-diff"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("study/"));
        assert_eq!(cli.sort, Some(SortOrder::TagDiff));
        assert_eq!(SortMode::from(SortOrder::TagDiff), SortMode::ByTagDiffOnly);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["dcmtree"]).is_err());
    }
}
