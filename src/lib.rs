//! dcmtree - a terminal DICOM tag browser
//!
//! This library loads the tag elements of one or more DICOM files and
//! presents them as a navigable tree under three projections: by file, by
//! tag, and by tag restricted to values that differ between files.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod dicom;
pub mod model;
pub mod tree;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum DcmTreeError {
    /// DICOM loading or parsing error
    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::DicomError),
    /// Tree materialization error
    #[error("Tree error: {0}")]
    Tree(#[from] tree::TreeError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
