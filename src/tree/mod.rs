//! Tree materialization, navigation and search
//!
//! The engine at the center of dcmtree: [`build_tree`] projects parsed
//! datasets into a [`TagTree`] under one of three grouping policies, and the
//! navigation ([`nav`](self)) and search impls move the tree's cursor in
//! response to user commands.
//!
//! # Architecture
//!
//! - `node`: arena storage, the pre-order walk primitive, and the
//!   visibility/depth/parent/sibling views derived from it
//! - `build`: the three projections and label formatting
//! - `nav`: total, no-op-on-edge cursor movement
//! - `search`: cursor-anchored cyclic substring search

mod build;
mod nav;
mod node;
mod search;

pub use build::{DEFAULT_VALUE_DISPLAY_LIMIT, SortMode, TreeError, build_tree};
pub use node::{Node, NodeId, TagTree};
pub use search::MIN_QUERY_LEN;
