//! Terminal user interface
//!
//! ratatui widgets and the application event loop. Everything here is
//! presentation glue over the tree engine: it converts labels, expand flags
//! and the cursor into rows on screen and key presses into engine calls.

mod app;
mod help;
mod search_bar;
mod tree_view;

pub use app::App;
pub use search_bar::{SearchBar, SearchInput};
pub use tree_view::{TreeView, TreeViewState};
