//! dcmtree application entry point
//!
//! Loads the configuration, parses command-line arguments, reads the DICOM
//! input once, then hands the terminal to the interactive browser.
//!
//! # Usage
//!
//! ```bash
//! # Browse a single file
//! dcmtree scan.dcm
//!
//! # Browse a directory, starting in the tag-difference projection
//! dcmtree study/ --sort tag-diff
//! ```
//!
//! # Configuration
//!
//! On first run a default configuration is written to the user's config
//! directory (`~/.config/dcmtree/config.toml` on Linux).

use dcmtree::{
    DcmTreeError,
    cli::Cli,
    config::DcmTreeConfig,
    dicom,
    ui::App,
};

fn main() -> Result<(), DcmTreeError> {
    let config = DcmTreeConfig::load()?;
    let cli = Cli::parse_args();

    let sort = cli.sort.map_or(config.default_sort, Into::into);
    let (root_label, entries) = dicom::load_path(&cli.input)?;

    let mut app = App::new(root_label, entries, sort, &config)?;
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result.map_err(DcmTreeError::Io)
}
