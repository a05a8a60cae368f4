//! File-level collaborators of the propagation engine: topology and config
//! loading (RON/JSON/TOML by extension) and result export (CSV/JSON).

pub mod export;
pub mod loader;

pub use export::{ExportError, export_file, write_csv, write_json};
pub use loader::{DataLoadError, Scenario, load_config, load_scenario, load_topology};
