//! Topology and simulation-config loading.
//!
//! Provides format detection (RON/JSON/TOML), file discovery inside a
//! scenario directory, and the helpers that turn a description file into a
//! wired [`Network`].

use lightpath_core::config::{ConfigError, SimulationConfig};
use lightpath_core::graph::{GraphError, Network, TopologyDescription};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Why a topology, config or scenario could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// No `{file}.ron|toml|json` exists in `dir`.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The same base name exists in more than one format, so the choice
    /// would be arbitrary.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// Syntax or shape error reported by the format's deserializer.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Well-formed description that fails topology construction.
    #[error("invalid topology in {file}: {source}")]
    Topology { file: PathBuf, source: GraphError },

    #[error("invalid config in {file}: {source}")]
    Config { file: PathBuf, source: ConfigError },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Formats and file lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Every format with its file extension, in lookup order.
    pub const ALL: [(Format, &'static str); 3] = [
        (Format::Ron, "ron"),
        (Format::Toml, "toml"),
        (Format::Json, "json"),
    ];

    pub fn from_extension(extension: &str) -> Option<Format> {
        Self::ALL
            .iter()
            .find(|(_, ext)| *ext == extension)
            .map(|&(format, _)| format)
    }
}

/// Map a file's extension to its [`Format`].
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

/// Path of `dir/{base_name}.<ext>` for the single supported extension
/// present. `None` when there is none. Two or more present is a
/// [`DataLoadError::ConflictingFormats`].
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let candidates = Format::ALL.map(|(_, ext)| dir.join(format!("{base_name}.{ext}")));
    let mut present = candidates.into_iter().filter(|candidate| candidate.exists());

    let Some(first) = present.next() else {
        return Ok(None);
    };
    match present.next() {
        Some(second) => Err(DataLoadError::ConflictingFormats {
            a: first,
            b: second,
        }),
        None => Ok(Some(first)),
    }
}

/// [`find_data_file`] for files a scenario cannot do without.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Deserialize `content` according to `format`. `file` is only used for
/// error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read `path` and deserialize it with the format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read a topology description and build, wire and freeze it.
pub fn load_topology(path: &Path) -> Result<Network, DataLoadError> {
    let description: TopologyDescription = deserialize_file(path)?;
    let network =
        Network::from_description(&description).map_err(|source| DataLoadError::Topology {
            file: path.to_path_buf(),
            source,
        })?;
    info!(
        file = %path.display(),
        nodes = network.node_count(),
        lines = network.line_count(),
        "topology loaded"
    );
    Ok(network)
}

/// Read and validate a simulation config file.
pub fn load_config(path: &Path) -> Result<SimulationConfig, DataLoadError> {
    let config: SimulationConfig = deserialize_file(path)?;
    config.validate().map_err(|source| DataLoadError::Config {
        file: path.to_path_buf(),
        source,
    })?;
    debug!(file = %path.display(), ?config, "config loaded");
    Ok(config)
}

/// A scenario directory: a required `topology.*` and an optional
/// `simulation.*` file.
#[derive(Debug)]
pub struct Scenario {
    pub network: Network,
    pub config: SimulationConfig,
}

/// Load a scenario directory. A missing `simulation.*` file means the
/// default config.
pub fn load_scenario(dir: &Path) -> Result<Scenario, DataLoadError> {
    let network = load_topology(&require_data_file(dir, "topology")?)?;
    let config = match find_data_file(dir, "simulation")? {
        Some(path) => load_config(&path)?,
        None => SimulationConfig::default(),
    };
    Ok(Scenario { network, config })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
