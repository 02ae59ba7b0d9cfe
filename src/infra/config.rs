use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config files probed in the working directory, first hit wins
const CONFIG_PATHS: [&str; 2] = ["oxify.toml", ".oxify.toml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Extension (without the dot) of the source files to merge
    pub source_extension: String,

    /// Glob patterns, relative to the source root, that are never merged
    pub exclude: Vec<String>,

    /// Directive markers embedded in source comments
    pub markers: Markers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers
{
    /// Anywhere in the tree: keep debug regions in every file
    pub debug_enable: String,

    /// Opens a debug-only region
    pub debug_start: String,

    /// Closes a debug-only region
    pub debug_end: String,

    /// Expands into synthesized content, e.g. `//OX.INSERT(PluginInfo, ...)`
    pub insert: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError
{
    #[error("marker `{0}` must not be empty")]
    EmptyMarker(&'static str),
    #[error("invalid source extension `{0}` (expected e.g. `cs`)")]
    InvalidExtension(String),
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            source_extension: "cs".to_string(),
            exclude: vec!["**/AssemblyInfo.cs".to_string()],
            markers: Markers::default(),
        }
    }
}

impl Default for Markers
{
    fn default() -> Self
    {
        Self {
            debug_enable: "//OX.DEBUGENABLE".to_string(),
            debug_start: "//OX.DEBUGSTART".to_string(),
            debug_end: "//OX.DEBUGEND".to_string(),
            insert: "//OX.INSERT(".to_string(),
        }
    }
}

impl Config
{
    pub fn validate(&self) -> Result<(), ConfigError>
    {
        let ext = &self.source_extension;
        if ext.is_empty() || ext.contains('.') || ext.contains(['/', '\\', '*'])
        {
            return Err(ConfigError::InvalidExtension(ext.clone()));
        }

        let markers = [
            ("debug_enable", &self.markers.debug_enable),
            ("debug_start", &self.markers.debug_start),
            ("debug_end", &self.markers.debug_end),
            ("insert", &self.markers.insert),
        ];
        for (name, value) in markers
        {
            if value.is_empty()
            {
                return Err(ConfigError::EmptyMarker(name));
            }
        }

        Ok(())
    }
}

/// Layer defaults, an optional TOML file and `OXIFY__*` environment
/// variables, in that order.
pub fn load_config(explicit: Option<&Path>) -> Result<Config>
{
    let defaults = config::Config::try_from(&Config::default())
        .context("Failed to serialize default configuration")?;
    let mut builder = config::Config::builder().add_source(defaults);

    match explicit
    {
        Some(path) =>
        {
            if !path.exists()
            {
                return Err(ConfigError::MissingFile(path.to_path_buf()).into());
            }
            builder = builder.add_source(config::File::from(path));
        }
        None =>
        {
            if let Some(path) = CONFIG_PATHS
                .iter()
                .map(Path::new)
                .find(|p| p.exists())
            {
                builder = builder.add_source(config::File::from(path));
            }
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("OXIFY")
            .prefix_separator("__")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    parsed.validate()?;
    Ok(parsed)
}
