//! **oxify** - Merge a plugin's source tree into one self-contained file
//!
//! Line-oriented, brace-counting merge with namespace bucketing, import
//! deduplication, debug-only regions and metadata insertion directives.

/// Command-line interface with clap integration
pub mod cli;

/// Core merge pipeline
pub mod core {
    /// Prefix/pattern line classification (namespace, import, directive)
    pub mod classify;

    /// Brace depth and debug-region state machines
    pub mod tracker;

    /// Insert-marker directives and plugin metadata
    pub mod directive;

    /// Two-pass namespace/import accumulation
    pub mod aggregate;
    pub use aggregate::{Aggregator, MergeStats, Merged};

    /// Header + imports + namespace blocks
    pub mod render;
    pub use render::{RenderContext, render};

    /// End-to-end merge run behind the CLI
    pub mod merge;
    pub use merge::run as merge_run;
}

/// Infrastructure - Configuration, I/O, and discovery
pub mod infra {
    /// Layered configuration (defaults, oxify.toml, OXIFY__* env)
    pub mod config;
    pub use config::{Config, ConfigError, Markers, load_config};

    /// Whole-file reads and atomic destination writes
    pub mod io;
    pub use io::{InputFile, write_atomic};

    /// Deterministic source discovery
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use crate::cli::{AppContext, Cli, MergeArgs};
pub use crate::core::{Aggregator, Merged, merge_run, render};
pub use crate::infra::{Config, FileWalker, InputFile, load_config};
