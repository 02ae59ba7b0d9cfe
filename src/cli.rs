use clap::Parser;
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

/// One-line usage shown when the positional arguments are wrong
pub const USAGE: &str =
    "Usage: oxify \"Source\" \"Target\" \"PluginName\" \"VersionNumber\".";

#[derive(Debug, Parser)]
#[command(name = "oxify")]
#[command(about = "Merge a tree of plugin source files into a single self-contained plugin file")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub merge: MergeArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Merge everything but do not write the destination
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct MergeArgs {
    /// Root directory holding the plugin's source files
    pub source: PathBuf,

    /// Merged output file (overwritten if it exists)
    pub destination: PathBuf,

    /// Display name of the plugin
    pub plugin_name: String,

    /// Version string of the plugin
    pub plugin_version: String,

    /// Configuration file (defaults to ./oxify.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "oxify",
            "src",
            "out/Plugin.cs",
            "Plugin",
            "1.2.3",
            "--quiet",
            "--config",
            "oxify.toml",
        ])
        .expect("valid argv");

        assert_eq!(cli.merge.source, PathBuf::from("src"));
        assert_eq!(cli.merge.destination, PathBuf::from("out/Plugin.cs"));
        assert_eq!(cli.merge.plugin_name, "Plugin");
        assert_eq!(cli.merge.plugin_version, "1.2.3");
        assert_eq!(cli.merge.config, Some(PathBuf::from("oxify.toml")));
        assert!(cli.context().quiet);
        assert!(!cli.context().dry_run);
    }

    #[test]
    fn rejects_wrong_positional_count() {
        assert!(Cli::try_parse_from(["oxify", "src", "out.cs", "Plugin"]).is_err());
        assert!(Cli::try_parse_from(["oxify", "a", "b", "c", "d", "e"]).is_err());
    }
}
