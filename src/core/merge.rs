//! Merge run: discover, read, aggregate, render, write.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, instrument};

use crate::cli::{AppContext, MergeArgs};
use crate::core::aggregate::{Aggregator, Merged};
use crate::core::directive::PluginIdentity;
use crate::core::render::{RenderContext, render};
use crate::infra::config::{Config, load_config};
use crate::infra::io::{InputFile, write_atomic};
use crate::infra::walk::FileWalker;

/// Header timestamp, e.g. `3/14/2025 9:26:53 PM`
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

pub fn run(args: MergeArgs, ctx: &AppContext) -> Result<()> {
    if ctx.no_color {
        owo_colors::set_override(false);
    }

    let config = load_config(args.config.as_deref())?;
    let plugin = PluginIdentity {
        name: args.plugin_name.clone(),
        version: args.plugin_version.clone(),
    };

    if !ctx.quiet {
        println!("Merging Plugin - {} v{}", plugin.name.bold(), plugin.version);
    }

    let files = discover(&args.source, &args.destination, &config)?;
    info!(count = files.len(), source = %args.source.display(), "Found source files");

    let merged = merge_files(&files, &args.source, &config, &plugin, ctx);

    let timestamp = chrono::Local::now()
        .format(TIMESTAMP_FORMAT)
        .to_string();
    let output = render(
        &merged,
        &RenderContext {
            plugin: &plugin,
            config: &config,
            tool_version: env!("CARGO_PKG_VERSION"),
            timestamp: &timestamp,
        },
    );

    if ctx.dry_run {
        if !ctx.quiet {
            println!("{}", "DRY RUN: Would merge:".yellow());
            for file in &files {
                println!("  {}", file.display_path(&args.source));
            }
            println!(
                "{}",
                format!(
                    "Would write {} bytes to {}",
                    output.len(),
                    args.destination.display()
                )
                .yellow()
            );
        }
        return Ok(());
    }

    write_atomic(&args.destination, output.as_bytes())?;

    if !ctx.quiet {
        let stats = merged.stats;
        println!(
            "{} Merged {} files ({} namespaces, {} imports, plugin by {}) into {}",
            "✓".green(),
            stats.files,
            merged.namespaces.len(),
            merged.imports.len(),
            merged.metadata,
            args.destination.display()
        );
        if stats.orphaned > 0 {
            println!(
                "{}",
                format!("{} line(s) outside any namespace were dropped", stats.orphaned).yellow()
            );
        }
    }

    Ok(())
}

/// Sorted source files under `source`, read whole. Any unreadable file
/// aborts the run.
#[instrument(skip(config))]
pub fn discover(source: &Path, destination: &Path, config: &Config) -> Result<Vec<InputFile>> {
    if !source.is_dir() {
        anyhow::bail!("Source directory not found: {}", source.display());
    }

    let walker = FileWalker::new(&config.source_extension, &config.exclude)?
        .with_skip_path(destination);
    let paths = walker.walk_files(source)?;

    // Read in parallel, collect in discovery order
    paths
        .par_iter()
        .map(|p| InputFile::read(p).with_context(|| format!("Failed to read {}", p.display())))
        .collect()
}

/// Both passes, with a per-file progress bar unless quiet.
pub fn merge_files(
    files: &[InputFile],
    root: &Path,
    config: &Config,
    plugin: &PluginIdentity,
    ctx: &AppContext,
) -> Merged {
    let aggregator = Aggregator::new(&config.markers, plugin);

    let progress = if ctx.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let mut merged = Merged {
        debug_enabled: aggregator.resolve_debug_flag(files),
        ..Merged::default()
    };
    if merged.debug_enabled {
        info!("Debug Enabled");
        progress.println(format!("{}", "Debug Enabled".yellow()));
    }

    for file in files {
        progress.set_message(format!("Parsing {}", file.display_path(root)));
        aggregator.merge_file(file, &mut merged);
        progress.inc(1);
    }

    progress.finish_and_clear();
    merged
}
