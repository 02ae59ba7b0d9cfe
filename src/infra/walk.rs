//! Filepath: src/infra/walk.rs
//! Source file discovery for a merge run.
//! - Recursive, every file with the configured extension
//! - Ignore files and hidden-file rules are NOT applied: a plugin tree is
//!   merged exactly as it sits on disk
//! - Exclude globs matched against the path relative to the root
//! - Optional single-path exclusion for the merge destination
//! - Deterministic (sorted) ordering so output is byte-stable across runs
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{
    WalkBuilder,
    types::{Types, TypesBuilder},
};
use tracing::debug;

/// Name of the custom file type registered with `ignore::types`
const SOURCE_TYPE: &str = "pluginsource";

/// Walker over one plugin source tree.
pub struct FileWalker
{
    /// Compiled set of exclude patterns
    exclude: GlobSet,

    /// Matcher selecting files by extension
    file_types: Types,

    /// Canonical path never returned (the merge destination)
    skip: Option<PathBuf>,
}

impl FileWalker
{
    /// Build a walker for `*.{extension}` files, minus anything matching
    /// one of `excludes` (e.g. "**/AssemblyInfo.cs").
    pub fn new(
        extension: &str,
        excludes: &[String],
    ) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in excludes
        {
            builder.add(
                Glob::new(pattern).with_context(|| format!("Invalid exclude glob `{pattern}`"))?,
            );
        }

        let mut tb = TypesBuilder::new();
        tb.add(SOURCE_TYPE, &format!("*.{extension}"))?;
        tb.select(SOURCE_TYPE);

        Ok(Self {
            exclude: builder.build()?,
            file_types: tb.build()?,
            skip: None,
        })
    }

    /// (Optional) Never return `path`, even if it matches. Used so a
    /// destination inside the source tree is not merged into itself.
    pub fn with_skip_path(
        mut self,
        path: &Path,
    ) -> Self
    {
        self.skip = Some(canonical_or_self(path));
        self
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // No .gitignore/.ignore/hidden handling: all files are candidates
        b.standard_filters(false);
        b.follow_links(false);
        b.types(
            self.file_types
                .clone(),
        );

        b
    }

    /// Traverse source files under `root`.
    /// Returns a **sorted** list of file paths for determinism.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Result<Vec<PathBuf>>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out = Vec::new();
        for entry in walker
        {
            // An unreadable directory aborts the run
            let entry = entry.with_context(|| format!("Failed to walk {}", root_path.display()))?;

            if !entry
                .file_type()
                .is_some_and(|ft| ft.is_file())
            {
                continue;
            }

            let abs = entry.into_path();
            let rel = abs
                .strip_prefix(root_path)
                .unwrap_or(&abs);

            if self
                .exclude
                .is_match(rel)
            {
                debug!(path = %rel.display(), "excluded by glob");
                continue;
            }

            if self
                .skip
                .as_deref()
                .is_some_and(|skip| canonical_or_self(&abs) == skip)
            {
                debug!(path = %rel.display(), "skipping merge destination");
                continue;
            }

            out.push(abs);
        }

        // Deterministic order (stable output & tests)
        out.sort();

        Ok(out)
    }
}

fn canonical_or_self(path: &Path) -> PathBuf
{
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
