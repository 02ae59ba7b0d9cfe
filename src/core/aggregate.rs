//! Two-pass accumulation of namespace bodies and imports.
//!
//! Pass 1 resolves the debug flag (an OR over every line of every file).
//! Pass 2 walks the files in discovery order and runs the per-line state
//! machine:
//!
//! ```text
//! step depth -> open debug region -> retained?
//!   depth before == 0 : namespace decl | import | (ignored)
//!   else depth after != 0 : directive (expanded) | content
//! -> close debug region
//! ```

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::core::classify::{LineClassifier, LineKind};
use crate::core::directive::{self, Directive, PluginIdentity, PluginMetadata};
use crate::core::tracker::{BraceDepth, DebugRegion};
use crate::infra::config::Markers;
use crate::infra::io::InputFile;

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub files: usize,
    pub lines_read: usize,
    /// Lines removed because they sit in a debug region
    pub debug_filtered: usize,
    /// Body lines seen before any namespace declaration in their file
    pub orphaned: usize,
    pub directives: usize,
}

/// Final accumulation, consumed once by the renderer.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    pub debug_enabled: bool,
    pub imports: IndexSet<String>,
    pub namespaces: IndexMap<String, Vec<String>>,
    pub metadata: PluginMetadata,
    pub stats: MergeStats,
}

/// Per-file line state, reset at the top of every file
#[derive(Debug, Default)]
struct FileState {
    namespace: Option<String>,
    depth: BraceDepth,
    region: DebugRegion,
}

pub struct Aggregator<'a> {
    classifier: LineClassifier<'a>,
    plugin: &'a PluginIdentity,
}

impl<'a> Aggregator<'a> {
    pub fn new(markers: &'a Markers, plugin: &'a PluginIdentity) -> Self {
        Self {
            classifier: LineClassifier::new(markers),
            plugin,
        }
    }

    /// Pass 1: is the debug-enable marker present anywhere?
    pub fn resolve_debug_flag(&self, files: &[InputFile]) -> bool {
        files
            .par_iter()
            .any(|f| f.lines.iter().any(|l| self.classifier.has_debug_enable(l)))
    }

    /// Run both passes over `files`, in the given order.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn merge(&self, files: &[InputFile]) -> Merged {
        let debug_enabled = self.resolve_debug_flag(files);
        if debug_enabled {
            info!("Debug Enabled");
        }

        let mut merged = Merged {
            debug_enabled,
            ..Merged::default()
        };

        for file in files {
            self.merge_file(file, &mut merged);
        }

        merged
    }

    /// Pass 2 for a single file, accumulating into `merged`.
    pub fn merge_file(&self, file: &InputFile, merged: &mut Merged) {
        debug!(path = %file.path.display(), "Parsing");

        let mut state = FileState::default();
        merged.stats.files += 1;

        for (idx, line) in file.lines.iter().enumerate() {
            merged.stats.lines_read += 1;

            let step = state.depth.step(line);
            let marks = self.classifier.debug_marks(line);
            let retained = state.region.enter(marks, merged.debug_enabled);

            if !retained {
                merged.stats.debug_filtered += 1;
            } else if step.is_top_level() {
                match self.classifier.top_level(line) {
                    LineKind::Namespace(name) => {
                        if !merged.namespaces.contains_key(name) {
                            merged.namespaces.insert(name.to_string(), Vec::new());
                            info!(namespace = name, "Added Namespace");
                        }
                        state.namespace = Some(name.to_string());
                    }
                    LineKind::Import => {
                        merged.imports.insert(line.clone());
                    }
                    _ => {}
                }
            } else if step.is_body() {
                let body_line = match self.classifier.body(line) {
                    LineKind::Directive(args) => {
                        merged.stats.directives += 1;
                        directive::expand(
                            &Directive::parse(&args),
                            line,
                            self.plugin,
                            &mut merged.metadata,
                        )
                    }
                    _ => Some(line.clone()),
                };

                if let Some(body_line) = body_line {
                    match state
                        .namespace
                        .as_ref()
                        .and_then(|ns| merged.namespaces.get_mut(ns))
                    {
                        Some(bucket) => bucket.push(body_line),
                        None => {
                            merged.stats.orphaned += 1;
                            warn!(
                                path = %file.path.display(),
                                line = idx + 1,
                                "content outside any namespace dropped"
                            );
                        }
                    }
                }
            }

            state.region.leave(marks);
        }
    }
}
