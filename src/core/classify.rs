//! Line classification by prefix and pattern tests.
//!
//! No grammar is involved: a line is a namespace declaration, an import,
//! a directive marker or plain content purely by how its text looks.

use std::sync::LazyLock;

use regex::Regex;

use crate::infra::config::Markers;

const NAMESPACE_KEYWORD: &str = "namespace ";

/// `using X.Y;` but not `using (var x = ...)` or `using static Foo(...);`
static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*using\s+[^(]+;$").expect("valid import regex"));

/// First parenthesized group on a line
static ARGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid args regex"));

/// Structural shape of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Namespace(&'a str),
    Import,
    Directive(Vec<&'a str>),
    Content,
}

/// Debug marker hits on one line; substring tests, so several can be set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMarks {
    pub start: bool,
    pub end: bool,
}

pub struct LineClassifier<'m> {
    markers: &'m Markers,
}

impl<'m> LineClassifier<'m> {
    pub fn new(markers: &'m Markers) -> Self {
        Self { markers }
    }

    pub fn debug_marks(&self, line: &str) -> DebugMarks {
        DebugMarks {
            start: line.contains(&self.markers.debug_start),
            end: line.contains(&self.markers.debug_end),
        }
    }

    pub fn has_debug_enable(&self, line: &str) -> bool {
        line.contains(&self.markers.debug_enable)
    }

    /// Classify a line seen at brace depth 0.
    pub fn top_level<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(name) = namespace_name(line) {
            LineKind::Namespace(name)
        } else if is_import(line) {
            LineKind::Import
        } else {
            LineKind::Content
        }
    }

    /// Classify a line inside a namespace body.
    pub fn body<'a>(&self, line: &'a str) -> LineKind<'a> {
        if line.contains(&self.markers.insert) {
            LineKind::Directive(directive_args(line))
        } else {
            LineKind::Content
        }
    }
}

/// `namespace Foo.Bar {` -> `Foo.Bar`
pub fn namespace_name(line: &str) -> Option<&str> {
    if !line.trim_start_matches(' ').starts_with(NAMESPACE_KEYWORD) {
        return None;
    }

    line.trim_matches(|c: char| c == ' ' || c == '{')
        .strip_prefix(NAMESPACE_KEYWORD)
}

pub fn is_import(line: &str) -> bool {
    IMPORT_RE.is_match(line)
}

/// Comma/space separated tokens of the first `(...)` group.
pub fn directive_args(line: &str) -> Vec<&str> {
    ARGS_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split([',', ' '])
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
