//! Per-file line state: brace depth and debug-region membership.

use crate::core::classify::DebugMarks;

/// Net `{` minus `}` on a raw line. Braces in strings and comments count.
pub fn brace_delta(line: &str) -> isize {
    let bytes = line.as_bytes();
    bytecount::count(bytes, b'{') as isize - bytecount::count(bytes, b'}') as isize
}

/// Depth before and after one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStep {
    pub before: isize,
    pub after: isize,
}

impl DepthStep {
    /// Namespace and import lines are only recognized here
    pub fn is_top_level(&self) -> bool {
        self.before == 0
    }

    pub fn is_body(&self) -> bool {
        self.after != 0
    }
}

/// Signed nesting counter; negative depth from malformed input is carried
/// along as-is.
#[derive(Debug, Default, Clone)]
pub struct BraceDepth {
    depth: isize,
}

impl BraceDepth {
    pub fn depth(&self) -> isize {
        self.depth
    }

    pub fn step(&mut self, line: &str) -> DepthStep {
        let before = self.depth;
        self.depth += brace_delta(line);
        DepthStep {
            before,
            after: self.depth,
        }
    }
}

/// Debug-only region tracking.
///
/// The start marker opens the region before the retain check on its own
/// line, and the end marker closes it after, so both marker lines belong to
/// the region.
#[derive(Debug, Default, Clone)]
pub struct DebugRegion {
    inside: bool,
}

impl DebugRegion {
    pub fn inside(&self) -> bool {
        self.inside
    }

    /// Apply the opening marker, then report whether the line is kept.
    pub fn enter(&mut self, marks: DebugMarks, debug_enabled: bool) -> bool {
        if marks.start {
            self.inside = true;
        }
        debug_enabled || !self.inside
    }

    /// Apply the closing marker once the line has been handled.
    pub fn leave(&mut self, marks: DebugMarks) {
        if marks.end {
            self.inside = false;
        }
    }
}
