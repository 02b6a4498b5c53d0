//! Line/column positions attached to syntax nodes and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in a source file.
///
/// `SourceInfo::NONE` (line 0) marks nodes synthesized without a source
/// location, e.g. trees built by hand in tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    pub line: u32,
    pub column: u32,
}

impl SourceInfo {
    pub const NONE: SourceInfo = SourceInfo { line: 0, column: 0 };

    pub const fn new(line: u32, column: u32) -> Self {
        SourceInfo { line, column }
    }

    pub const fn is_none(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
