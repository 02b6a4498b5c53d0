//! Language levels.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A language level, from most to least restricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageLevel {
    Elementary,
    Intermediate,
    Advanced,
    Full,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 4] = [
        LanguageLevel::Elementary,
        LanguageLevel::Intermediate,
        LanguageLevel::Advanced,
        LanguageLevel::Full,
    ];

    /// Level selected by a source file's extension.
    pub fn from_extension(extension: &str) -> Option<LanguageLevel> {
        match extension {
            "dj0" => Some(LanguageLevel::Elementary),
            "dj1" => Some(LanguageLevel::Intermediate),
            "dj2" => Some(LanguageLevel::Advanced),
            "java" => Some(LanguageLevel::Full),
            _ => None,
        }
    }

    /// Level of a file name such as `Shapes.dj1`; `None` for other extensions.
    pub fn for_file(file_name: &str) -> Option<LanguageLevel> {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageLevel::from_extension)
    }

    pub const fn extension(self) -> &'static str {
        match self {
            LanguageLevel::Elementary => "dj0",
            LanguageLevel::Intermediate => "dj1",
            LanguageLevel::Advanced => "dj2",
            LanguageLevel::Full => "java",
        }
    }

    /// Name used in diagnostic messages.
    pub const fn name(self) -> &'static str {
        match self {
            LanguageLevel::Elementary => "Elementary",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Full => "Full Java",
        }
    }

    pub const fn is_restricted(self) -> bool {
        !matches!(self, LanguageLevel::Full)
    }

    /// The next more permissive level, or `None` for Full Java.
    pub const fn next_permissive(self) -> Option<LanguageLevel> {
        match self {
            LanguageLevel::Elementary => Some(LanguageLevel::Intermediate),
            LanguageLevel::Intermediate => Some(LanguageLevel::Advanced),
            LanguageLevel::Advanced => Some(LanguageLevel::Full),
            LanguageLevel::Full => None,
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a level name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown language level '{}' (expected elementary, intermediate, advanced or full)",
            self.0
        )
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for LanguageLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "elementary" | "dj0" => Ok(LanguageLevel::Elementary),
            "intermediate" | "dj1" => Ok(LanguageLevel::Intermediate),
            "advanced" | "dj2" => Ok(LanguageLevel::Advanced),
            "full" | "java" => Ok(LanguageLevel::Full),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}
