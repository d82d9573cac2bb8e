use globset::{Glob, GlobMatcher};
use regex::{Regex, RegexBuilder};

use crate::cli::RegexMode;
use crate::error::{Result, RetentionsError};

/// A compiled basename matcher.
///
/// Globs are anchored to the full basename by construction; regular
/// expressions are wrapped in `^(?:...)$` so that a partial match never
/// selects an entry for deletion.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Glob { raw: String, matcher: GlobMatcher },
    Regex { raw: String, regex: Regex },
}

impl NamePattern {
    /// Compiles a pattern according to the configured regex mode.
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile.
    pub fn new(pattern: &str, mode: Option<RegexMode>) -> Result<Self> {
        match mode {
            None => Self::glob(pattern),
            Some(RegexMode::Casesensitive) => Self::regex(pattern, false),
            Some(RegexMode::Ignorecase) => Self::regex(pattern, true),
        }
    }

    /// Compiles a shell-style glob (`*`, `?`, character classes).
    ///
    /// # Errors
    /// Returns an error if the glob syntax is invalid.
    pub fn glob(pattern: &str) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|e| RetentionsError::InvalidGlob {
                pattern: pattern.to_string(),
                source: e,
            })?
            .compile_matcher();
        Ok(Self::Glob {
            raw: pattern.to_string(),
            matcher,
        })
    }

    /// Compiles a regular expression anchored to the full basename.
    ///
    /// # Errors
    /// Returns an error if the regex syntax is invalid.
    pub fn regex(pattern: &str, ignore_case: bool) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| RetentionsError::InvalidRegex {
                pattern: pattern.to_string(),
                source: e,
            })?;
        Ok(Self::Regex {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// Tests a basename against the pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Glob { matcher, .. } => matcher.is_match(name),
            Self::Regex { regex, .. } => regex.is_match(name),
        }
    }

    /// The pattern text as given on the command line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Glob { raw, .. } | Self::Regex { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
