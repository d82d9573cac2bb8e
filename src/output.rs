//! Verbosity handling and stderr reporting.
//!
//! Everything diagnostic goes to stderr; stdout is reserved for
//! `--list-only` output.

use std::fmt;
use std::str::FromStr;

use crate::companion::Companion;
use crate::entry::{Decision, Entry};

/// Log level for stderr output.
///
/// Accepts numeric aliases on the command line: `0` = ERROR, `1` = WARN,
/// `2` = INFO, `3` = DEBUG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "0" | "ERROR" => Ok(Self::Error),
            "1" | "WARN" => Ok(Self::Warn),
            "2" | "INFO" => Ok(Self::Info),
            "3" | "DEBUG" => Ok(Self::Debug),
            _ => Err(format!(
                "unknown verbosity '{s}'. Valid values: 0-3, ERROR, WARN, INFO, DEBUG"
            )),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };
        write!(f, "{name}")
    }
}

/// Level-filtered stderr writer used by every pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    level: Verbosity,
}

impl Reporter {
    #[must_use]
    pub const fn new(level: Verbosity) -> Self {
        Self { level }
    }

    #[must_use]
    pub fn enabled(&self, level: Verbosity) -> bool {
        self.level >= level
    }

    pub fn error(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Error) {
            eprintln!("error: {}", message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Warn) {
            eprintln!("warning: {}", message.as_ref());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Info) {
            eprintln!("{}", message.as_ref());
        }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("debug: {}", message.as_ref());
        }
    }

    /// Renders the decision log for a fully partitioned entry list.
    ///
    /// One line per entry at INFO; the per-entry event trail is appended
    /// at DEBUG. Companions are reported right after the entry that
    /// pulled them in.
    pub fn report_decisions(&self, entries: &[Entry], companions: &[Companion]) {
        if !self.enabled(Verbosity::Info) {
            return;
        }
        for entry in entries {
            match &entry.decision {
                Decision::Protected => {
                    self.info(format!("protect {}", entry.path.display()));
                }
                Decision::Retained(reason) => {
                    self.info(format!("keep {} ({reason})", entry.path.display()));
                }
                Decision::Pruned(reason) => {
                    self.info(format!("prune {} ({reason})", entry.path.display()));
                    for companion in companions.iter().filter(|c| c.source == entry.path) {
                        self.info(format!(
                            "prune {} (companion-of {})",
                            companion.path.display(),
                            companion.source.display()
                        ));
                    }
                }
                Decision::Undecided => {}
            }
            if self.enabled(Verbosity::Debug) {
                for event in &entry.log {
                    self.debug(format!("  {}: {event}", event.stage()));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
