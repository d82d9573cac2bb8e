//! The unit of decision: one direct child of the base directory,
//! its decision state, and the event log justifying it.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::plan::bucket::{BucketKey, Granularity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// Why an entry entered the keep set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetainReason {
    /// Representative of a calendar slot.
    Bucket {
        granularity: Granularity,
        key: BucketKey,
    },
    /// Among the globally newest `count` entries.
    Last { count: u32 },
}

impl fmt::Display for RetainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket { granularity, key } => write!(f, "{granularity}[{key}]"),
            Self::Last { count } => write!(f, "last[{count}]"),
        }
    }
}

/// Why an entry ended up in the prune set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneReason {
    /// No retention rule selected it.
    OutsideRetention,
    /// Demoted by `--max-age`; `limit` is the configured duration text.
    MaxAge { limit: String },
    /// Demoted by `--max-files`.
    MaxFiles { limit: u64 },
    /// Demoted by `--max-size`; `limit` is the configured size text.
    MaxSize { limit: String },
}

impl fmt::Display for PruneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideRetention => f.write_str("outside-retention"),
            Self::MaxAge { limit } => write!(f, "max-age(exceeded {limit})"),
            Self::MaxFiles { limit } => write!(f, "max-files(exceeded {limit})"),
            Self::MaxSize { limit } => write!(f, "max-size(exceeded {limit})"),
        }
    }
}

/// The decision attached to an entry.
///
/// `Undecided` exists only between discovery and the retention pass;
/// the integrity stage rejects any entry still carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Decision {
    #[default]
    Undecided,
    Protected,
    Retained(RetainReason),
    Pruned(PruneReason),
}

impl Decision {
    #[must_use]
    pub const fn is_undecided(&self) -> bool {
        matches!(self, Self::Undecided)
    }

    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Protected)
    }

    #[must_use]
    pub const fn is_retained(&self) -> bool {
        matches!(self, Self::Retained(_))
    }

    #[must_use]
    pub const fn is_pruned(&self) -> bool {
        matches!(self, Self::Pruned(_))
    }
}

/// One event in an entry's decision log.
///
/// Each variant carries enough data to regenerate its rendered message
/// at any verbosity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionEvent {
    Protected { pattern: String },
    Retained { reason: RetainReason },
    Demoted { reason: PruneReason, prior: RetainReason },
    Pruned { reason: PruneReason },
}

impl DecisionEvent {
    /// The pipeline stage that produced this event.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Protected { .. } => "protection",
            Self::Retained { .. } | Self::Pruned { .. } => "retention",
            Self::Demoted { .. } => "filter",
        }
    }
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protected { pattern } => write!(f, "matched protect pattern '{pattern}'"),
            Self::Retained { reason } => write!(f, "retained by {reason}"),
            Self::Demoted { reason, prior } => write!(f, "demoted by {reason} (was {prior})"),
            Self::Pruned { reason } => write!(f, "pruned: {reason}"),
        }
    }
}

/// One discovered child of the base directory.
///
/// The facts (`path`, `name`, `kind`, `size`, `age`) are fixed at
/// discovery; only `decision` and `log` change as the passes run.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Absolute, link-resolved path.
    pub path: PathBuf,
    /// Basename used for pattern matching.
    pub name: String,
    pub kind: EntryKind,
    /// Byte count; 0 for folders in folder mode.
    pub size: u64,
    /// Timestamp used for ordering and bucketing.
    pub age: DateTime<Local>,
    pub decision: Decision,
    pub log: Vec<DecisionEvent>,
}

impl Entry {
    #[must_use]
    pub fn new(path: PathBuf, name: String, kind: EntryKind, size: u64, age: DateTime<Local>) -> Self {
        Self {
            path,
            name,
            kind,
            size,
            age,
            decision: Decision::Undecided,
            log: Vec::new(),
        }
    }

    /// Marks the entry protected, removing it from the working set.
    pub fn protect(&mut self, pattern: &str) {
        self.decision = Decision::Protected;
        self.log.push(DecisionEvent::Protected {
            pattern: pattern.to_string(),
        });
    }

    /// Marks the entry retained.
    ///
    /// The first reason becomes the decision; later reasons (an entry can
    /// satisfy several rules) are only appended to the log.
    pub fn retain(&mut self, reason: RetainReason) {
        if self.decision.is_undecided() {
            self.decision = Decision::Retained(reason.clone());
        }
        self.log.push(DecisionEvent::Retained { reason });
    }

    /// Demotes a retained entry to the prune set, preserving the prior
    /// retain reason in the log.
    pub fn demote(&mut self, reason: PruneReason) {
        if let Decision::Retained(prior) = &self.decision {
            self.log.push(DecisionEvent::Demoted {
                reason: reason.clone(),
                prior: prior.clone(),
            });
            self.decision = Decision::Pruned(reason);
        }
    }

    /// Prunes an entry no retention rule selected.
    pub fn prune(&mut self, reason: PruneReason) {
        self.decision = Decision::Pruned(reason.clone());
        self.log.push(DecisionEvent::Pruned { reason });
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
