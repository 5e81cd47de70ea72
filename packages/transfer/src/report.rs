//! Per-node outcomes of a write flow.

use std::fmt;

use zktool_tree_store::{Error, NodePath};

/// What happened when a single node was written.
#[derive(Debug)]
pub enum Outcome {
    /// The node was absent and has been created.
    Created,
    /// The node existed and its payload was overwritten.
    Updated,
    /// The store rejected the write; the batch carried on.
    Failed(Error),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct ReportEntry {
    pub path: NodePath,
    pub value: String,
    pub outcome: Outcome,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Created => write!(f, "created {} = {}", self.path, self.value),
            Outcome::Updated => write!(f, "updated {} = {}", self.path, self.value),
            Outcome::Failed(error) => write!(f, "failed {}: {}", self.path, error),
        }
    }
}

/// Counts of each outcome kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} failed, {} skipped",
            self.created, self.updated, self.failed, self.skipped
        )
    }
}

/// Collects the outcome of every attempted write plus a count of entries
/// that were skipped before any write was attempted.
///
/// A printing report also echoes each entry to stdout as it is recorded, so
/// progress is visible while a long batch runs.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
    skipped: usize,
    echo: bool,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printing() -> Self {
        Report {
            echo: true,
            ..Self::default()
        }
    }

    pub fn record(&mut self, path: NodePath, value: impl Into<String>, outcome: Outcome) {
        let entry = ReportEntry {
            path,
            value: value.into(),
            outcome,
        };
        match &entry.outcome {
            Outcome::Failed(_) => log::warn!("{}", entry),
            _ => log::debug!("{}", entry),
        }
        if self.echo {
            println!("{}", entry);
        }
        self.entries.push(entry);
    }

    /// Count an entry that was never sent to the store.
    pub fn skip(&mut self, what: &str, reason: &str) {
        log::debug!("skipped {}: {}", what, reason);
        self.skipped += 1;
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn outcome(&self, path: &NodePath) -> Option<&Outcome> {
        self.entries
            .iter()
            .rev()
            .find(|entry| &entry.path == path)
            .map(|entry| &entry.outcome)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            skipped: self.skipped,
            ..Summary::default()
        };
        for entry in &self.entries {
            match entry.outcome {
                Outcome::Created => summary.created += 1,
                Outcome::Updated => summary.updated += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|entry| entry.outcome.is_failure())
    }
}
