//! Turn collected conflicts into the result handed back to a submit form.

use serde::Serialize;

use crate::conflict::Conflict;
use crate::model::CampaignKind;

/// Outcome of an overlap check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    /// False when existing campaigns could not be loaded and the check was
    /// skipped under the fail-open policy.
    pub checked: bool,
    pub has_overlap: bool,
    /// One line per conflict joined with `\n`; empty when there is none.
    pub message: String,
    /// Conflicts ordered by rule, then by discovery order.
    pub conflicts: Vec<Conflict>,
    /// Existing records left out because they could not be normalized.
    pub skipped: usize,
}

impl OverlapReport {
    pub fn from_conflicts(kind: CampaignKind, mut conflicts: Vec<Conflict>, skipped: usize) -> Self {
        // Stable sort keeps discovery order within each rule.
        conflicts.sort_by_key(Conflict::rank);

        let message = conflicts
            .iter()
            .map(|c| c.describe(kind))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            checked: true,
            has_overlap: !conflicts.is_empty(),
            message,
            conflicts,
            skipped,
        }
    }

    /// A report for a check that could not run. Submission proceeds and the
    /// backend remains the final authority.
    pub fn unchecked() -> Self {
        Self {
            checked: false,
            has_overlap: false,
            message: String::new(),
            conflicts: Vec::new(),
            skipped: 0,
        }
    }

    /// Conflict lines, one per conflict.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.message.lines()
    }
}
