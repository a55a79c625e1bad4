//! Missing-value audit trail and per-column statistics.

use serde::Serialize;

use crate::domain::{MergedPanel, MissingAction, MissingValueEvent};

/// Ordered log of every missing-value event in a run.
///
/// Events keep insertion order: per-series events in catalog order first,
/// then alignment-stage events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingValueReport {
    events: Vec<MissingValueEvent>,
}

impl MissingValueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MissingValueEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[MissingValueEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events that need manual follow-up.
    pub fn still_missing(&self) -> impl Iterator<Item = &MissingValueEvent> {
        self.events
            .iter()
            .filter(|e| e.action == MissingAction::StillMissing)
    }
}

impl Extend<MissingValueEvent> for MissingValueReport {
    fn extend<T: IntoIterator<Item = MissingValueEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

/// Missing-value count for one panel column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
    pub total: usize,
    /// Share of rows missing, in percent.
    pub pct: f64,
}

/// Per-column missing counts, in panel column order.
pub fn column_missing(panel: &MergedPanel) -> Vec<ColumnMissing> {
    let total = panel.rows();
    panel
        .columns
        .iter()
        .map(|col| {
            let missing = col.values.iter().filter(|v| v.is_none()).count();
            let pct = if total == 0 {
                0.0
            } else {
                missing as f64 / total as f64 * 100.0
            };
            ColumnMissing {
                column: col.name.clone(),
                missing,
                total,
                pct,
            }
        })
        .collect()
}
