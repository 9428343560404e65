//! Per-scenario pagination context

use relaycheck_common::{Connection, Cursor, WindowArgs};

use crate::boundary::Boundary;

/// Baseline snapshot plus the reference position picked from it.
///
/// Created by the cursor locator and passed to every later check of the
/// same scenario.
#[derive(Debug, Clone)]
pub struct PaginationContext {
    query: String,
    baseline: Connection,
    index: usize,
}

impl PaginationContext {
    /// `index` must address an edge of `baseline`
    pub(crate) fn new(query: &str, baseline: Connection, index: usize) -> Self {
        debug_assert!(index < baseline.len());
        Self {
            query: query.to_string(),
            baseline,
            index,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn baseline(&self) -> &Connection {
        &self.baseline
    }

    /// 0-based position of the reference edge
    pub fn index(&self) -> usize {
        self.index
    }

    /// `totalCount` of the baseline
    pub fn total_count(&self) -> usize {
        self.baseline.total_count
    }

    /// Cursor of the reference edge
    pub fn cursor(&self) -> &Cursor {
        &self.baseline.edges[self.index].cursor
    }

    pub fn window_args(&self, boundary: Boundary, limit: Option<usize>) -> WindowArgs {
        boundary.window_args(self.cursor(), limit)
    }
}
