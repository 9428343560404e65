//! Expected counts and index ranges of windowed queries
//!
//! With baseline `totalCount` T and reference index `idx`:
//!
//! | boundary       | totalCount  | window                          |
//! |----------------|-------------|---------------------------------|
//! | `before`       | idx         | `[0, idx)`                      |
//! | `before+first` | idx         | `[0, min(f, idx))`              |
//! | `before+last`  | idx         | `[idx - min(l, idx), idx)`      |
//! | `after`        | T - idx - 1 | `[idx + 1, min(T, idx + 1 + cap))` |
//! | `after+first`  | T - idx - 1 | `[idx + 1, min(T, idx + 1 + f))`   |
//! | `after+last`   | T - idx - 1 | `[max(idx + 1, T - l), T)`      |
//!
//! Windows are positions in the full ordering and may extend past the
//! baseline page when the baseline itself was capped.

use relaycheck_common::{verify, Connection, Result};
use std::ops::Range;
use tracing::debug;

use crate::boundary::Boundary;
use crate::context::PaginationContext;

/// What a windowed response must look like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub boundary: Boundary,
    /// Expected `totalCount`
    pub total_count: usize,
    /// Baseline positions the window must hold
    pub range: Range<usize>,
    /// Whether `startCursor` differs from the baseline's
    pub start_moves: bool,
    /// Whether `endCursor` differs from the baseline's
    pub end_moves: bool,
}

impl Expectation {
    /// Number of edges the window must return
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Single-item windows skip cursor boundary checks
    pub fn is_single(&self) -> bool {
        self.range.len() == 1
    }
}

/// Compute the expectation for `boundary` around the context's reference edge
pub fn reconcile(
    ctx: &PaginationContext,
    boundary: Boundary,
    limit: Option<usize>,
    page_cap: usize,
) -> Result<Expectation> {
    let limit = boundary.checked_limit(limit)?;
    let t = ctx.total_count();
    let idx = ctx.index();
    let after_count = t - idx - 1;

    let (total_count, range) = match boundary {
        Boundary::Before => (idx, 0..idx),
        Boundary::BeforeFirst => (idx, 0..limit.min(idx)),
        Boundary::BeforeLast => (idx, idx - limit.min(idx)..idx),
        Boundary::After => (after_count, idx + 1..(idx + 1 + page_cap).min(t)),
        Boundary::AfterFirst => (after_count, idx + 1..(idx + 1 + limit).min(t)),
        Boundary::AfterLast => {
            let diff = (t - 1) - idx;
            let start = (idx + 1 + diff).saturating_sub(limit).max(idx + 1);
            (after_count, start..idx + diff + 1)
        }
    };

    let baseline_len = ctx.baseline().len();
    let expectation = Expectation {
        boundary,
        total_count,
        start_moves: range.start != 0,
        end_moves: range.end != baseline_len,
        range,
    };

    debug!(
        "{}: {} at index {} (limit {}) expects totalCount {} over {:?}",
        ctx.query(),
        boundary,
        idx,
        limit,
        expectation.total_count,
        expectation.range
    );

    Ok(expectation)
}

/// Windowed `totalCount` and edge count must match the expectation
pub fn check_counts(expectation: &Expectation, actual: &Connection, query: &str) -> Result<()> {
    verify!(
        actual.total_count == expectation.total_count,
        "{}: {} totalCount {} != expected {}",
        query,
        expectation.boundary,
        actual.total_count,
        expectation.total_count
    );
    verify!(
        actual.len() == expectation.len(),
        "{}: {} returned {} edges, expected {} (range {:?})",
        query,
        expectation.boundary,
        actual.len(),
        expectation.len(),
        expectation.range
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaycheck_common::fixtures::RelayFixture;
    use relaycheck_common::{OrderDirection, WindowArgs};
    use test_case::test_case;

    /// Context with the reference pinned at `index`
    fn context(count: usize, index: usize) -> PaginationContext {
        let baseline =
            RelayFixture::products(count).resolve(OrderDirection::Asc, &WindowArgs::default());
        PaginationContext::new("products", baseline, index)
    }

    #[test_case(Boundary::Before, None, 4, 0..4 ; "before")]
    #[test_case(Boundary::After, None, 5, 5..10 ; "after")]
    #[test_case(Boundary::BeforeFirst, Some(3), 4, 0..3 ; "before first")]
    #[test_case(Boundary::BeforeLast, Some(3), 4, 1..4 ; "before last")]
    #[test_case(Boundary::AfterFirst, Some(3), 5, 5..8 ; "after first")]
    #[test_case(Boundary::AfterLast, Some(3), 5, 7..10 ; "after last")]
    #[test_case(Boundary::BeforeFirst, Some(9), 4, 0..4 ; "before first larger than window")]
    #[test_case(Boundary::AfterLast, Some(9), 5, 5..10 ; "after last larger than window")]
    fn test_ten_items_index_four(
        boundary: Boundary,
        limit: Option<usize>,
        total: usize,
        range: Range<usize>,
    ) {
        let exp = reconcile(&context(10, 4), boundary, limit, 25).unwrap();
        assert_eq!(exp.total_count, total);
        assert_eq!(exp.range, range);
    }

    #[test]
    fn test_boundary_movement() {
        let ctx = context(10, 4);

        let before = reconcile(&ctx, Boundary::Before, None, 25).unwrap();
        assert!(!before.start_moves);
        assert!(before.end_moves);

        let after = reconcile(&ctx, Boundary::After, None, 25).unwrap();
        assert!(after.start_moves);
        assert!(!after.end_moves);

        let after_first = reconcile(&ctx, Boundary::AfterFirst, Some(2), 25).unwrap();
        assert!(after_first.start_moves);
        assert!(after_first.end_moves);
    }

    #[test]
    fn test_after_on_capped_baseline() {
        let ctx = context(60, 0);
        assert_eq!(ctx.baseline().len(), 25);

        let exp = reconcile(&ctx, Boundary::After, None, 25).unwrap();
        assert_eq!(exp.total_count, 59);
        assert_eq!(exp.range, 1..26);
        assert!(exp.end_moves);
    }

    #[test]
    fn test_empty_before_window() {
        let exp = reconcile(&context(2, 0), Boundary::Before, None, 25).unwrap();
        assert_eq!(exp.total_count, 0);
        assert!(exp.is_empty());
    }

    #[test]
    fn test_limit_validation() {
        let ctx = context(10, 4);
        assert!(reconcile(&ctx, Boundary::AfterFirst, None, 25).is_err());
        assert!(reconcile(&ctx, Boundary::Before, Some(2), 25).is_err());
    }

    #[test]
    fn test_check_counts() {
        let fixture = RelayFixture::products(10);
        let ctx = context(10, 4);
        let exp = reconcile(&ctx, Boundary::AfterFirst, Some(3), 25).unwrap();

        let good = fixture.resolve(OrderDirection::Asc, &ctx.window_args(Boundary::AfterFirst, Some(3)));
        check_counts(&exp, &good, "products").unwrap();

        let wrong = fixture.resolve(OrderDirection::Asc, &ctx.window_args(Boundary::AfterFirst, Some(4)));
        let err = check_counts(&exp, &wrong, "products").unwrap_err();
        assert!(err.to_string().contains("returned 4 edges"));
    }
}
