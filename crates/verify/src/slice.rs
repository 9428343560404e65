//! Windowed results against baseline slices

use relaycheck_common::{verify, Connection, Result};
use std::ops::Range;
use tracing::debug;

use crate::count::Expectation;

/// Every baseline item inside `range` is present in `actual`; every item
/// outside it is absent.
///
/// Membership is checked, not position; ordering is trusted to the baseline.
pub fn validate_slice(
    baseline: &Connection,
    actual: &Connection,
    range: &Range<usize>,
    query: &str,
) -> Result<()> {
    for (i, (node, edge)) in baseline.nodes.iter().zip(&baseline.edges).enumerate() {
        let inside = range.contains(&i);

        verify!(
            actual.contains_node(node) == inside,
            "{}: node {} at baseline index {} {} (window {:?})",
            query,
            node.label(),
            i,
            if inside { "missing" } else { "unexpectedly present" },
            range
        );
        verify!(
            actual.contains_edge(edge) == inside,
            "{}: edge with cursor {} at baseline index {} {} (window {:?})",
            query,
            edge.cursor,
            i,
            if inside { "missing" } else { "unexpectedly present" },
            range
        );
    }
    Ok(())
}

/// `startCursor`/`endCursor` sit on the window's first and last baseline edge.
///
/// Boundaries past the end of a capped baseline cannot be checked.
pub fn validate_boundary_cursors(
    baseline: &Connection,
    actual: &Connection,
    expectation: &Expectation,
    query: &str,
) -> Result<()> {
    if expectation.is_empty() {
        return Ok(());
    }
    if expectation.is_single() {
        debug!("{}: single-item window, cursor equality skipped", query);
        return Ok(());
    }

    let range = &expectation.range;
    if let Some(edge) = baseline.edges.get(range.start) {
        verify!(
            actual.page_info.start_cursor.as_ref() == Some(&edge.cursor),
            "{}: {} startCursor {:?} != baseline cursor {} at index {}",
            query,
            expectation.boundary,
            actual.page_info.start_cursor,
            edge.cursor,
            range.start
        );
    }
    if let Some(edge) = baseline.edges.get(range.end - 1) {
        verify!(
            actual.page_info.end_cursor.as_ref() == Some(&edge.cursor),
            "{}: {} endCursor {:?} != baseline cursor {} at index {}",
            query,
            expectation.boundary,
            actual.page_info.end_cursor,
            edge.cursor,
            range.end - 1
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;
    use crate::context::PaginationContext;
    use crate::count::reconcile;
    use relaycheck_common::fixtures::RelayFixture;
    use relaycheck_common::{OrderDirection, WindowArgs};

    fn setup(index: usize) -> (RelayFixture, PaginationContext) {
        let fixture = RelayFixture::products(10);
        let baseline = fixture.resolve(OrderDirection::Asc, &WindowArgs::default());
        (fixture, PaginationContext::new("products", baseline, index))
    }

    #[test]
    fn test_after_first_slice() {
        let (fixture, ctx) = setup(4);
        let exp = reconcile(&ctx, Boundary::AfterFirst, Some(3), 25).unwrap();
        let actual = fixture.resolve(
            OrderDirection::Asc,
            &ctx.window_args(Boundary::AfterFirst, Some(3)),
        );

        validate_slice(ctx.baseline(), &actual, &exp.range, "products").unwrap();
        validate_boundary_cursors(ctx.baseline(), &actual, &exp, "products").unwrap();
        assert_eq!(actual.page_info.end_cursor.as_ref(), Some(&ctx.baseline().edges[7].cursor));
    }

    #[test]
    fn test_off_by_one_window_is_caught() {
        let (fixture, ctx) = setup(4);
        let exp = reconcile(&ctx, Boundary::After, None, 25).unwrap();

        // server that includes the reference item itself
        let wrong = fixture.resolve(
            OrderDirection::Asc,
            &Boundary::After.window_args(&ctx.baseline().edges[3].cursor, None),
        );

        let err = validate_slice(ctx.baseline(), &wrong, &exp.range, "products").unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("baseline index 4 unexpectedly present"));
    }

    #[test]
    fn test_tampered_cursor_is_caught() {
        let (fixture, ctx) = setup(4);
        let exp = reconcile(&ctx, Boundary::Before, None, 25).unwrap();
        let mut actual =
            fixture.resolve(OrderDirection::Asc, &ctx.window_args(Boundary::Before, None));
        actual.edges[1].cursor = "Zm9yZ2Vk".into();

        let err = validate_slice(ctx.baseline(), &actual, &exp.range, "products").unwrap_err();
        assert!(err.to_string().contains("edge with cursor"));
    }

    #[test]
    fn test_single_item_skips_cursor_checks() {
        let (fixture, ctx) = setup(1);
        let exp = reconcile(&ctx, Boundary::Before, None, 25).unwrap();
        assert!(exp.is_single());

        let mut actual =
            fixture.resolve(OrderDirection::Asc, &ctx.window_args(Boundary::Before, None));
        actual.page_info.end_cursor = None;

        validate_boundary_cursors(ctx.baseline(), &actual, &exp, "products").unwrap();
    }

    #[test]
    fn test_wrong_end_cursor_is_caught() {
        let (fixture, ctx) = setup(6);
        let exp = reconcile(&ctx, Boundary::BeforeLast, Some(3), 25).unwrap();
        let mut actual = fixture.resolve(
            OrderDirection::Asc,
            &ctx.window_args(Boundary::BeforeLast, Some(3)),
        );
        actual.page_info.end_cursor = actual.page_info.start_cursor.clone();

        let err =
            validate_boundary_cursors(ctx.baseline(), &actual, &exp, "products").unwrap_err();
        assert!(err.to_string().contains("endCursor"));
    }
}
