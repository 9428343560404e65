//! pageInfo checks

use relaycheck_common::{verify, Connection, Result};
use tracing::debug;

use crate::count::Expectation;

/// Flags match when given; start/end cursors match the first/last edge
pub fn validate_page_info(
    conn: &Connection,
    query: &str,
    expect_next: Option<bool>,
    expect_previous: Option<bool>,
) -> Result<()> {
    if let Some(expected) = expect_next {
        verify!(
            conn.page_info.has_next_page == expected,
            "{}: hasNextPage is {}, expected {}",
            query,
            conn.page_info.has_next_page,
            expected
        );
    }
    if let Some(expected) = expect_previous {
        verify!(
            conn.page_info.has_previous_page == expected,
            "{}: hasPreviousPage is {}, expected {}",
            query,
            conn.page_info.has_previous_page,
            expected
        );
    }

    let (first, last) = match (conn.edges.first(), conn.edges.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(()),
    };
    verify!(
        conn.page_info.start_cursor.as_ref() == Some(&first.cursor),
        "{}: startCursor {:?} != edges[0].cursor {}",
        query,
        conn.page_info.start_cursor,
        first.cursor
    );
    verify!(
        conn.page_info.end_cursor.as_ref() == Some(&last.cursor),
        "{}: endCursor {:?} != edges[{}].cursor {}",
        query,
        conn.page_info.end_cursor,
        conn.edges.len() - 1,
        last.cursor
    );
    Ok(())
}

/// Start/end cursors stay equal to the baseline's or move away from them,
/// depending on which side of the window the boundary cut
pub fn validate_boundary_movement(
    baseline: &Connection,
    actual: &Connection,
    expectation: &Expectation,
    query: &str,
) -> Result<()> {
    if actual.is_empty() {
        return Ok(());
    }
    if expectation.is_single() {
        debug!("{}: single-item window, cursor movement skipped", query);
        return Ok(());
    }

    let start_same = actual.page_info.start_cursor == baseline.page_info.start_cursor;
    verify!(
        start_same != expectation.start_moves,
        "{}: {} startCursor {:?} expected to {} baseline startCursor {:?}",
        query,
        expectation.boundary,
        actual.page_info.start_cursor,
        if expectation.start_moves { "differ from" } else { "equal" },
        baseline.page_info.start_cursor
    );

    let end_same = actual.page_info.end_cursor == baseline.page_info.end_cursor;
    verify!(
        end_same != expectation.end_moves,
        "{}: {} endCursor {:?} expected to {} baseline endCursor {:?}",
        query,
        expectation.boundary,
        actual.page_info.end_cursor,
        if expectation.end_moves { "differ from" } else { "equal" },
        baseline.page_info.end_cursor
    );
    Ok(())
}
