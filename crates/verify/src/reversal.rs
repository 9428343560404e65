//! Ascending vs descending order checks

use relaycheck_common::{verify, Connection, Error, Node, Result};
use tracing::debug;

/// `desc` must be `asc` reversed, with start and end swapping physical items.
///
/// Cursors are direction-specific, so edges are compared by node only.
pub fn validate_reverse_order(query: &str, asc: &Connection, desc: &Connection) -> Result<()> {
    for (direction, conn) in [("ascending", asc), ("descending", desc)] {
        verify!(
            conn.nodes.len() == conn.edges.len(),
            "{}: {} nodes.length {} != edges.length {}",
            query,
            direction,
            conn.nodes.len(),
            conn.edges.len()
        );
    }
    verify!(
        asc.total_count == desc.total_count,
        "{}: totalCount ascending {} != descending {}",
        query,
        asc.total_count,
        desc.total_count
    );
    verify!(
        asc.nodes.len() == desc.nodes.len(),
        "{}: nodes.length ascending {} != descending {}",
        query,
        asc.nodes.len(),
        desc.nodes.len()
    );
    verify!(
        asc.edges.len() == desc.edges.len(),
        "{}: edges.length ascending {} != descending {}",
        query,
        asc.edges.len(),
        desc.edges.len()
    );

    let len = asc.nodes.len();
    // reversing an odd-length list leaves the middle item in place
    let middle = (len % 2 == 1).then_some(len / 2);

    for i in 0..len {
        let mirrored = len - 1 - i;

        verify!(
            desc.nodes[i] == asc.nodes[mirrored],
            "{}: descending nodes[{}] {} != ascending nodes[{}] {}",
            query,
            i,
            desc.nodes[i].label(),
            mirrored,
            asc.nodes[mirrored].label()
        );
        verify!(
            desc.edges[i].node == asc.edges[mirrored].node,
            "{}: descending edges[{}].node {} != ascending edges[{}].node {}",
            query,
            i,
            desc.edges[i].node.label(),
            mirrored,
            asc.edges[mirrored].node.label()
        );

        if Some(i) != middle {
            verify!(
                asc.nodes[i] != desc.nodes[i],
                "{}: nodes[{}] {} identical in both directions",
                query,
                i,
                asc.nodes[i].label()
            );
            verify!(
                asc.edges[i].node != desc.edges[i].node,
                "{}: edges[{}].node {} identical in both directions",
                query,
                i,
                asc.edges[i].node.label()
            );
        }
    }

    if len >= 2 {
        verify!(
            desc.page_info.start_cursor != asc.page_info.start_cursor,
            "{}: startCursor {:?} unchanged after reversing order",
            query,
            asc.page_info.start_cursor
        );

        let desc_start = boundary_node(desc, true, query, "descending")?;
        let desc_end = boundary_node(desc, false, query, "descending")?;
        let asc_start = boundary_node(asc, true, query, "ascending")?;
        let asc_end = boundary_node(asc, false, query, "ascending")?;

        verify!(
            desc_start == asc_end,
            "{}: descending start node {} != ascending end node {}",
            query,
            desc_start.label(),
            asc_end.label()
        );
        verify!(
            desc_end == asc_start,
            "{}: descending end node {} != ascending start node {}",
            query,
            desc_end.label(),
            asc_start.label()
        );
    }

    debug!("{}: {} items reverse cleanly", query, len);
    Ok(())
}

/// Node under the start (or end) cursor of a page
fn boundary_node<'a>(
    conn: &'a Connection,
    start: bool,
    query: &str,
    direction: &str,
) -> Result<&'a Node> {
    let (cursor, which) = if start {
        (conn.page_info.start_cursor.as_ref(), "startCursor")
    } else {
        (conn.page_info.end_cursor.as_ref(), "endCursor")
    };
    cursor
        .and_then(|c| conn.node_at_cursor(c))
        .ok_or_else(|| {
            Error::AssertionFailed(format!(
                "{}: {} {} {:?} not among edges",
                query, direction, which, cursor
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaycheck_common::fixtures::RelayFixture;
    use relaycheck_common::{OrderDirection, WindowArgs};

    fn both(count: usize) -> (Connection, Connection) {
        let fixture = RelayFixture::products(count);
        (
            fixture.resolve(OrderDirection::Asc, &WindowArgs::default()),
            fixture.resolve(OrderDirection::Desc, &WindowArgs::default()),
        )
    }

    #[test]
    fn test_odd_length_middle_exempt() {
        let (asc, desc) = both(5);
        assert_eq!(asc.nodes[2], desc.nodes[2]);
        validate_reverse_order("products", &asc, &desc).unwrap();
    }

    #[test]
    fn test_even_length() {
        let (asc, desc) = both(6);
        validate_reverse_order("products", &asc, &desc).unwrap();
    }

    #[test]
    fn test_same_order_fails() {
        let (asc, _) = both(4);
        let err = validate_reverse_order("products", &asc, &asc).unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_swapped_pair_fails() {
        let (asc, mut desc) = both(5);
        desc.nodes.swap(0, 1);
        let err = validate_reverse_order("products", &asc, &desc).unwrap_err();
        assert!(err.to_string().contains("descending nodes[0]"));
    }

    #[test]
    fn test_length_mismatch() {
        let (asc, _) = both(5);
        let (_, desc) = both(4);
        let err = validate_reverse_order("products", &asc, &desc).unwrap_err();
        assert!(err.to_string().contains("totalCount"));
    }

    #[test]
    fn test_edges_shorter_than_nodes() {
        let (asc, mut desc) = both(4);
        let (mut asc_short, _) = both(4);
        asc_short.edges.pop();
        desc.edges.pop();

        let err = validate_reverse_order("products", &asc_short, &desc).unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("ascending nodes.length 4 != edges.length 3"));

        let err = validate_reverse_order("products", &asc, &desc).unwrap_err();
        assert!(err.to_string().contains("descending nodes.length 4 != edges.length 3"));
    }

    #[test]
    fn test_start_cursor_must_change() {
        let (asc, mut desc) = both(4);
        desc.page_info.start_cursor = asc.page_info.start_cursor.clone();
        let err = validate_reverse_order("products", &asc, &desc).unwrap_err();
        assert!(err.to_string().contains("unchanged"));
    }

    #[test]
    fn test_boundary_cursor_on_wrong_node() {
        let (asc, mut desc) = both(4);
        desc.page_info.end_cursor = Some(desc.edges[2].cursor.clone());
        let err = validate_reverse_order("products", &asc, &desc).unwrap_err();
        assert!(err.to_string().contains("descending end node"));
    }
}
