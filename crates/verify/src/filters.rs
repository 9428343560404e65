//! Filter and repeatability checks on connection results

use chrono::{DateTime, FixedOffset};
use relaycheck_common::{verify, Connection, Error, QueryDescriptor, Result};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::dates::node_date;

/// Every returned node's searchable field contains `needle`, ignoring case
pub fn validate_search(
    conn: &Connection,
    descriptor: &QueryDescriptor,
    needle: &str,
    allow_empty: bool,
) -> Result<()> {
    let query = descriptor.query_name.as_str();
    verify!(
        allow_empty || !conn.is_empty(),
        "{}: search {:?} returned no results",
        query,
        needle
    );

    let needle_lower = needle.to_lowercase();
    for (i, node) in conn.nodes.iter().enumerate() {
        let text = node
            .field_text(&descriptor.name_path)
            .ok_or_else(|| Error::FieldNotFound {
                path: descriptor.name_path.to_string(),
                node: node.label(),
            })?;
        verify!(
            text.to_lowercase().contains(&needle_lower),
            "{}: nodes[{}] {} = {:?} does not contain {:?}",
            query,
            i,
            descriptor.name_path,
            text,
            needle
        );
    }

    debug!("{}: {} results match {:?}", query, conn.len(), needle);
    Ok(())
}

fn node_ids(conn: &Connection, descriptor: &QueryDescriptor) -> Result<BTreeSet<String>> {
    conn.nodes
        .iter()
        .map(|node| {
            node.field_text(&descriptor.id_path)
                .ok_or_else(|| Error::FieldNotFound {
                    path: descriptor.id_path.to_string(),
                    node: node.label(),
                })
        })
        .collect()
}

/// Result ids equal the requested `ids` filter
pub fn validate_ids(conn: &Connection, descriptor: &QueryDescriptor, requested: &[String]) -> Result<()> {
    let query = descriptor.query_name.as_str();
    let expected: BTreeSet<String> = requested.iter().cloned().collect();
    let actual = node_ids(conn, descriptor)?;

    verify!(
        conn.total_count == expected.len(),
        "{}: ids filter of {} ids gave totalCount {}",
        query,
        expected.len(),
        conn.total_count
    );
    verify!(
        actual == expected,
        "{}: ids filter returned {:?}, expected {:?}",
        query,
        actual,
        expected
    );
    Ok(())
}

/// Every node's date lies in `[start, end]`, and the result holds exactly
/// the baseline nodes in that range
pub fn validate_date_range(
    conn: &Connection,
    baseline: &Connection,
    descriptor: &QueryDescriptor,
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> Result<()> {
    let query = descriptor.query_name.as_str();
    let date_path = descriptor.date_path.as_ref().ok_or_else(|| {
        Error::InvalidScenario(format!("{} has no date field for range filters", query))
    })?;

    for (i, node) in conn.nodes.iter().enumerate() {
        let (date, raw) = node_date(node, date_path)?;
        verify!(
            &date >= start && &date <= end,
            "{}: nodes[{}] {} = {} outside [{}, {}]",
            query,
            i,
            date_path,
            raw,
            start.to_rfc3339(),
            end.to_rfc3339()
        );
    }

    if baseline.total_count > baseline.len() {
        warn!("{}: baseline capped, range membership not compared", query);
        return Ok(());
    }

    let mut in_range = Vec::new();
    for node in &baseline.nodes {
        let (date, _) = node_date(node, date_path)?;
        if &date >= start && &date <= end {
            in_range.push(node);
        }
    }

    verify!(
        conn.total_count == in_range.len(),
        "{}: date range totalCount {} != {} baseline nodes in range",
        query,
        conn.total_count,
        in_range.len()
    );
    for node in in_range {
        verify!(
            conn.len() < conn.total_count || conn.contains_node(node),
            "{}: node {} in date range missing from result",
            query,
            node.label()
        );
    }
    Ok(())
}

/// Re-issuing the same query without mutations in between yields the same data
pub fn validate_idempotent(query: &str, first: &Connection, second: &Connection) -> Result<()> {
    verify!(
        first.total_count == second.total_count,
        "{}: totalCount changed between identical queries ({} then {})",
        query,
        first.total_count,
        second.total_count
    );
    verify!(
        first.nodes == second.nodes,
        "{}: nodes changed between identical queries",
        query
    );
    verify!(
        first.edges == second.edges,
        "{}: edges changed between identical queries",
        query
    );
    Ok(())
}
