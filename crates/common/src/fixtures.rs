//! In-memory Relay resolver
//!
//! Serves a fixed, ascending-ordered node list with Relay window semantics
//! (cursor bounds first, then `first`/`last`, page cap when neither is given).
//! Used by engine tests and by the mock GraphQL endpoint of the harness tests.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

use crate::model::{Connection, Cursor, Edge, Node, OrderDirection, PageInfo, WindowArgs};
use crate::DEFAULT_PAGE_CAP;

#[derive(Debug, Clone)]
pub struct RelayFixture {
    query: String,
    nodes: Vec<Node>,
    page_cap: usize,
}

impl RelayFixture {
    /// `nodes` must already be in ascending order
    pub fn new(query: &str, nodes: Vec<Node>) -> Self {
        Self {
            query: query.to_string(),
            nodes,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }

    /// `count` synthetic products named `Product 001..`; neighbours share a `created` date
    pub fn products(count: usize) -> Self {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let nodes = (0..count)
            .map(|i| {
                let created = base + Duration::days((i / 2) as i64);
                Node::new(json!({
                    "id": STANDARD.encode(format!("Product:{}", i + 1)),
                    "name": format!("Product {:03}", i + 1),
                    "created": format!("{}T09:30:00+00:00", created),
                }))
            })
            .collect();
        Self::new("products", nodes)
    }

    pub fn with_page_cap(mut self, page_cap: usize) -> Self {
        self.page_cap = page_cap;
        self
    }

    pub fn query_name(&self) -> &str {
        &self.query
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Copy keeping only nodes matching `keep`, as a server-side filter would
    pub fn filtered(&self, keep: impl Fn(&Node) -> bool) -> Self {
        Self {
            query: self.query.clone(),
            nodes: self.nodes.iter().filter(|n| keep(n)).cloned().collect(),
            page_cap: self.page_cap,
        }
    }

    /// Direction-specific cursor of a node
    pub fn cursor(direction: OrderDirection, node: &Node) -> Cursor {
        Cursor(STANDARD.encode(format!("{}:{}", direction, node.label())))
    }

    pub fn resolve(&self, direction: OrderDirection, args: &WindowArgs) -> Connection {
        let mut ordered: Vec<&Node> = self.nodes.iter().collect();
        if direction == OrderDirection::Desc {
            ordered.reverse();
        }

        let edges: Vec<Edge> = ordered
            .into_iter()
            .map(|n| Edge {
                cursor: Self::cursor(direction, n),
                node: n.clone(),
            })
            .collect();
        let position = |c: &Cursor| edges.iter().position(|e| &e.cursor == c);

        let mut lo = 0;
        let mut hi = edges.len();
        if let Some(after) = &args.after {
            lo = position(after).map_or(hi, |p| p + 1);
        }
        if let Some(before) = &args.before {
            hi = position(before).map_or(lo, |p| p.max(lo));
        }

        let (start, end) = match (args.first, args.last) {
            (Some(f), _) => (lo, (lo + f).min(hi)),
            (None, Some(l)) => (hi.saturating_sub(l).max(lo), hi),
            (None, None) => (lo, (lo + self.page_cap).min(hi)),
        };

        let window = edges[start..end].to_vec();
        Connection {
            nodes: window.iter().map(|e| e.node.clone()).collect(),
            total_count: hi - lo,
            page_info: PageInfo {
                start_cursor: window.first().map(|e| e.cursor.clone()),
                end_cursor: window.last().map(|e| e.cursor.clone()),
                has_next_page: end < edges.len(),
                has_previous_page: start > 0,
            },
            edges: window,
        }
    }

    /// Full `{ data: { <query>: ... } }` envelope
    pub fn response(&self, direction: OrderDirection, args: &WindowArgs) -> Value {
        if args.is_conflicting() {
            return Self::conflict_response(&self.query);
        }
        let conn = serde_json::to_value(self.resolve(direction, args)).unwrap_or_default();
        json!({ "data": { self.query.as_str(): conn } })
    }

    pub fn conflict_response(query: &str) -> Value {
        json!({
            "data": { query: null },
            "errors": [{
                "message": "Mixing 'before' with 'after' or 'first' with 'last' is not supported.",
                "extensions": { "code": "GRAPHQL_ERROR" }
            }]
        })
    }
}
