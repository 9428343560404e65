//! Relay connection model
//!
//! Every paginated query of the API under test answers with the same shape:
//!
//! ```text
//! <queryName> {
//!   totalCount
//!   edges { cursor node { id ... } }
//!   nodes { id ... }
//!   pageInfo { startCursor endCursor hasNextPage hasPreviousPage }
//! }
//! ```
//!
//! Nodes are kept as opaque JSON; only their identity and a handful of
//! descriptor-selected fields matter to the verification engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};
use crate::path::FieldPath;
use crate::verify;

/// One domain entity (product, warehouse, order, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(pub Value);

impl Node {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The node's `id`, if it carries a string one
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn field(&self, path: &FieldPath) -> Option<&Value> {
        path.lookup(&self.0)
    }

    pub fn field_text(&self, path: &FieldPath) -> Option<String> {
        path.lookup_text(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Short label for assertion messages
    pub fn label(&self) -> String {
        self.id().map(str::to_string).unwrap_or_else(|| self.0.to_string())
    }
}

/// Opaque pagination cursor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node paired with its cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub cursor: Cursor,
    pub node: Node,
}

/// Page boundaries of a connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub start_cursor: Option<Cursor>,
    #[serde(default)]
    pub end_cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

/// A Relay connection as returned by one query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub edges: Vec<Edge>,
    pub nodes: Vec<Node>,
    pub total_count: usize,
    pub page_info: PageInfo,
}

/// Wire form; `nodes` and `totalCount` are optional in the selection set
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnection {
    edges: Option<Vec<Edge>>,
    #[serde(default)]
    nodes: Option<Vec<Node>>,
    #[serde(default)]
    total_count: Option<usize>,
    #[serde(default)]
    page_info: Option<PageInfo>,
}

impl Connection {
    /// Decode the connection found at `data.<query>`
    pub fn from_value(query: &str, value: &Value) -> Result<Self> {
        let raw: RawConnection =
            serde_json::from_value(value.clone()).map_err(|e| Error::MalformedConnection {
                query: query.to_string(),
                reason: e.to_string(),
            })?;

        let malformed = |reason: &str| Error::MalformedConnection {
            query: query.to_string(),
            reason: reason.to_string(),
        };

        let edges = raw.edges.ok_or_else(|| malformed("edges not selected"))?;
        let total_count = raw
            .total_count
            .ok_or_else(|| malformed("totalCount not selected"))?;
        let nodes = raw
            .nodes
            .unwrap_or_else(|| edges.iter().map(|e| e.node.clone()).collect());

        Ok(Self {
            edges,
            nodes,
            total_count,
            page_info: raw.page_info.unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Node sitting under the given cursor
    pub fn node_at_cursor(&self, cursor: &Cursor) -> Option<&Node> {
        self.edges
            .iter()
            .find(|e| &e.cursor == cursor)
            .map(|e| &e.node)
    }

    pub fn ids(&self) -> Vec<String> {
        self.nodes.iter().map(Node::label).collect()
    }

    /// Check the structural invariants every connection must satisfy
    pub fn validate_shape(&self, query: &str) -> Result<()> {
        verify!(
            self.nodes.len() == self.edges.len(),
            "{}: nodes.length {} != edges.length {}",
            query,
            self.nodes.len(),
            self.edges.len()
        );

        for (i, (node, edge)) in self.nodes.iter().zip(&self.edges).enumerate() {
            verify!(
                node == &edge.node,
                "{}: nodes[{}] ({}) is not edges[{}].node ({})",
                query,
                i,
                node.label(),
                i,
                edge.node.label()
            );
        }

        verify!(
            self.total_count >= self.nodes.len(),
            "{}: totalCount {} smaller than page of {}",
            query,
            self.total_count,
            self.nodes.len()
        );

        if let (Some(first), Some(last)) = (self.edges.first(), self.edges.last()) {
            verify!(
                self.page_info.start_cursor.as_ref() == Some(&first.cursor),
                "{}: pageInfo.startCursor {:?} != edges[0].cursor {}",
                query,
                self.page_info.start_cursor,
                first.cursor
            );
            verify!(
                self.page_info.end_cursor.as_ref() == Some(&last.cursor),
                "{}: pageInfo.endCursor {:?} != edges[{}].cursor {}",
                query,
                self.page_info.end_cursor,
                self.edges.len() - 1,
                last.cursor
            );
        }

        Ok(())
    }
}

/// Sort direction of a paginated query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn reversed(self) -> Self {
        match self {
            OrderDirection::Asc => OrderDirection::Desc,
            OrderDirection::Desc => OrderDirection::Asc,
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// `orderBy` / `sortBy` argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Cursor window arguments of a paginated query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Cursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Cursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
}

impl WindowArgs {
    pub fn first(n: usize) -> Self {
        Self {
            first: Some(n),
            ..Default::default()
        }
    }

    /// `before`+`after` or `first`+`last`; the server must reject these
    pub fn is_conflicting(&self) -> bool {
        (self.before.is_some() && self.after.is_some())
            || (self.first.is_some() && self.last.is_some())
    }

    /// Render as GraphQL variables
    pub fn to_variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        if let Some(c) = &self.before {
            vars.insert("before".into(), Value::String(c.0.clone()));
        }
        if let Some(c) = &self.after {
            vars.insert("after".into(), Value::String(c.0.clone()));
        }
        if let Some(n) = self.first {
            vars.insert("first".into(), Value::from(n));
        }
        if let Some(n) = self.last {
            vars.insert("last".into(), Value::from(n));
        }
        vars
    }
}
