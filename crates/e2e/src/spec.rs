//! Declarative YAML pagination scenarios

use relaycheck_common::QueryDescriptor;
use relaycheck_verify::{Boundary, ExpectedError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Skip this scenario but report it
    #[serde(default)]
    pub skip: bool,

    /// Root field of the paginated query, e.g. `products`
    pub query: String,

    /// GraphQL document taking `$first $last $before $after` plus the
    /// order and filter variables
    pub document: String,

    /// Fixed variables sent with every request (channel, ...)
    #[serde(default)]
    pub variables: Map<String, Value>,

    /// Sort field; defaults to the query descriptor's
    #[serde(default)]
    pub order_field: Option<String>,

    /// Name of the sort variable in `document`
    #[serde(default = "default_order_variable")]
    pub order_variable: String,

    /// Name of the filter variable in `document`
    #[serde(default = "default_filter_variable")]
    pub filter_variable: String,

    /// Sent as `first` on requests carrying neither `first` nor `last`;
    /// also becomes the page cap for this scenario
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Descriptor for a query missing from the built-in table
    #[serde(default)]
    pub descriptor: Option<QueryDescriptor>,

    /// Steps to execute in order
    pub steps: Vec<ScenarioStep>,
}

fn default_order_variable() -> String {
    "sortBy".to_string()
}

fn default_filter_variable() -> String {
    "filter".to_string()
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Fetch the unwindowed ascending baseline
    Baseline,

    /// Pick a reference cursor from the baseline
    LocateCursor {
        #[serde(default)]
        later_half: bool,
    },

    /// Fetch a window around the reference cursor and verify it
    Window {
        boundary: Boundary,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        expect_next: Option<bool>,
        #[serde(default)]
        expect_previous: Option<bool>,
    },

    /// Fetch a plain page and check its pageInfo
    PageInfo {
        #[serde(default)]
        first: Option<usize>,
        #[serde(default)]
        expect_next: Option<bool>,
        #[serde(default)]
        expect_previous: Option<bool>,
    },

    /// Ascending and descending results must mirror each other
    ReverseOrder,

    /// Filter by search string
    Search {
        value: String,
        #[serde(default)]
        allow_empty: bool,
    },

    /// Filter by the first `count` baseline ids
    Ids {
        count: usize,
    },

    /// Filter by a date range picked from the baseline
    DateRange {
        filter_key: String,
        #[serde(default)]
        later_half: bool,
    },

    /// Re-fetch the baseline and compare
    Idempotent,

    /// `first` together with `last` must be rejected
    ConflictingWindow,

    /// Run a mutation and check its payload errors
    Mutation {
        document: String,
        mutation: String,
        #[serde(default)]
        variables: Map<String, Value>,
        #[serde(default)]
        expect_errors: Vec<ExpectedError>,
    },

    /// Log a message (for debugging)
    Log {
        message: String,
    },
}

impl ScenarioStep {
    /// Short label used in results
    pub fn name(&self) -> String {
        match self {
            ScenarioStep::Baseline => "baseline".to_string(),
            ScenarioStep::LocateCursor { later_half } => {
                format!("locate_cursor:{}", if *later_half { "later" } else { "earlier" })
            }
            ScenarioStep::Window { boundary, limit, .. } => match limit {
                Some(n) => format!("window:{}={}", boundary, n),
                None => format!("window:{}", boundary),
            },
            ScenarioStep::PageInfo { .. } => "page_info".to_string(),
            ScenarioStep::ReverseOrder => "reverse_order".to_string(),
            ScenarioStep::Search { value, .. } => format!("search:{}", value),
            ScenarioStep::Ids { count } => format!("ids:{}", count),
            ScenarioStep::DateRange { filter_key, .. } => format!("date_range:{}", filter_key),
            ScenarioStep::Idempotent => "idempotent".to_string(),
            ScenarioStep::ConflictingWindow => "conflicting_window".to_string(),
            ScenarioStep::Mutation { mutation, .. } => format!("mutation:{}", mutation),
            ScenarioStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl ScenarioSpec {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all scenarios from a directory
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            specs.push(Self::from_file(entry.path())?);
        }

        Ok(specs)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS: &str = r#"
name: products-after-first
description: Forward pagination after a cursor from the later half
tags:
  - products
  - smoke
query: products
page_size: 25
variables:
  channel: default-channel
document: |
  query Products($first: Int, $after: String) {
    products(first: $first, after: $after) { totalCount }
  }
steps:
  - action: baseline
  - action: locate_cursor
    later_half: true
  - action: window
    boundary: after+first
    limit: 3
    expect_previous: true
  - action: reverse_order
  - action: mutation
    mutation: productCreate
    document: "mutation { productCreate(input: {}) { errors { field code } } }"
    expect_errors:
      - field: name
        code: REQUIRED
"#;

    #[test]
    fn test_parse_scenario() {
        let spec = ScenarioSpec::from_yaml(PRODUCTS).unwrap();
        assert_eq!(spec.name, "products-after-first");
        assert_eq!(spec.query, "products");
        assert_eq!(spec.order_variable, "sortBy");
        assert_eq!(spec.filter_variable, "filter");
        assert_eq!(spec.page_size, Some(25));
        assert_eq!(spec.variables.get("channel"), Some(&Value::from("default-channel")));
        assert_eq!(spec.steps.len(), 5);

        match &spec.steps[2] {
            ScenarioStep::Window { boundary, limit, expect_next, expect_previous } => {
                assert_eq!(*boundary, Boundary::AfterFirst);
                assert_eq!(*limit, Some(3));
                assert!(expect_next.is_none());
                assert_eq!(*expect_previous, Some(true));
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(spec.steps[2].name(), "window:after+first=3");

        match &spec.steps[4] {
            ScenarioStep::Mutation { expect_errors, .. } => {
                assert_eq!(expect_errors[0].code, "REQUIRED");
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_boundary_rejected() {
        let yaml = PRODUCTS.replace("after+first", "around");
        assert!(ScenarioSpec::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_filter_by_tag() {
        let spec = ScenarioSpec::from_yaml(PRODUCTS).unwrap();
        let mut other = spec.clone();
        other.tags = vec!["warehouses".to_string()];
        let specs = vec![spec, other];

        assert_eq!(ScenarioSpec::filter_by_tag(&specs, "smoke").len(), 1);
        assert_eq!(ScenarioSpec::filter_by_tag(&specs, "warehouses").len(), 1);
        assert!(ScenarioSpec::filter_by_tag(&specs, "orders").is_empty());
    }
}
