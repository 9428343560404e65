//! Per-query node shape descriptors
//!
//! Paginated queries differ in where a node keeps its display name (`name`,
//! `email`, `companyName`, `order.id`, ...) and which sort field is the
//! default. Validators take a [`QueryDescriptor`] instead of branching on
//! query names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::path::FieldPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Root field of the query, e.g. `products`
    pub query_name: String,

    /// Path of the node identity
    #[serde(default = "default_id_path")]
    pub id_path: FieldPath,

    /// Path searched by `searchString` / `filter.search`
    pub name_path: FieldPath,

    /// Sort field used when a scenario names none
    pub default_order_field: String,

    /// Date field used by date-range filters
    #[serde(default)]
    pub date_path: Option<FieldPath>,
}

fn default_id_path() -> FieldPath {
    FieldPath::parse("id")
}

impl QueryDescriptor {
    pub fn new(query_name: &str, name_path: &str, default_order_field: &str) -> Self {
        Self {
            query_name: query_name.to_string(),
            id_path: default_id_path(),
            name_path: FieldPath::parse(name_path),
            default_order_field: default_order_field.to_string(),
            date_path: None,
        }
    }

    pub fn with_date_path(mut self, path: &str) -> Self {
        self.date_path = Some(FieldPath::parse(path));
        self
    }
}

/// Lookup table of descriptors keyed by query name
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: BTreeMap<String, QueryDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors for the storefront and dashboard queries
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for descriptor in [
            QueryDescriptor::new("products", "name", "NAME").with_date_path("created"),
            QueryDescriptor::new("categories", "name", "NAME"),
            QueryDescriptor::new("collections", "name", "NAME"),
            QueryDescriptor::new("productTypes", "name", "NAME"),
            QueryDescriptor::new("attributes", "name", "NAME"),
            QueryDescriptor::new("warehouses", "companyName", "NAME"),
            QueryDescriptor::new("shippingZones", "name", "NAME"),
            QueryDescriptor::new("customers", "email", "EMAIL").with_date_path("dateJoined"),
            QueryDescriptor::new("orders", "number", "NUMBER").with_date_path("created"),
            QueryDescriptor::new("payments", "order.id", "CREATED_AT").with_date_path("created"),
            QueryDescriptor::new("giftCards", "last4CodeChars", "CURRENT_BALANCE"),
        ] {
            table.insert(descriptor);
        }
        table
    }

    /// Add or replace a descriptor
    pub fn insert(&mut self, descriptor: QueryDescriptor) {
        self.entries.insert(descriptor.query_name.clone(), descriptor);
    }

    pub fn get(&self, query: &str) -> Result<&QueryDescriptor> {
        self.entries
            .get(query)
            .ok_or_else(|| Error::UnknownQuery(query.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
