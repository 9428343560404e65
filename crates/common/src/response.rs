//! GraphQL response envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::Connection;

/// `{ data, errors }` as returned by the GraphQL endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// Top-level GraphQL error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
    #[serde(default)]
    pub path: Vec<Value>,
}

impl GraphqlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entry of a mutation payload's `errors` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GraphqlResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The value under `data.<name>`
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.data
            .as_ref()
            .and_then(|d| d.get(name))
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::MissingQuery(name.to_string()))
    }

    /// Decode the connection answered for `query`
    pub fn connection(&self, query: &str) -> Result<Connection> {
        if self.has_errors() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(Error::GraphqlErrors(messages.join("; ")));
        }
        Connection::from_value(query, self.field(query)?)
    }

    /// `data.<mutation>.errors`
    pub fn mutation_errors(&self, mutation: &str) -> Result<Vec<MutationError>> {
        let payload = self.field(mutation)?;
        match payload.get("errors") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(errors) => Ok(serde_json::from_value(errors.clone())?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connection_from_envelope() {
        let resp = GraphqlResponse::from_value(json!({
            "data": {"warehouses": {
                "totalCount": 1,
                "edges": [{"cursor": "c1", "node": {"id": "V2FyZWhvdXNlOjE="}}],
                "pageInfo": {"startCursor": "c1", "endCursor": "c1",
                             "hasNextPage": false, "hasPreviousPage": false}
            }}
        }))
        .unwrap();

        let conn = resp.connection("warehouses").unwrap();
        assert_eq!(conn.total_count, 1);

        let err = resp.connection("products").unwrap_err();
        assert!(matches!(err, Error::MissingQuery(q) if q == "products"));
    }

    #[test]
    fn test_errors_short_circuit_connection() {
        let resp = GraphqlResponse::from_value(json!({
            "data": {"products": null},
            "errors": [{
                "message": "Argument 'first' cannot be combined with 'last'.",
                "extensions": {"exception": {"code": "GraphQLError"}, "code": "GRAPHQL_ERROR"}
            }]
        }))
        .unwrap();

        assert!(resp.has_errors());
        assert_eq!(resp.errors[0].code(), Some("GRAPHQL_ERROR"));
        assert!(resp.errors[0].extensions.as_ref().unwrap().extra.contains_key("exception"));
        assert!(matches!(resp.connection("products"), Err(Error::GraphqlErrors(_))));
    }

    #[test]
    fn test_mutation_errors() {
        let resp = GraphqlResponse::from_value(json!({
            "data": {"warehouseCreate": {
                "warehouse": null,
                "errors": [{"field": "email", "code": "INVALID", "message": "Enter a valid email address."}]
            }}
        }))
        .unwrap();

        let errors = resp.mutation_errors("warehouseCreate").unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_deref(), Some("email"));
        assert_eq!(errors[0].code.as_deref(), Some("INVALID"));

        let clean = GraphqlResponse::from_value(json!({
            "data": {"warehouseCreate": {"warehouse": {"id": "1"}, "errors": []}}
        }))
        .unwrap();
        assert!(clean.mutation_errors("warehouseCreate").unwrap().is_empty());
    }
}
