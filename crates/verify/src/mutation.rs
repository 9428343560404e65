//! GraphQL error shape assertions
//!
//! Two shapes are in use: top-level `errors[]` with `extensions.code` for
//! rejected requests, and per-mutation `errors[] { field code message }`
//! payloads for validation failures.

use relaycheck_common::{verify, GraphqlResponse, Result};
use serde::{Deserialize, Serialize};

/// An error a mutation payload is expected to carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedError {
    #[serde(default)]
    pub field: Option<String>,
    pub code: String,
}

/// The request was rejected with a top-level error
pub fn assert_graphql_error(
    response: &GraphqlResponse,
    code: Option<&str>,
    message_contains: Option<&str>,
) -> Result<()> {
    verify!(
        response.has_errors(),
        "expected a GraphQL error, response had none"
    );

    let matched = response.errors.iter().any(|e| {
        code.map_or(true, |c| e.code() == Some(c))
            && message_contains.map_or(true, |m| e.message.contains(m))
    });
    verify!(
        matched,
        "no GraphQL error with code {:?} and message containing {:?}; got {:?}",
        code,
        message_contains,
        response
            .errors
            .iter()
            .map(|e| (e.code(), e.message.as_str()))
            .collect::<Vec<_>>()
    );
    Ok(())
}

/// `data.<mutation>.errors` holds exactly the expected `(field, code)` pairs
pub fn assert_mutation_errors(
    response: &GraphqlResponse,
    mutation: &str,
    expected: &[ExpectedError],
) -> Result<()> {
    let errors = response.mutation_errors(mutation)?;
    verify!(
        errors.len() == expected.len(),
        "{}: {} errors returned, expected {}: {:?}",
        mutation,
        errors.len(),
        expected.len(),
        errors
    );

    for want in expected {
        let found = errors
            .iter()
            .any(|e| e.field == want.field && e.code.as_deref() == Some(want.code.as_str()));
        verify!(
            found,
            "{}: missing error {} on field {:?}; got {:?}",
            mutation,
            want.code,
            want.field,
            errors
        );
    }
    Ok(())
}

/// The mutation succeeded without payload errors
pub fn assert_no_mutation_errors(response: &GraphqlResponse, mutation: &str) -> Result<()> {
    verify!(
        !response.has_errors(),
        "{}: request failed: {:?}",
        mutation,
        response.errors
    );
    let errors = response.mutation_errors(mutation)?;
    verify!(
        errors.is_empty(),
        "{}: unexpected errors {:?}",
        mutation,
        errors
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid_email() -> GraphqlResponse {
        GraphqlResponse::from_value(json!({
            "data": {"warehouseCreate": {
                "warehouse": null,
                "errors": [
                    {"field": "email", "code": "INVALID", "message": "Enter a valid email address."},
                    {"field": "name", "code": "REQUIRED", "message": "This field is required."}
                ]
            }}
        }))
        .unwrap()
    }

    #[test]
    fn test_mutation_errors_match() {
        let expected = vec![
            ExpectedError { field: Some("name".into()), code: "REQUIRED".into() },
            ExpectedError { field: Some("email".into()), code: "INVALID".into() },
        ];
        assert_mutation_errors(&invalid_email(), "warehouseCreate", &expected).unwrap();
    }

    #[test]
    fn test_mutation_errors_mismatch() {
        let expected = vec![
            ExpectedError { field: Some("email".into()), code: "UNIQUE".into() },
            ExpectedError { field: Some("name".into()), code: "REQUIRED".into() },
        ];
        let err = assert_mutation_errors(&invalid_email(), "warehouseCreate", &expected).unwrap_err();
        assert!(err.to_string().contains("missing error UNIQUE"));

        let err = assert_no_mutation_errors(&invalid_email(), "warehouseCreate").unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_no_mutation_errors() {
        let ok = GraphqlResponse::from_value(json!({
            "data": {"shippingPriceCreate": {"shippingMethod": {"id": "U2hpcHBpbmdNZXRob2Q6MQ=="}, "errors": []}}
        }))
        .unwrap();
        assert_no_mutation_errors(&ok, "shippingPriceCreate").unwrap();
    }

    #[test]
    fn test_graphql_error() {
        let resp = GraphqlResponse::from_value(json!({
            "data": {"products": null},
            "errors": [{"message": "You must provide a `first` or `last` value to properly paginate the `products` connection.",
                        "extensions": {"code": "GRAPHQL_ERROR"}}]
        }))
        .unwrap();

        assert_graphql_error(&resp, Some("GRAPHQL_ERROR"), Some("`first` or `last`")).unwrap();
        assert_graphql_error(&resp, None, None).unwrap();
        assert!(assert_graphql_error(&resp, Some("PERMISSION_DENIED"), None).is_err());
        assert!(assert_graphql_error(&GraphqlResponse::default(), None, None).is_err());
    }
}
