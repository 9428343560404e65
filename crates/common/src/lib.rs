//! relaycheck common library
//!
//! Connection model, GraphQL response envelope and per-query descriptors
//! shared by the verification engine and the API harness.

pub mod descriptor;
pub mod error;
#[cfg(feature = "fixtures")]
pub mod fixtures;
pub mod model;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use descriptor::{DescriptorTable, QueryDescriptor};
pub use error::{Error, Result};
pub use model::{Connection, Cursor, Edge, Node, OrderBy, OrderDirection, PageInfo, WindowArgs};
pub use path::FieldPath;
pub use response::{GraphqlError, GraphqlResponse, MutationError};

/// relaycheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page size the API applies to queries without `first`/`last`
pub const DEFAULT_PAGE_CAP: usize = 25;
