//! Relay cursor-pagination verification engine
//!
//! Given a baseline connection (unwindowed, ascending) and a windowed
//! connection fetched with `before`/`after` and optional `first`/`last`,
//! decides whether the window is the correct contiguous slice of the baseline.
//!
//! ```text
//! baseline query ──► CursorLocator ──► PaginationContext { baseline, index }
//!                                            │
//! windowed query ──► reconcile (counts) ─────┤
//!                    validate_slice ─────────┤
//!                    page-info checks ───────┘
//!
//! asc query + desc query ──► validate_reverse_order
//! ```
//!
//! Every failed check is `Error::AssertionFailed`; the first failure ends
//! the check.

pub mod boundary;
pub mod config;
pub mod context;
pub mod count;
pub mod dates;
pub mod filters;
pub mod locator;
pub mod mutation;
pub mod page_info;
pub mod reversal;
pub mod slice;
pub mod verifier;

pub use boundary::Boundary;
pub use config::VerifyConfig;
pub use context::PaginationContext;
pub use count::Expectation;
pub use locator::{CursorLocator, ValuePick};
pub use mutation::ExpectedError;
pub use verifier::PaginationVerifier;
