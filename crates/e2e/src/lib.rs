//! Relaycheck scenario harness
//!
//! This crate drives the pagination verifier against a live GraphQL API:
//! - Parses declarative YAML scenario specs
//! - Issues GraphQL requests with window, order and filter variables
//! - Threads a seeded reference selection through each scenario
//! - Writes a JSON report of every step
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Scenario Runner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── wait_for_api() -> ()                                 │
//! │    ├── run_spec(spec: ScenarioSpec) -> TestResult           │
//! │    └── write_results(suite) -> PathBuf                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioSpec (YAML)                                        │
//! │    ├── name, query, document, page_size                     │
//! │    └── steps: [Step]                                        │
//! │          ├── baseline / locate_cursor { later_half }        │
//! │          ├── window { boundary, limit }                     │
//! │          ├── page_info / reverse_order / idempotent         │
//! │          ├── search / ids / date_range                      │
//! │          └── conflicting_window / mutation                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod runner;
pub mod spec;

pub use client::{ClientConfig, GraphqlClient};
pub use error::{E2eError, E2eResult};
pub use runner::{RunnerConfig, ScenarioRunner, TestSuiteResult};
pub use spec::{ScenarioSpec, ScenarioStep};
