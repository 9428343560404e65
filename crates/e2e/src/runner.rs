//! Scenario runner driving the verification engine against a live API

use rand::rngs::StdRng;
use rand::SeedableRng;
use relaycheck_common::{Connection, Error, GraphqlResponse, OrderBy, OrderDirection, WindowArgs};
use relaycheck_verify::mutation::{
    assert_graphql_error, assert_mutation_errors, assert_no_mutation_errors,
};
use relaycheck_verify::{PaginationContext, PaginationVerifier, VerifyConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::client::{ClientConfig, GraphqlClient};
use crate::error::{E2eError, E2eResult};
use crate::spec::{ScenarioSpec, ScenarioStep};

/// Result of executing one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub skipped: bool,
    /// Seed of the scenario's reference selection; rerun with it to reproduce
    pub seed: u64,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Baseline response kept for the rest of a scenario
struct Baseline {
    response: GraphqlResponse,
    connection: Connection,
}

/// State threaded through the steps of one scenario
struct ScenarioState {
    baseline: Option<Baseline>,
    context: Option<PaginationContext>,
    rng: StdRng,
}

fn require<'a, T>(slot: &'a Option<T>, step: &ScenarioStep, missing: &str) -> E2eResult<&'a T> {
    slot.as_ref().ok_or_else(|| E2eError::StepFailed {
        step: step.name(),
        reason: format!("needs a {} step first", missing),
    })
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub client: ClientConfig,
    pub verify: VerifyConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Fixed seed for every scenario; random per scenario when unset
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            verify: VerifyConfig::default(),
            specs_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("test-results"),
            seed: None,
        }
    }
}

/// Main scenario runner
pub struct ScenarioRunner {
    client: GraphqlClient,
    verifier: PaginationVerifier,
    specs_dir: PathBuf,
    output_dir: PathBuf,
    seed: Option<u64>,
}

impl ScenarioRunner {
    /// Create a runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> E2eResult<Self> {
        Ok(Self {
            client: GraphqlClient::new(config.client)?,
            verifier: PaginationVerifier::new(config.verify)?,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
            seed: config.seed,
        })
    }

    /// Block until the API answers or `timeout` passes
    pub async fn wait_for_api(&self, timeout: Duration) -> E2eResult<()> {
        self.client.wait_until_ready(timeout).await
    }

    /// Run all scenarios in the specs directory
    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run scenarios matching a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<ScenarioSpec> = ScenarioSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a specific scenario by name
    pub async fn run_test(&self, name: &str) -> E2eResult<TestResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Scenario not found: {}", name)))?;

        self.run_spec(&spec).await
    }

    /// Run a list of scenarios
    pub async fn run_specs(&self, specs: &[ScenarioSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        info!("Running {} scenario(s) against {}", specs.len(), self.client.api_url());

        for spec in specs {
            let seed = self.scenario_seed();
            match self.run_seeded(spec, seed).await {
                Ok(result) => {
                    if result.skipped {
                        skipped += 1;
                        info!("- {} (skipped)", result.name);
                    } else if result.success {
                        passed += 1;
                        info!("✓ {} ({} ms)", result.name, result.duration_ms);
                    } else {
                        failed += 1;
                        error!(
                            "✗ {} (seed {}) - {}",
                            result.name,
                            result.seed,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    results.push(result);
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {} (seed {}) - {}", spec.name, seed, e);
                    results.push(TestResult {
                        name: spec.name.clone(),
                        success: false,
                        skipped: false,
                        seed,
                        duration_ms: 0,
                        steps: vec![],
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Scenario results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        Ok(TestSuiteResult {
            total: specs.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
        })
    }

    /// Run a single scenario
    pub async fn run_spec(&self, spec: &ScenarioSpec) -> E2eResult<TestResult> {
        self.run_seeded(spec, self.scenario_seed()).await
    }

    /// Configured seed, or a fresh one per scenario
    fn scenario_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    async fn run_seeded(&self, spec: &ScenarioSpec, seed: u64) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running scenario: {} (seed {})", spec.name, seed);

        if spec.skip {
            return Ok(TestResult {
                name: spec.name.clone(),
                success: true,
                skipped: true,
                seed,
                duration_ms: 0,
                steps: vec![],
                error: None,
            });
        }

        let verifier = self.scenario_verifier(spec)?;
        let mut state = ScenarioState {
            baseline: None,
            context: None,
            rng: StdRng::seed_from_u64(seed),
        };

        let mut step_results = Vec::new();
        let mut test_error: Option<String> = None;

        for step in &spec.steps {
            let result = self.execute_step(spec, &verifier, step, &mut state).await;

            if !result.success {
                test_error = result
                    .error
                    .as_ref()
                    .map(|e| format!("{}: {}", result.step_name, e));
                step_results.push(result);
                break; // Stop on first failure
            }

            step_results.push(result);
        }

        Ok(TestResult {
            name: spec.name.clone(),
            success: test_error.is_none(),
            skipped: false,
            seed,
            duration_ms: start.elapsed().as_millis() as u64,
            steps: step_results,
            error: test_error,
        })
    }

    /// Verifier honouring the scenario's page size and descriptor
    fn scenario_verifier(&self, spec: &ScenarioSpec) -> E2eResult<PaginationVerifier> {
        let mut verifier = match spec.page_size {
            Some(size) => PaginationVerifier::new(VerifyConfig::with_page_cap(size))?
                .with_descriptors(self.verifier.descriptors().clone()),
            None => self.verifier.clone(),
        };
        if let Some(descriptor) = &spec.descriptor {
            verifier.descriptors_mut().insert(descriptor.clone());
        }
        Ok(verifier)
    }

    async fn execute_step(
        &self,
        spec: &ScenarioSpec,
        verifier: &PaginationVerifier,
        step: &ScenarioStep,
        state: &mut ScenarioState,
    ) -> StepResult {
        let start = Instant::now();
        let step_name = step.name();

        debug!("Executing step: {}", step_name);

        let result = self.run_step(spec, verifier, step, state).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => StepResult {
                success: true,
                step_name,
                duration_ms,
                error: None,
            },
            Err(e) => StepResult {
                success: false,
                step_name,
                duration_ms,
                error: Some(e.to_string()),
            },
        }
    }

    async fn run_step(
        &self,
        spec: &ScenarioSpec,
        verifier: &PaginationVerifier,
        step: &ScenarioStep,
        state: &mut ScenarioState,
    ) -> E2eResult<()> {
        let query = spec.query.as_str();
        let asc = OrderDirection::Asc;

        match step {
            ScenarioStep::Baseline => {
                let response = self.fetch(spec, verifier, asc, &WindowArgs::default(), None).await?;
                let connection = verifier.connection(&response, query)?;
                info!(
                    "{}: baseline of {} (totalCount {})",
                    query,
                    connection.len(),
                    connection.total_count
                );
                state.context = None;
                state.baseline = Some(Baseline { response, connection });
            }
            ScenarioStep::LocateCursor { later_half } => {
                let baseline = require(&state.baseline, step, "baseline")?;
                let ctx = verifier.locate_cursor(
                    &baseline.response,
                    query,
                    *later_half,
                    &mut state.rng,
                )?;
                state.context = Some(ctx);
            }
            ScenarioStep::Window { boundary, limit, expect_next, expect_previous } => {
                let ctx = require(&state.context, step, "locate_cursor")?;
                boundary.checked_limit(*limit)?;

                let args = ctx.window_args(*boundary, *limit);
                let response = self.fetch(spec, verifier, asc, &args, None).await?;
                verifier.reconcile_and_validate(ctx, &response, *boundary, *limit)?;
                verifier.validate_page_info(&response, query, *expect_next, *expect_previous)?;
            }
            ScenarioStep::PageInfo { first, expect_next, expect_previous } => {
                let args = WindowArgs {
                    first: *first,
                    ..Default::default()
                };
                let response = self.fetch(spec, verifier, asc, &args, None).await?;
                verifier.validate_page_info(&response, query, *expect_next, *expect_previous)?;
            }
            ScenarioStep::ReverseOrder => {
                let baseline = require(&state.baseline, step, "baseline")?;
                let conn = &baseline.connection;
                if conn.total_count > conn.len() {
                    return Err(Error::InvalidScenario(format!(
                        "reverse_order needs all results on one page; totalCount {} exceeds page of {}",
                        conn.total_count,
                        conn.len()
                    ))
                    .into());
                }

                let window = WindowArgs::default();
                let asc_response = self.fetch(spec, verifier, asc, &window, None).await?;
                let desc_response = self
                    .fetch(spec, verifier, OrderDirection::Desc, &window, None)
                    .await?;
                verifier.validate_reverse_order(query, &asc_response, &desc_response)?;
            }
            ScenarioStep::Search { value, allow_empty } => {
                let filter = json!({ "search": value });
                let response = self
                    .fetch(spec, verifier, asc, &WindowArgs::default(), Some(filter))
                    .await?;
                verifier.validate_search(&response, query, value, *allow_empty)?;
            }
            ScenarioStep::Ids { count } => {
                let baseline = require(&state.baseline, step, "baseline")?;
                let descriptor = verifier.descriptors().get(query)?;
                let ids: Vec<String> = baseline
                    .connection
                    .nodes
                    .iter()
                    .take(*count)
                    .filter_map(|n| n.field_text(&descriptor.id_path))
                    .collect();
                if ids.len() < *count {
                    return Err(Error::InvalidScenario(format!(
                        "ids step wants {} ids, baseline offers {}",
                        count,
                        ids.len()
                    ))
                    .into());
                }

                let filter = json!({ "ids": ids });
                let response = self
                    .fetch(spec, verifier, asc, &WindowArgs::default(), Some(filter))
                    .await?;
                verifier.validate_ids(&response, query, &ids)?;
            }
            ScenarioStep::DateRange { filter_key, later_half } => {
                let baseline = require(&state.baseline, step, "baseline")?;
                let start =
                    verifier.locate_value(&baseline.connection, query, None, false, &mut state.rng)?;
                let end = verifier.locate_value(
                    &baseline.connection,
                    query,
                    Some(&start.value),
                    *later_half,
                    &mut state.rng,
                )?;
                debug!("{}: date range {} .. {}", query, start.raw, end.raw);

                let filter = json!({ filter_key.as_str(): { "gte": start.raw, "lte": end.raw } });
                let response = self
                    .fetch(spec, verifier, asc, &WindowArgs::default(), Some(filter))
                    .await?;
                verifier.validate_date_range(
                    &response,
                    &baseline.connection,
                    query,
                    &start.value,
                    &end.value,
                )?;
            }
            ScenarioStep::Idempotent => {
                let baseline = require(&state.baseline, step, "baseline")?;
                let again = self.fetch(spec, verifier, asc, &WindowArgs::default(), None).await?;
                verifier.validate_idempotent(query, &baseline.response, &again)?;
            }
            ScenarioStep::ConflictingWindow => {
                let args = WindowArgs {
                    first: Some(1),
                    last: Some(1),
                    ..Default::default()
                };
                let response = self.fetch(spec, verifier, asc, &args, None).await?;
                assert_graphql_error(&response, None, None)?;
            }
            ScenarioStep::Mutation { document, mutation, variables, expect_errors } => {
                let response = self
                    .client
                    .execute(document, Value::Object(variables.clone()))
                    .await?;
                if expect_errors.is_empty() {
                    assert_no_mutation_errors(&response, mutation)?;
                } else {
                    assert_mutation_errors(&response, mutation, expect_errors)?;
                }
            }
            ScenarioStep::Log { message } => {
                info!("[SCENARIO LOG] {}", message);
            }
        }

        Ok(())
    }

    /// Issue the scenario's document with order, window and filter variables
    async fn fetch(
        &self,
        spec: &ScenarioSpec,
        verifier: &PaginationVerifier,
        direction: OrderDirection,
        window: &WindowArgs,
        filter: Option<Value>,
    ) -> E2eResult<GraphqlResponse> {
        let order_field = match &spec.order_field {
            Some(field) => field.clone(),
            None => verifier.descriptors().get(&spec.query)?.default_order_field.clone(),
        };

        let mut window = window.clone();
        if window.first.is_none() && window.last.is_none() {
            window.first = spec.page_size;
        }

        let mut variables = spec.variables.clone();
        variables.extend(window.to_variables());
        variables.insert(
            spec.order_variable.clone(),
            serde_json::to_value(OrderBy::new(order_field, direction))?,
        );
        if let Some(filter) = filter {
            variables.insert(spec.filter_variable.clone(), filter);
        }

        self.client.execute(&spec.document, Value::Object(variables)).await
    }

    /// Write scenario results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("pagination-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
