//! Verification operations as called by scenarios

use chrono::{DateTime, FixedOffset};
use rand::Rng;
use relaycheck_common::{Connection, DescriptorTable, Error, GraphqlResponse, Result};
use tracing::{debug, info};

use crate::boundary::Boundary;
use crate::config::VerifyConfig;
use crate::context::PaginationContext;
use crate::count::{check_counts, reconcile, Expectation};
use crate::filters;
use crate::locator::{CursorLocator, ValuePick};
use crate::page_info::{validate_boundary_movement, validate_page_info};
use crate::reversal::validate_reverse_order;
use crate::slice::{validate_boundary_cursors, validate_slice};

/// Entry point tying the locator and validators to raw responses
#[derive(Debug, Clone)]
pub struct PaginationVerifier {
    config: VerifyConfig,
    descriptors: DescriptorTable,
    locator: CursorLocator,
}

impl PaginationVerifier {
    pub fn new(config: VerifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            locator: CursorLocator::new(&config),
            config,
            descriptors: DescriptorTable::builtin(),
        })
    }

    pub fn with_descriptors(mut self, descriptors: DescriptorTable) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    pub fn descriptors_mut(&mut self) -> &mut DescriptorTable {
        &mut self.descriptors
    }

    /// Decode and shape-check the connection answered for `query`
    pub fn connection(&self, response: &GraphqlResponse, query: &str) -> Result<Connection> {
        let conn = response.connection(query)?;
        conn.validate_shape(query)?;
        Ok(conn)
    }

    /// Pick a reference cursor from a baseline response
    pub fn locate_cursor<R: Rng>(
        &self,
        baseline: &GraphqlResponse,
        query: &str,
        later_half: bool,
        rng: &mut R,
    ) -> Result<PaginationContext> {
        let conn = self.connection(baseline, query)?;
        self.locator.locate(query, conn, later_half, rng)
    }

    /// Pick a date value from a baseline, strictly after `after` when given
    pub fn locate_value<R: Rng>(
        &self,
        baseline: &Connection,
        query: &str,
        after: Option<&DateTime<FixedOffset>>,
        later_half: bool,
        rng: &mut R,
    ) -> Result<ValuePick> {
        let descriptor = self.descriptors.get(query)?;
        let date_path = descriptor.date_path.as_ref().ok_or_else(|| {
            Error::InvalidScenario(format!("{} has no date field for range filters", query))
        })?;
        self.locator
            .locate_value(baseline, date_path, after, later_half, rng)
    }

    /// Check a windowed response against the context's baseline
    pub fn reconcile_and_validate(
        &self,
        ctx: &PaginationContext,
        windowed: &GraphqlResponse,
        boundary: Boundary,
        limit: Option<usize>,
    ) -> Result<Expectation> {
        let query = ctx.query();
        let actual = self.connection(windowed, query)?;
        let expectation = reconcile(ctx, boundary, limit, self.config.page_cap)?;

        check_counts(&expectation, &actual, query)?;
        validate_slice(ctx.baseline(), &actual, &expectation.range, query)?;
        validate_boundary_cursors(ctx.baseline(), &actual, &expectation, query)?;
        validate_boundary_movement(ctx.baseline(), &actual, &expectation, query)?;

        info!(
            "{}: {} window {:?} verified ({} of totalCount {})",
            query,
            boundary,
            expectation.range,
            actual.len(),
            actual.total_count
        );
        Ok(expectation)
    }

    pub fn validate_page_info(
        &self,
        response: &GraphqlResponse,
        query: &str,
        expect_next: Option<bool>,
        expect_previous: Option<bool>,
    ) -> Result<()> {
        let conn = response.connection(query)?;
        validate_page_info(&conn, query, expect_next, expect_previous)
    }

    pub fn validate_reverse_order(
        &self,
        query: &str,
        asc: &GraphqlResponse,
        desc: &GraphqlResponse,
    ) -> Result<()> {
        let asc = self.connection(asc, query)?;
        let desc = self.connection(desc, query)?;
        validate_reverse_order(query, &asc, &desc)
    }

    pub fn validate_search(
        &self,
        response: &GraphqlResponse,
        query: &str,
        needle: &str,
        allow_empty: bool,
    ) -> Result<()> {
        let conn = self.connection(response, query)?;
        filters::validate_search(&conn, self.descriptors.get(query)?, needle, allow_empty)
    }

    pub fn validate_ids(
        &self,
        response: &GraphqlResponse,
        query: &str,
        ids: &[String],
    ) -> Result<()> {
        let conn = self.connection(response, query)?;
        filters::validate_ids(&conn, self.descriptors.get(query)?, ids)
    }

    pub fn validate_date_range(
        &self,
        response: &GraphqlResponse,
        baseline: &Connection,
        query: &str,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> Result<()> {
        let conn = self.connection(response, query)?;
        filters::validate_date_range(&conn, baseline, self.descriptors.get(query)?, start, end)
    }

    pub fn validate_idempotent(
        &self,
        query: &str,
        first: &GraphqlResponse,
        second: &GraphqlResponse,
    ) -> Result<()> {
        let a = self.connection(first, query)?;
        let b = self.connection(second, query)?;
        debug!("{}: comparing repeated baseline of {} items", query, a.len());
        filters::validate_idempotent(query, &a, &b)
    }
}
