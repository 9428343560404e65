//! Reference cursor selection
//!
//! Picks a random position from one half of the (page-capped) baseline so
//! that windows before and after it are both non-trivial.

use chrono::{DateTime, FixedOffset};
use rand::Rng;
use relaycheck_common::{Connection, Error, FieldPath, Result};
use tracing::debug;

use crate::config::VerifyConfig;
use crate::context::PaginationContext;
use crate::dates::node_date;
use relaycheck_common::verify;

/// Index in `[0, floor((n-1)/2)]` or `[ceil((n-1)/2), n-1]`
pub fn pick_index<R: Rng>(n: usize, later_half: bool, rng: &mut R) -> Result<usize> {
    verify!(n >= 2, "pagination needs at least 2 items, found {}", n);

    if n == 2 {
        return Ok(usize::from(later_half));
    }

    let last = n - 1;
    let (lo, hi) = if later_half {
        ((last + 1) / 2, last)
    } else {
        (0, last / 2)
    };
    Ok(rng.gen_range(lo..=hi))
}

/// A date value picked from the baseline for date-range filters
#[derive(Debug, Clone, PartialEq)]
pub struct ValuePick {
    /// Parsed value
    pub value: DateTime<FixedOffset>,
    /// Value as the API rendered it
    pub raw: String,
    /// Position among the sorted candidates
    pub index: usize,
    /// Distinct candidate values, ascending
    pub candidates: Vec<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone)]
pub struct CursorLocator {
    page_cap: usize,
}

impl CursorLocator {
    pub fn new(config: &VerifyConfig) -> Self {
        Self {
            page_cap: config.page_cap,
        }
    }

    /// Pick the reference cursor and capture the baseline for later checks
    pub fn locate<R: Rng>(
        &self,
        query: &str,
        baseline: Connection,
        later_half: bool,
        rng: &mut R,
    ) -> Result<PaginationContext> {
        baseline.validate_shape(query)?;

        let n = baseline.total_count.min(self.page_cap);
        if baseline.len() < n {
            return Err(Error::InvalidConfig(format!(
                "{}: baseline holds {} edges but min(totalCount {}, page cap {}) is {}",
                query,
                baseline.len(),
                baseline.total_count,
                self.page_cap,
                n
            )));
        }

        let index = pick_index(n, later_half, rng)?;
        debug!(
            "{}: reference index {} of {} (totalCount {}, later_half={})",
            query, index, n, baseline.total_count, later_half
        );

        Ok(PaginationContext::new(query, baseline, index))
    }

    /// Pick a date value from the baseline nodes.
    ///
    /// With `after` set, only values strictly greater than it are candidates,
    /// matching the API's exclusive comparison for "after" filters.
    pub fn locate_value<R: Rng>(
        &self,
        baseline: &Connection,
        date_path: &FieldPath,
        after: Option<&DateTime<FixedOffset>>,
        later_half: bool,
        rng: &mut R,
    ) -> Result<ValuePick> {
        let mut values = baseline
            .nodes
            .iter()
            .map(|node| node_date(node, date_path))
            .collect::<Result<Vec<_>>>()?;

        if let Some(reference) = after {
            values.retain(|(value, _)| value > reference);
        }
        values.sort_by(|a, b| a.0.cmp(&b.0));
        values.dedup_by(|a, b| a.0 == b.0);

        let n = values.len().min(self.page_cap);
        let index = pick_index(n, later_half, rng)?;
        let (value, raw) = values[index].clone();

        debug!("{}: picked {} (index {} of {})", date_path, raw, index, n);

        Ok(ValuePick {
            value,
            raw,
            index,
            candidates: values.into_iter().map(|(v, _)| v).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use relaycheck_common::fixtures::RelayFixture;
    use relaycheck_common::{OrderDirection, WindowArgs};

    fn baseline(count: usize) -> Connection {
        RelayFixture::products(count).resolve(OrderDirection::Asc, &WindowArgs::default())
    }

    #[test]
    fn test_pick_index_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let early = pick_index(10, false, &mut rng).unwrap();
            let late = pick_index(10, true, &mut rng).unwrap();
            assert!(early <= 4, "early pick {}", early);
            assert!((5..=9).contains(&late), "late pick {}", late);
        }
    }

    #[test]
    fn test_pick_index_odd_overlaps_middle() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(pick_index(5, false, &mut rng).unwrap() <= 2);
            assert!(pick_index(5, true, &mut rng).unwrap() >= 2);
        }
    }

    #[test]
    fn test_pick_index_two_items() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_index(2, false, &mut rng).unwrap(), 0);
        assert_eq!(pick_index(2, true, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_pick_index_needs_two() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = pick_index(1, true, &mut rng).unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_locate_is_reproducible_with_seed() {
        let locator = CursorLocator::new(&VerifyConfig::default());
        let a = locator
            .locate("products", baseline(12), true, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = locator
            .locate("products", baseline(12), true, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(a.index(), b.index());
        assert_eq!(a.cursor(), b.cursor());
        assert_eq!(a.total_count(), 12);
        assert_eq!(a.cursor(), &a.baseline().edges[a.index()].cursor);
    }

    #[test]
    fn test_locate_uses_capped_count() {
        let locator = CursorLocator::new(&VerifyConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let ctx = locator.locate("products", baseline(40), true, &mut rng).unwrap();
            assert!(ctx.index() < 25);
            assert!(ctx.index() >= 12);
            assert_eq!(ctx.total_count(), 40);
        }
    }

    #[test]
    fn test_locate_rejects_short_baseline() {
        let locator = CursorLocator::new(&VerifyConfig::with_page_cap(50));
        let err = locator
            .locate("products", baseline(40), false, &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_locate_value_strictly_after() {
        let locator = CursorLocator::new(&VerifyConfig::default());
        let base = baseline(10);
        let path = FieldPath::parse("created");
        let reference = parse_date("2024-01-02T09:30:00+00:00").unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let pick = locator
                .locate_value(&base, &path, Some(&reference), false, &mut rng)
                .unwrap();
            // five distinct dates, three of them after Jan 2nd
            assert_eq!(pick.candidates.len(), 3);
            assert!(pick.value > reference);
            assert!(pick.index <= 1);
        }
    }

    #[test]
    fn test_locate_value_dedups_dates() {
        let locator = CursorLocator::new(&VerifyConfig::default());
        let pick = locator
            .locate_value(
                &baseline(10),
                &FieldPath::parse("created"),
                None,
                true,
                &mut StdRng::seed_from_u64(5),
            )
            .unwrap();

        assert_eq!(pick.candidates.len(), 5);
        assert!(pick.candidates.windows(2).all(|w| w[0] < w[1]));
        assert!(pick.index >= 2);
    }
}
