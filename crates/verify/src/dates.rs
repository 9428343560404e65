//! Date parsing with the API's comparison semantics

use chrono::{DateTime, FixedOffset, NaiveDate};
use relaycheck_common::{Error, FieldPath, Node, Result};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidDate(raw.to_string()))?;
    Ok(midnight.and_utc().fixed_offset())
}

/// Date stored at `path` on a node, with its raw text
pub fn node_date(node: &Node, path: &FieldPath) -> Result<(DateTime<FixedOffset>, String)> {
    let raw = node.field_text(path).ok_or_else(|| Error::FieldNotFound {
        path: path.to_string(),
        node: node.label(),
    })?;
    Ok((parse_date(&raw)?, raw))
}
