//! Cursor boundary kinds of a windowed query

use relaycheck_common::{Cursor, Error, Result, WindowArgs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the reference cursor a window lies on, optionally narrowed
/// with `first`/`last`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    #[serde(rename = "before")]
    Before,
    #[serde(rename = "before+first")]
    BeforeFirst,
    #[serde(rename = "before+last")]
    BeforeLast,
    #[serde(rename = "after")]
    After,
    #[serde(rename = "after+first")]
    AfterFirst,
    #[serde(rename = "after+last")]
    AfterLast,
}

impl Boundary {
    pub const ALL: [Boundary; 6] = [
        Boundary::Before,
        Boundary::BeforeFirst,
        Boundary::BeforeLast,
        Boundary::After,
        Boundary::AfterFirst,
        Boundary::AfterLast,
    ];

    pub fn is_before(self) -> bool {
        matches!(
            self,
            Boundary::Before | Boundary::BeforeFirst | Boundary::BeforeLast
        )
    }

    pub fn needs_limit(self) -> bool {
        !matches!(self, Boundary::Before | Boundary::After)
    }

    /// Validate the limit against the boundary kind; bare boundaries yield 0
    pub fn checked_limit(self, limit: Option<usize>) -> Result<usize> {
        match (self.needs_limit(), limit) {
            (true, Some(n)) if n > 0 => Ok(n),
            (true, _) => Err(Error::InvalidScenario(format!(
                "{} needs a positive limit",
                self
            ))),
            (false, Some(n)) => Err(Error::InvalidScenario(format!(
                "{} takes no limit, got {}",
                self, n
            ))),
            (false, None) => Ok(0),
        }
    }

    /// Query arguments selecting this window around `cursor`
    pub fn window_args(self, cursor: &Cursor, limit: Option<usize>) -> WindowArgs {
        let mut args = WindowArgs::default();
        if self.is_before() {
            args.before = Some(cursor.clone());
        } else {
            args.after = Some(cursor.clone());
        }
        match self {
            Boundary::BeforeFirst | Boundary::AfterFirst => args.first = limit,
            Boundary::BeforeLast | Boundary::AfterLast => args.last = limit,
            Boundary::Before | Boundary::After => {}
        }
        args
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Boundary::Before => "before",
            Boundary::BeforeFirst => "before+first",
            Boundary::BeforeLast => "before+last",
            Boundary::After => "after",
            Boundary::AfterFirst => "after+first",
            Boundary::AfterLast => "after+last",
        };
        f.write_str(s)
    }
}

impl FromStr for Boundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Boundary::ALL
            .into_iter()
            .find(|b| b.to_string() == s)
            .ok_or_else(|| Error::InvalidScenario(format!("unknown boundary: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        for b in Boundary::ALL {
            assert_eq!(b.to_string().parse::<Boundary>().unwrap(), b);
        }
        assert!("around".parse::<Boundary>().is_err());
    }

    #[test]
    fn test_limits() {
        assert_eq!(Boundary::Before.checked_limit(None).unwrap(), 0);
        assert_eq!(Boundary::AfterLast.checked_limit(Some(4)).unwrap(), 4);
        assert!(Boundary::After.checked_limit(Some(2)).is_err());
        assert!(Boundary::BeforeFirst.checked_limit(None).is_err());
        assert!(Boundary::BeforeFirst.checked_limit(Some(0)).is_err());
    }

    #[test]
    fn test_window_args() {
        let cursor = Cursor::from("Y3Vyc29y");
        let args = Boundary::BeforeLast.window_args(&cursor, Some(2));
        assert_eq!(args.before, Some(cursor.clone()));
        assert_eq!(args.last, Some(2));
        assert!(args.after.is_none() && args.first.is_none());

        let args = Boundary::After.window_args(&cursor, None);
        assert_eq!(args.after, Some(cursor));
        assert!(!args.is_conflicting());
    }
}
