//! Engine configuration

use relaycheck_common::{Error, Result, DEFAULT_PAGE_CAP};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Page size the API applies when neither `first` nor `last` is given
    #[serde(default = "default_page_cap")]
    pub page_cap: usize,
}

fn default_page_cap() -> usize {
    DEFAULT_PAGE_CAP
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            page_cap: default_page_cap(),
        }
    }
}

impl VerifyConfig {
    pub fn with_page_cap(page_cap: usize) -> Self {
        Self { page_cap }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_cap < 2 {
            return Err(Error::InvalidConfig(format!(
                "page cap must be at least 2, got {}",
                self.page_cap
            )));
        }
        Ok(())
    }
}
