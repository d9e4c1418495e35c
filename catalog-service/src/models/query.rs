use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Query string exactly as received, before any validation.
pub type RawParams = HashMap<String, String>;

pub const MAX_LIMIT: u64 = 1000;

/// Validated per-request query criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    pub offset: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub authors: Vec<String>,
    pub published_after: Option<i32>,
    pub published_before: Option<i32>,
}

impl QueryParameters {
    pub fn page(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            search: None,
            authors: Vec::new(),
            published_after: None,
            published_before: None,
        }
    }
}

/// How malformed optional filters (`published-after`, `published-before`)
/// are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Malformed values are dropped and the filter is not applied.
    #[default]
    Lenient,
    /// Malformed values are reported as violations.
    Strict,
}

impl FromStr for FilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown filter policy '{}'", other)),
        }
    }
}

/// Every rule a request broke, in the order the rules are checked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {}", .violations.join(", "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}
