//! Search/filter criteria for the wallet list

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::RiskLevel;

/// Risk facet of the filter: everything, or exactly one level
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum RiskFilter {
    #[default]
    All,
    Only(RiskLevel),
}

impl RiskFilter {
    pub fn matches(&self, level: &RiskLevel) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::Only(wanted) => wanted == level,
        }
    }
}

impl fmt::Display for RiskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFilter::All => f.write_str("All"),
            RiskFilter::Only(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for RiskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(RiskFilter::All);
        }
        s.parse::<RiskLevel>().map(RiskFilter::Only)
    }
}

/// Transient criteria; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterCriteria {
    pub query: String,
    pub risk: RiskFilter,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, risk: RiskFilter) -> Self {
        Self {
            query: query.into(),
            risk,
        }
    }

    /// True when the criteria let every wallet through
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.risk == RiskFilter::All
    }
}
