//! View filter - derived search/risk view over the wallet list

use crate::domain::{FilterCriteria, RiskFilter, Wallet};

/// Wallets matching `criteria`, in their original relative order
///
/// A wallet matches when the query is empty or is a case-insensitive
/// substring of its label or address, and its risk level passes the risk
/// facet.
pub fn filter_wallets<'a>(wallets: &'a [Wallet], criteria: &FilterCriteria) -> Vec<&'a Wallet> {
    let query = criteria.query.to_lowercase();
    wallets
        .iter()
        .filter(|w| {
            query.is_empty()
                || w.label.to_lowercase().contains(&query)
                || w.address.to_lowercase().contains(&query)
        })
        .filter(|w| criteria.risk.matches(&w.risk_level))
        .collect()
}

/// Holds the transient criteria; the filtered view is recomputed on every
/// `apply` and never stored
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    criteria: FilterCriteria,
}

impl ViewFilter {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
    }

    pub fn set_risk(&mut self, risk: RiskFilter) {
        self.criteria.risk = risk;
    }

    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    pub fn apply<'a>(&self, wallets: &'a [Wallet]) -> FilteredView<'a> {
        FilteredView {
            wallets: filter_wallets(wallets, &self.criteria),
        }
    }
}

/// Result of applying the filter; empty means "no results"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    pub wallets: Vec<&'a Wallet>,
}

impl<'a> FilteredView<'a> {
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Wallet> + '_ {
        self.wallets.iter().copied()
    }
}
