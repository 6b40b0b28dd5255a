//! Cart price optimizer
//!
//! Pure selectors over a [`Catalog`]: the cheapest and the most expensive
//! basket bought from a single store, and the cheapest basket split across
//! exactly `n` stores. [`optimize`] runs every tier and assembles the
//! [`OptimizationReport`].
//!
//! Ties are broken deterministically. Products are visited in product name
//! order and stores in store name order; the first candidate seen is kept
//! unless a later one is strictly better.

use tracing::debug;

use crate::{
    catalog::{Catalog, Offers, Product},
    report::OptimizationReport,
};

pub mod single_store;
pub mod split;

/// Which end of the price range a selector is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Lowest price wins.
    Cheapest,

    /// Highest price wins.
    Priciest,
}

impl Preference {
    /// Whether `candidate` should replace `incumbent`.
    pub fn prefers(self, candidate: i64, incumbent: i64) -> bool {
        match self {
            Self::Cheapest => candidate < incumbent,
            Self::Priciest => candidate > incumbent,
        }
    }
}

/// The preferred product among `offers`.
pub fn pick_product(offers: &Offers, preference: Preference) -> Option<(&str, &Product)> {
    offers
        .iter()
        .reduce(|best, candidate| {
            let candidate_price = candidate.1.price.to_minor_units();

            if preference.prefers(candidate_price, best.1.price.to_minor_units()) {
                candidate
            } else {
                best
            }
        })
        .map(|(name, product)| (name.as_str(), product))
}

/// Run every tier over the catalog.
///
/// Tiers that cannot be satisfied are reported as `None`; they never prevent
/// the other tiers from being computed.
#[tracing::instrument(skip_all, fields(items = catalog.len()))]
pub fn optimize(catalog: &Catalog) -> OptimizationReport {
    let report = OptimizationReport {
        cheapest_single_store: single_store::cheapest(catalog),
        cheapest_two_stores: split::cheapest(catalog, 2),
        cheapest_three_stores: split::cheapest(catalog, 3),
        highest_single_store: single_store::highest(catalog),
        currency: catalog.currency(),
    };

    debug!(
        single = report.cheapest_single_store.is_some(),
        two_stores = report.cheapest_two_stores.is_some(),
        three_stores = report.cheapest_three_stores.is_some(),
        highest = report.highest_single_store.is_some(),
        "optimised catalog"
    );

    report
}
