//! Split-store selection
//!
//! Exhaustive search over every combination of `n` stores. For each
//! combination every item goes to the store in the combination offering its
//! cheapest product; items none of the stores offer are left out. A
//! combination only counts if each of its `n` stores ends up with at least one
//! item, otherwise a split would collapse into a smaller one.
//!
//! The search visits `C(stores, n)` combinations. Store counts are capped when
//! the catalog is normalised, so this stays small for the split sizes used.
//! A pruned search (per-item minimum prices as a lower bound) would be the
//! next step should that cap ever need to be lifted.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    basket::{Assignment, SplitBasket},
    catalog::{Catalog, Product},
    optimizer::{Preference, pick_product},
};

/// Store combination; split sizes are small.
type Combination<'s> = SmallVec<[&'s str; 4]>;

/// Item -> (store, product, offer) chosen within a combination.
type Picks<'c> = BTreeMap<&'c str, (&'c str, &'c str, &'c Product)>;

/// Cheapest basket split across exactly `n` stores.
///
/// Returns `None` when `n` is zero, exceeds the number of stores, or no
/// combination puts at least one item in each of its stores.
pub fn cheapest(catalog: &Catalog, n: usize) -> Option<SplitBasket> {
    if n == 0 {
        return None;
    }

    let stores: Vec<&str> = catalog.stores().into_iter().collect();
    let mut best: Option<(i64, Picks<'_>)> = None;

    for combination in combinations(&stores, n) {
        let Some((total, assignments)) = assign(catalog, &combination) else {
            trace!(?combination, "combination leaves a store unused");
            continue;
        };

        if best
            .as_ref()
            .is_none_or(|(best_total, _)| Preference::Cheapest.prefers(total, *best_total))
        {
            best = Some((total, assignments));
        }
    }

    let Some((total, assignments)) = best else {
        debug!(n, stores = stores.len(), "no valid store split");
        return None;
    };

    debug!(n, total, "selected store split");

    let items = assignments
        .into_iter()
        .map(|(item, (store, product, offer))| {
            (
                item.to_string(),
                Assignment {
                    store: store.to_string(),
                    product: product.to_string(),
                    price: offer.price,
                },
            )
        })
        .collect();

    Some(SplitBasket::new(items, catalog.currency()))
}

/// Assign every item to its cheapest offer within `combination`.
///
/// Returns the total in minor units and `item -> (store, product, offer)`, or
/// `None` if nothing was assigned or a store of the combination got no item.
fn assign<'c>(
    catalog: &'c Catalog,
    combination: &[&'c str],
) -> Option<(i64, Picks<'c>)> {
    let mut total = 0_i64;
    let mut assignments = Picks::new();
    let mut used: Combination<'c> = SmallVec::new();

    for (item, listing) in catalog.items() {
        let cheapest = combination
            .iter()
            .filter_map(|store| {
                let offers = listing.get(*store)?;
                let (product, offer) = pick_product(offers, Preference::Cheapest)?;

                Some((*store, product, offer))
            })
            .reduce(|best, candidate| {
                let candidate_price = candidate.2.price.to_minor_units();

                if Preference::Cheapest.prefers(candidate_price, best.2.price.to_minor_units()) {
                    candidate
                } else {
                    best
                }
            });

        let Some((store, product, offer)) = cheapest else {
            continue;
        };

        total = total.saturating_add(offer.price.to_minor_units());
        assignments.insert(item, (store, product, offer));

        if !used.contains(&store) {
            used.push(store);
        }
    }

    (!assignments.is_empty() && used.len() == combination.len()).then_some((total, assignments))
}

/// Every `k`-element combination of `pool`, in lexicographic order of
/// positions.
pub fn combinations<'s>(pool: &[&'s str], k: usize) -> Vec<Combination<'s>> {
    let mut out = Vec::new();
    let mut current = Combination::new();

    extend(pool, k, &mut current, &mut out);

    out
}

fn extend<'s>(
    pool: &[&'s str],
    k: usize,
    current: &mut Combination<'s>,
    out: &mut Vec<Combination<'s>>,
) {
    let remaining = k.saturating_sub(current.len());

    if remaining == 0 {
        out.push(current.clone());
        return;
    }

    if pool.len() < remaining {
        return;
    }

    for (position, &head) in pool.iter().enumerate() {
        current.push(head);
        extend(
            pool.get(position + 1..).unwrap_or_default(),
            k,
            current,
            out,
        );
        current.pop();
    }
}
