//! Single-store selection
//!
//! A store qualifies only if it offers every item in the catalog; partial
//! coverage from one store is never a single-store answer.

use tracing::{debug, trace};

use crate::{
    basket::{BasketLine, StoreBasket},
    catalog::Catalog,
    optimizer::{Preference, pick_product},
};

/// Cheapest basket bought entirely from one store.
///
/// Returns `None` when no store stocks every item, including for an empty
/// catalog.
pub fn cheapest(catalog: &Catalog) -> Option<StoreBasket> {
    select(catalog, Preference::Cheapest)
}

/// Most expensive basket bought entirely from one store: the priciest product
/// of every item at the priciest qualifying store.
///
/// Returns `None` when no store stocks every item.
pub fn highest(catalog: &Catalog) -> Option<StoreBasket> {
    select(catalog, Preference::Priciest)
}

/// Best qualifying store under `preference`.
pub fn select(catalog: &Catalog, preference: Preference) -> Option<StoreBasket> {
    let mut best: Option<(i64, &str, Vec<BasketLine>)> = None;

    for store in catalog.stores() {
        let Some((total, lines)) = basket_at(catalog, store, preference) else {
            trace!(store, "store does not stock every item");
            continue;
        };

        if best
            .as_ref()
            .is_none_or(|(best_total, _, _)| preference.prefers(total, *best_total))
        {
            best = Some((total, store, lines));
        }
    }

    let Some((total, store, lines)) = best else {
        debug!(?preference, "no store stocks every item");
        return None;
    };

    debug!(?preference, store, total, "selected single store");

    Some(StoreBasket::new(store, lines, catalog.currency()))
}

/// Preferred product for every item at `store` and their total in minor
/// units, or `None` if the store misses any item.
fn basket_at(
    catalog: &Catalog,
    store: &str,
    preference: Preference,
) -> Option<(i64, Vec<BasketLine>)> {
    let mut total = 0_i64;
    let mut lines = Vec::with_capacity(catalog.len());

    for (item, listing) in catalog.items() {
        let (product, offer) = listing
            .get(store)
            .and_then(|offers| pick_product(offers, preference))?;

        total = total.saturating_add(offer.price.to_minor_units());
        lines.push(BasketLine {
            name: item.to_string(),
            product: product.to_string(),
            price: offer.price,
        });
    }

    Some((total, lines))
}
