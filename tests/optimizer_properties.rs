//! Property tests for the optimizer tiers.

use proptest::{prelude::*, sample::select};
use rusty_money::iso::CAD;

use smartcart::prelude::*;

const ITEMS: [&str; 4] = ["bread", "butter", "cheese", "ketchup"];
const STORES: [&str; 5] = ["freshco", "loblaws", "metro", "sobeys", "walmart"];
const PRODUCTS: [&str; 3] = ["Own Brand", "Premium", "Value"];

/// Arbitrary sparse catalogs: any item, at any store, with any product.
fn catalogs() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(
        (
            select(ITEMS.to_vec()),
            select(STORES.to_vec()),
            select(PRODUCTS.to_vec()),
            0..2_000_i64,
        ),
        0..30,
    )
    .prop_map(|offers| {
        offers
            .into_iter()
            .fold(Catalog::builder(CAD), |builder, (item, store, product, price)| {
                builder.offer(item, store, product, price)
            })
            .build()
    })
}

/// Catalogs where every store stocks every item and each store is strictly
/// the cheapest for exactly one item, so every split size has full coverage.
fn fully_covered_catalogs() -> impl Strategy<Value = Catalog> {
    (3..6_usize)
        .prop_flat_map(|size| {
            (
                prop::collection::vec(prop::collection::vec(100..1_000_i64, size), size),
                prop::collection::vec(1..50_i64, size),
            )
        })
        .prop_map(|(rows, discounts)| {
            let mut builder = Catalog::builder(CAD);

            for (item_idx, (row, discount)) in rows.iter().zip(&discounts).enumerate() {
                let row_min = row.iter().copied().min().unwrap_or(100);

                for (store_idx, price) in row.iter().enumerate() {
                    let price = if store_idx == item_idx {
                        row_min - discount
                    } else {
                        *price
                    };

                    builder = builder.offer(
                        &format!("item-{item_idx}"),
                        &format!("store-{store_idx}"),
                        "Own Brand",
                        price,
                    );
                }
            }

            builder.build()
        })
}

fn assert_split_shape(basket: &SplitBasket, n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(basket.breakdown.len(), n);
    prop_assert_eq!(basket.breakdown.total(CAD), basket.total);

    let lines: usize = basket
        .breakdown
        .iter()
        .map(|(_, subtotal)| subtotal.items.len())
        .sum();

    prop_assert_eq!(lines, basket.items.len());

    for (_, subtotal) in basket.breakdown.iter() {
        prop_assert!(!subtotal.items.is_empty());
    }

    Ok(())
}

proptest! {
    /// The cheapest single store never costs more than the highest one.
    #[test]
    fn cheapest_single_never_exceeds_highest(catalog in catalogs()) {
        let report = optimize(&catalog);

        if let (Some(cheapest), Some(highest)) =
            (&report.cheapest_single_store, &report.highest_single_store)
        {
            prop_assert!(cheapest.total.to_minor_units() <= highest.total.to_minor_units());
        }

        prop_assert_eq!(
            report.cheapest_single_store.is_some(),
            report.highest_single_store.is_some()
        );
    }

    /// A single-store basket covers exactly the catalog's items.
    #[test]
    fn single_store_covers_every_item(catalog in catalogs()) {
        let report = optimize(&catalog);
        let expected: Vec<&str> = catalog.items().map(|(item, _)| item).collect();

        for basket in [&report.cheapest_single_store, &report.highest_single_store]
            .into_iter()
            .flatten()
        {
            let covered: Vec<&str> = basket.items.keys().map(String::as_str).collect();

            prop_assert_eq!(&covered, &expected);
            prop_assert_eq!(basket.breakdown.len(), 1);
            prop_assert_eq!(basket.breakdown.total(CAD), basket.total);
        }
    }

    /// A split across n stores puts at least one item in each of exactly n stores.
    #[test]
    fn splits_use_exactly_n_stores(catalog in catalogs()) {
        let report = optimize(&catalog);

        if let Some(basket) = &report.cheapest_two_stores {
            assert_split_shape(basket, 2)?;
        }

        if let Some(basket) = &report.cheapest_three_stores {
            assert_split_shape(basket, 3)?;
        }
    }

    /// Running the optimizer twice gives the same report.
    #[test]
    fn optimize_is_idempotent(catalog in catalogs()) {
        prop_assert_eq!(optimize(&catalog), optimize(&catalog));
    }

    /// With full coverage at every split size, more stores never cost more.
    #[test]
    fn more_stores_never_cost_more_with_full_coverage(catalog in fully_covered_catalogs()) {
        let report = optimize(&catalog);

        let single = report.total(Tier::CheapestSingleStore).map(|m| m.to_minor_units());
        let two = report.total(Tier::CheapestTwoStores).map(|m| m.to_minor_units());
        let three = report.total(Tier::CheapestThreeStores).map(|m| m.to_minor_units());

        prop_assert!(single.is_some() && two.is_some() && three.is_some());
        prop_assert!(two <= single);
        prop_assert!(three <= two);
    }
}
