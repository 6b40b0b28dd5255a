//! Smartcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Assignment, BasketLine, Breakdown, SplitBasket, StoreBasket, StoreSubtotal},
    catalog::{
        Catalog, CatalogBuilder, CatalogError, DEFAULT_MAX_STORES, DietaryFilter, Product,
        ProductAttributes,
    },
    optimizer::{Preference, optimize, single_store, split},
    prices::{DEFAULT_CURRENCY, PriceError, currency_from_code},
    report::{OptimizationReport, ReportError, Tier},
    shopping_list::{ShoppingList, ShoppingListError},
    sources::{CatalogFile, PriceSource, SourceError, parse_catalog_response},
};
