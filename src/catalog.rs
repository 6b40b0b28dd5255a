//! Catalog
//!
//! The price catalog maps item name -> store name -> product name -> product
//! record. [`RawCatalog`] is the shape produced by the pricing collaborator;
//! [`Catalog`] is the validated, normalised form the optimizer reads.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    prices::{PriceError, parse_price},
    shopping_list::ShoppingList,
};

pub mod attributes;

pub use attributes::{DietaryFilter, ProductAttributes};

/// Upper bound on distinct stores accepted from an untrusted catalog.
///
/// Split search is exhaustive over store combinations, so the store count is
/// capped rather than left to grow with whatever the collaborator returns.
pub const DEFAULT_MAX_STORES: usize = 16;

/// Errors raised while normalising a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product price failed validation.
    #[error("invalid price for {product:?} of {item:?} at {store:?}: {source}")]
    InvalidPrice {
        /// Item name
        item: String,
        /// Store name
        store: String,
        /// Product name
        product: String,
        /// Underlying price error
        source: PriceError,
    },

    /// The catalog names more stores than the configured limit.
    #[error("catalog lists {count} stores, more than the limit of {max}")]
    TooManyStores {
        /// Number of distinct stores found
        count: usize,
        /// Configured limit
        max: usize,
    },

    /// JSON parsing error
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Product record as emitted by the pricing collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    /// Price in major units
    pub price: f64,

    /// Nested attribute block
    #[serde(default)]
    pub attributes: Option<ProductAttributes>,

    /// Attribute flags given inline on the record
    #[serde(flatten)]
    pub inline_attributes: ProductAttributes,
}

/// Un-normalised catalog: item -> store -> product -> record.
pub type RawCatalog = FxHashMap<String, FxHashMap<String, FxHashMap<String, RawProduct>>>;

/// A priced product offered by one store for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unit price
    pub price: Money<'static, Currency>,

    /// Dietary and origin attributes
    pub attributes: ProductAttributes,
}

/// Products a single store offers for an item, keyed by product name.
pub type Offers = BTreeMap<String, Product>;

/// Stores offering an item, keyed by store name.
pub type Listing = BTreeMap<String, Offers>;

/// Normalised price catalog.
///
/// Items, stores and products are held in ordered maps, so every traversal
/// runs in lexicographic key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: BTreeMap<String, Listing>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: BTreeMap::new(),
            currency,
        }
    }

    /// Start building a catalog programmatically.
    pub fn builder(currency: &'static Currency) -> CatalogBuilder {
        CatalogBuilder::new(currency)
    }

    /// Normalise a raw catalog.
    ///
    /// Store entries without any product are dropped. Items without any store
    /// are kept, since they still belong to the shopping list.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidPrice`]: a price is negative or not finite.
    /// - [`CatalogError::TooManyStores`]: more than `max_stores` distinct stores.
    pub fn from_raw(
        raw: RawCatalog,
        currency: &'static Currency,
        max_stores: usize,
    ) -> Result<Self, CatalogError> {
        let mut items = BTreeMap::new();

        for (item, stores) in raw {
            let mut listing = Listing::new();

            for (store, products) in stores {
                let mut offers = Offers::new();

                for (product, record) in products {
                    let price = parse_price(record.price, currency).map_err(|source| {
                        CatalogError::InvalidPrice {
                            item: item.clone(),
                            store: store.clone(),
                            product: product.clone(),
                            source,
                        }
                    })?;

                    let attributes = record
                        .attributes
                        .unwrap_or_default()
                        .or(record.inline_attributes);

                    offers.insert(product, Product { price, attributes });
                }

                if !offers.is_empty() {
                    listing.insert(store, offers);
                }
            }

            items.insert(item, listing);
        }

        let catalog = Self { items, currency };
        catalog.check_store_limit(max_stores)?;

        debug!(
            items = catalog.len(),
            stores = catalog.stores().len(),
            "normalised catalog"
        );

        Ok(catalog)
    }

    /// Parse and normalise a JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the document is not a catalog or fails validation.
    pub fn from_json_str(
        json: &str,
        currency: &'static Currency,
        max_stores: usize,
    ) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;

        Self::from_raw(raw, currency, max_stores)
    }

    /// Parse and normalise a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the document is not a catalog or fails validation.
    pub fn from_yaml_str(
        yaml: &str,
        currency: &'static Currency,
        max_stores: usize,
    ) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_norway::from_str(yaml)?;

        Self::from_raw(raw, currency, max_stores)
    }

    /// Every store that offers at least one product, sorted and without duplicates.
    pub fn stores(&self) -> BTreeSet<&str> {
        self.items
            .values()
            .flat_map(|listing| listing.keys().map(String::as_str))
            .collect()
    }

    /// Iterate over items and their store listings in item name order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &Listing)> {
        self.items
            .iter()
            .map(|(item, listing)| (item.as_str(), listing))
    }

    /// Products offered for `item` at `store`, if any.
    pub fn offers(&self, item: &str, store: &str) -> Option<&Offers> {
        self.items.get(item).and_then(|listing| listing.get(store))
    }

    /// Whether the catalog lists `item` at all.
    pub fn contains_item(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Number of items in the catalog.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency every price is expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Copy of the catalog keeping only products the filter permits.
    ///
    /// Stores left without products for an item are dropped from that item.
    #[must_use]
    pub fn filtered(&self, filter: &DietaryFilter) -> Self {
        if filter.is_unrestricted() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .map(|(item, listing)| {
                let listing = listing
                    .iter()
                    .filter_map(|(store, offers)| {
                        let offers: Offers = offers
                            .iter()
                            .filter(|(_, product)| filter.permits(&product.attributes))
                            .map(|(name, product)| (name.clone(), product.clone()))
                            .collect();

                        (!offers.is_empty()).then(|| (store.clone(), offers))
                    })
                    .collect();

                (item.clone(), listing)
            })
            .collect();

        Self {
            items,
            currency: self.currency,
        }
    }

    /// Copy of the catalog keeping only the items named on `list`.
    ///
    /// An empty list keeps every item.
    #[must_use]
    pub fn restricted_to(&self, list: &ShoppingList) -> Self {
        if list.is_empty() {
            return self.clone();
        }

        let items = self
            .items
            .iter()
            .filter(|(item, _)| list.contains(item))
            .map(|(item, listing)| (item.clone(), listing.clone()))
            .collect();

        Self {
            items,
            currency: self.currency,
        }
    }

    /// Shopping list items the catalog has no entry for, in list order.
    pub fn missing_items<'l>(&self, list: &'l ShoppingList) -> Vec<&'l str> {
        list.names().filter(|name| !self.contains_item(name)).collect()
    }

    fn check_store_limit(&self, max_stores: usize) -> Result<(), CatalogError> {
        let count = self.stores().len();

        if count > max_stores {
            return Err(CatalogError::TooManyStores {
                count,
                max: max_stores,
            });
        }

        Ok(())
    }
}

/// Incremental catalog construction.
#[derive(Debug)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Create an empty builder for the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            catalog: Catalog::new(currency),
        }
    }

    /// Register an item with no stores yet.
    #[must_use]
    pub fn item(mut self, item: &str) -> Self {
        self.catalog.items.entry(item.to_string()).or_default();

        self
    }

    /// Add a product priced in minor units for `item` at `store`.
    #[must_use]
    pub fn offer(self, item: &str, store: &str, product: &str, minor_units: i64) -> Self {
        self.offer_with(item, store, product, minor_units, ProductAttributes::default())
    }

    /// Add a product with attributes for `item` at `store`.
    #[must_use]
    pub fn offer_with(
        mut self,
        item: &str,
        store: &str,
        product: &str,
        minor_units: i64,
        attributes: ProductAttributes,
    ) -> Self {
        let price = Money::from_minor(minor_units, self.catalog.currency);

        self.catalog
            .items
            .entry(item.to_string())
            .or_default()
            .entry(store.to_string())
            .or_default()
            .insert(product.to_string(), Product { price, attributes });

        self
    }

    /// Finish building.
    pub fn build(self) -> Catalog {
        self.catalog
    }
}
