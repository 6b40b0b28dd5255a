//! Basket
//!
//! Result types produced by the optimizer: a basket bought from one store, a
//! basket split over several stores, and the per-store breakdown both carry.

use std::collections::BTreeMap;

use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::prices::serialize_money;

/// One item of a basket: what was bought and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasketLine {
    /// Item name from the shopping list
    pub name: String,

    /// Product chosen for the item
    pub product: String,

    /// Unit price paid
    #[serde(serialize_with = "serialize_money")]
    pub price: Money<'static, Currency>,
}

/// The part of a basket bought at one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSubtotal {
    /// Lines bought at the store, in item name order
    pub items: Vec<BasketLine>,

    /// Sum of the line prices
    #[serde(serialize_with = "serialize_money")]
    pub total: Money<'static, Currency>,
}

/// Basket lines grouped by store, with per-store subtotals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breakdown(BTreeMap<String, StoreSubtotal>);

impl Breakdown {
    /// Group `(store, line)` pairs by store and total each group.
    pub fn from_lines<'s>(
        lines: impl IntoIterator<Item = (&'s str, BasketLine)>,
        currency: &'static Currency,
    ) -> Self {
        let mut grouped: BTreeMap<String, Vec<BasketLine>> = BTreeMap::new();

        for (store, line) in lines {
            grouped.entry(store.to_string()).or_default().push(line);
        }

        let stores = grouped
            .into_iter()
            .map(|(store, items)| {
                let total = line_total(&items, currency);

                (store, StoreSubtotal { items, total })
            })
            .collect();

        Self(stores)
    }

    /// Subtotal for `store`.
    pub fn get(&self, store: &str) -> Option<&StoreSubtotal> {
        self.0.get(store)
    }

    /// Store names in lexicographic order.
    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over stores and their subtotals.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoreSubtotal)> {
        self.0
            .iter()
            .map(|(store, subtotal)| (store.as_str(), subtotal))
    }

    /// Number of stores.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no store appears.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every store subtotal.
    pub fn total(&self, currency: &'static Currency) -> Money<'static, Currency> {
        let minor_units = self
            .0
            .values()
            .map(|subtotal| subtotal.total.to_minor_units())
            .fold(0, i64::saturating_add);

        Money::from_minor(minor_units, currency)
    }
}

/// A basket bought entirely from one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreBasket {
    /// Store the whole basket is bought from
    pub store: String,

    /// Basket total
    #[serde(serialize_with = "serialize_money")]
    pub total: Money<'static, Currency>,

    /// Product chosen per item
    pub items: BTreeMap<String, String>,

    /// The single-store breakdown
    pub breakdown: Breakdown,
}

impl StoreBasket {
    /// Build a basket from the lines chosen at `store`.
    pub fn new(store: &str, lines: Vec<BasketLine>, currency: &'static Currency) -> Self {
        let total = line_total(&lines, currency);

        let items = lines
            .iter()
            .map(|line| (line.name.clone(), line.product.clone()))
            .collect();

        let breakdown = Breakdown::from_lines(lines.into_iter().map(|line| (store, line)), currency);

        Self {
            store: store.to_string(),
            total,
            items,
            breakdown,
        }
    }

    /// Placeholder reported when no store stocks the whole list.
    pub fn unfulfilled(currency: &'static Currency) -> Self {
        Self {
            store: String::new(),
            total: Money::from_minor(0, currency),
            items: BTreeMap::new(),
            breakdown: Breakdown::default(),
        }
    }

    /// Whether this is the [`StoreBasket::unfulfilled`] placeholder.
    pub fn is_unfulfilled(&self) -> bool {
        self.store.is_empty()
    }
}

/// Where an item of a split basket is bought.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// Store the item is bought from
    pub store: String,

    /// Product chosen
    pub product: String,

    /// Unit price paid
    #[serde(serialize_with = "serialize_money")]
    pub price: Money<'static, Currency>,
}

/// A basket split across several stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitBasket {
    /// Basket total
    #[serde(serialize_with = "serialize_money")]
    pub total: Money<'static, Currency>,

    /// Store, product and price chosen per item
    pub items: BTreeMap<String, Assignment>,

    /// Lines grouped by store
    pub breakdown: Breakdown,
}

impl SplitBasket {
    /// Build a split basket from per-item assignments.
    pub fn new(items: BTreeMap<String, Assignment>, currency: &'static Currency) -> Self {
        let breakdown = Breakdown::from_lines(
            items.iter().map(|(name, assignment)| {
                (
                    assignment.store.as_str(),
                    BasketLine {
                        name: name.clone(),
                        product: assignment.product.clone(),
                        price: assignment.price,
                    },
                )
            }),
            currency,
        );

        Self {
            total: breakdown.total(currency),
            items,
            breakdown,
        }
    }

    /// Placeholder reported when no store combination qualifies.
    pub fn unfulfilled(currency: &'static Currency) -> Self {
        Self {
            total: Money::from_minor(0, currency),
            items: BTreeMap::new(),
            breakdown: Breakdown::default(),
        }
    }

    /// Whether this is the [`SplitBasket::unfulfilled`] placeholder.
    pub fn is_unfulfilled(&self) -> bool {
        self.items.is_empty()
    }

    /// Stores the basket is split across.
    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.breakdown.stores()
    }
}

fn line_total(lines: &[BasketLine], currency: &'static Currency) -> Money<'static, Currency> {
    let minor_units = lines
        .iter()
        .map(|line| line.price.to_minor_units())
        .fold(0, i64::saturating_add);

    Money::from_minor(minor_units, currency)
}
