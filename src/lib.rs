//! Smartcart
//!
//! Smartcart finds the cheapest way to buy a shopping list from a catalog of
//! per-store product prices: from one store, split across two stores, or split
//! across three, alongside the most expensive single-store basket as a
//! baseline for savings.

pub mod basket;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod optimizer;
pub mod prelude;
pub mod prices;
pub mod report;
pub mod shopping_list;
pub mod sources;
