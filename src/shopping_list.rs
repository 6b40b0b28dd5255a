//! Shopping List

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a shopping list.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// The list was not an object of item -> quantity.
    #[error("invalid cart format: expected an object of item quantities")]
    InvalidFormat,

    /// The cart document is not JSON.
    #[error("failed to parse cart JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Normalised shopping list: item name -> quantity (always at least 1).
///
/// Quantities are carried for the caller's benefit; the optimizer prices one
/// unit of every item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    entries: BTreeMap<String, u32>,
}

impl ShoppingList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from a JSON cart object.
    ///
    /// Numbers are truncated to integers, strings are read up to their first
    /// non-digit, and anything unreadable counts as one. Every quantity is
    /// raised to at least one.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::InvalidFormat`] if `cart` is not an object.
    pub fn from_json(cart: &Value) -> Result<Self, ShoppingListError> {
        let object = cart.as_object().ok_or(ShoppingListError::InvalidFormat)?;

        let entries = object
            .iter()
            .map(|(item, quantity)| (item.clone(), coerce_quantity(quantity)))
            .collect();

        Ok(Self { entries })
    }

    /// Parse a JSON cart document such as `{"bread": 2, "milk": "1"}`.
    ///
    /// # Errors
    ///
    /// - [`ShoppingListError::Json`]: the text is not JSON.
    /// - [`ShoppingListError::InvalidFormat`]: the document is not an object.
    pub fn from_json_str(cart: &str) -> Result<Self, ShoppingListError> {
        let value: Value = serde_json::from_str(cart)?;

        Self::from_json(&value)
    }

    /// Parse a comma-separated list such as `"cheese, bread, butter"`.
    ///
    /// Blank entries are skipped and repeated items accumulate quantity.
    pub fn parse(list: &str) -> Self {
        let mut shopping_list = Self::new();

        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .for_each(|name| shopping_list.add(name, 1));

        shopping_list
    }

    /// Add `quantity` units of `item`; a zero quantity counts as one.
    pub fn add(&mut self, item: &str, quantity: u32) {
        let quantity = quantity.max(1);

        self.entries
            .entry(item.to_string())
            .and_modify(|existing| *existing = existing.saturating_add(quantity))
            .or_insert(quantity);
    }

    /// Quantity requested for `item`.
    pub fn quantity(&self, item: &str) -> Option<u32> {
        self.entries.get(item).copied()
    }

    /// Whether `item` is on the list.
    pub fn contains(&self, item: &str) -> bool {
        self.entries.contains_key(item)
    }

    /// Item names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(item, quantity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .map(|(item, quantity)| (item.as_str(), *quantity))
    }

    /// Comma-separated form handed to the pricing collaborator.
    pub fn to_query(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn coerce_quantity(value: &Value) -> u32 {
    let quantity = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate_to_i64)),
        Value::String(text) => leading_integer(text),
        _ => None,
    };

    quantity
        .map_or(1, |quantity| quantity.clamp(1, i64::from(u32::MAX)))
        .try_into()
        .unwrap_or(u32::MAX)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating float to integer conversion is the intent"
)]
fn truncate_to_i64(value: f64) -> i64 {
    value.trunc() as i64
}

/// Integer prefix of `text` after leading whitespace and an optional sign.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let magnitude = digits
        .get(..end)
        .filter(|prefix| !prefix.is_empty())?
        .parse::<i64>()
        .unwrap_or(i64::MAX);

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_json_coerces_quantities() -> TestResult {
        let list = ShoppingList::from_json(&json!({
            "bread": 2,
            "milk": "3",
            "eggs": "a dozen",
            "butter": null,
            "jam": 0,
            "cheese": -4,
            "apple": 2.7,
            "banana": "5 bunches",
        }))?;

        assert_eq!(list.quantity("bread"), Some(2));
        assert_eq!(list.quantity("milk"), Some(3));
        assert_eq!(list.quantity("eggs"), Some(1));
        assert_eq!(list.quantity("butter"), Some(1));
        assert_eq!(list.quantity("jam"), Some(1));
        assert_eq!(list.quantity("cheese"), Some(1));
        assert_eq!(list.quantity("apple"), Some(2));
        assert_eq!(list.quantity("banana"), Some(5));

        Ok(())
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            ShoppingList::from_json(&json!(["bread"])),
            Err(ShoppingListError::InvalidFormat)
        ));
        assert!(matches!(
            ShoppingList::from_json(&Value::Null),
            Err(ShoppingListError::InvalidFormat)
        ));
    }

    #[test]
    fn from_json_str_reads_cart_documents() -> TestResult {
        let list = ShoppingList::from_json_str(r#"{"bread": 2, "milk": "1 carton"}"#)?;

        assert_eq!(list.quantity("bread"), Some(2));
        assert_eq!(list.quantity("milk"), Some(1));

        assert!(matches!(
            ShoppingList::from_json_str("bread, milk"),
            Err(ShoppingListError::Json(_))
        ));
        assert!(matches!(
            ShoppingList::from_json_str("[1, 2]"),
            Err(ShoppingListError::InvalidFormat)
        ));

        Ok(())
    }

    #[test]
    fn parse_trims_and_accumulates() {
        let list = ShoppingList::parse(" cheese, bread ,, butter, bread ");

        assert_eq!(list.len(), 3);
        assert_eq!(list.quantity("bread"), Some(2));
        assert_eq!(list.quantity("cheese"), Some(1));
    }

    #[test]
    fn to_query_joins_names() {
        let list = ShoppingList::parse("ketchup, bread");

        assert_eq!(list.to_query(), "bread, ketchup");
    }

    #[test]
    fn add_treats_zero_as_one() {
        let mut list = ShoppingList::new();

        list.add("salt", 0);

        assert_eq!(list.quantity("salt"), Some(1));
    }

    #[test]
    fn huge_quantities_saturate() -> TestResult {
        let list = ShoppingList::from_json(&json!({ "rice": "99999999999999999999999" }))?;

        assert_eq!(list.quantity("rice"), Some(u32::MAX));

        Ok(())
    }
}
