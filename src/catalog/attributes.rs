//! Product attributes and dietary filters

use serde::{Deserialize, Serialize};

/// Dietary and origin flags reported for a product.
///
/// Each flag is optional: a collaborator that does not know an attribute
/// leaves it unset, which never satisfies a filter that requires it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductAttributes {
    /// Product of Canada.
    #[serde(default, alias = "isCanadian", skip_serializing_if = "Option::is_none")]
    pub is_canadian: Option<bool>,

    /// Contains no animal products.
    #[serde(default, alias = "isVegan", skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,

    /// Contains no meat.
    #[serde(default, alias = "isVegetarian", skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,

    /// Halal certified.
    #[serde(default, alias = "isHalal", skip_serializing_if = "Option::is_none")]
    pub is_halal: Option<bool>,

    /// Gluten free.
    #[serde(default, alias = "glutenFree", skip_serializing_if = "Option::is_none")]
    pub gluten_free: Option<bool>,
}

impl ProductAttributes {
    /// Fill any flag unset on `self` from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            is_canadian: self.is_canadian.or(fallback.is_canadian),
            is_vegan: self.is_vegan.or(fallback.is_vegan),
            is_vegetarian: self.is_vegetarian.or(fallback.is_vegetarian),
            is_halal: self.is_halal.or(fallback.is_halal),
            gluten_free: self.gluten_free.or(fallback.gluten_free),
        }
    }
}

/// Dietary and origin requirements applied to a catalog.
///
/// A `false` flag means "don't care".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent filter toggles mirrored from the pricing request"
)]
pub struct DietaryFilter {
    /// Only products of Canada.
    #[serde(alias = "isCanadian")]
    pub is_canadian: bool,

    /// Only vegan products.
    #[serde(alias = "isVegan")]
    pub is_vegan: bool,

    /// Only vegetarian products.
    #[serde(alias = "isVegetarian")]
    pub is_vegetarian: bool,

    /// Only halal products.
    #[serde(alias = "isHalal")]
    pub is_halal: bool,

    /// Only gluten free products.
    #[serde(alias = "glutenFree")]
    pub gluten_free: bool,
}

impl DietaryFilter {
    /// Whether no requirement is set.
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a product with the given attributes satisfies every requested flag.
    pub fn permits(&self, attributes: &ProductAttributes) -> bool {
        let satisfied = |required: bool, flag: Option<bool>| !required || flag == Some(true);

        satisfied(self.is_canadian, attributes.is_canadian)
            && satisfied(self.is_vegan, attributes.is_vegan)
            && satisfied(self.is_vegetarian, attributes.is_vegetarian)
            && satisfied(self.is_halal, attributes.is_halal)
            && satisfied(self.gluten_free, attributes.gluten_free)
    }
}
