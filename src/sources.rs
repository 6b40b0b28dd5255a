//! Price Sources
//!
//! The catalog is produced outside this crate by a pricing collaborator. A
//! [`PriceSource`] is the boundary the caller fetches it through; every
//! failure at this boundary is a hard error and nothing here retries.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    catalog::{Catalog, CatalogError, DEFAULT_MAX_STORES, DietaryFilter},
    shopping_list::ShoppingList,
};

/// Errors raised while fetching a catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    /// IO error reading the catalog
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The catalog document was malformed (JSON or YAML) or failed
    /// validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Something that can produce a price catalog for a shopping list.
pub trait PriceSource {
    /// Fetch a catalog covering `list`, restricted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the catalog cannot be obtained or is malformed.
    fn fetch_catalog(
        &self,
        list: &ShoppingList,
        filter: &DietaryFilter,
    ) -> Result<Catalog, SourceError>;
}

/// Catalog document stored on disk, JSON or YAML by file extension.
///
/// The document may price more than the shopping list asks for; only the
/// listed items are kept, unless the list is empty.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
    currency: &'static Currency,
    max_stores: usize,
}

impl CatalogFile {
    /// Read catalogs from `path`, priced in `currency`.
    pub fn new(path: impl Into<PathBuf>, currency: &'static Currency) -> Self {
        Self {
            path: path.into(),
            currency,
            max_stores: DEFAULT_MAX_STORES,
        }
    }

    /// Override the store limit applied during normalisation.
    #[must_use]
    pub fn with_max_stores(mut self, max_stores: usize) -> Self {
        self.max_stores = max_stores;

        self
    }

    /// Path of the catalog document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                extension.eq_ignore_ascii_case("yml") || extension.eq_ignore_ascii_case("yaml")
            })
    }
}

impl PriceSource for CatalogFile {
    #[tracing::instrument(skip_all, fields(path = %self.path.display(), items = list.len()))]
    fn fetch_catalog(
        &self,
        list: &ShoppingList,
        filter: &DietaryFilter,
    ) -> Result<Catalog, SourceError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let catalog = if self.is_yaml() {
            Catalog::from_yaml_str(&contents, self.currency, self.max_stores)?
        } else {
            parse_catalog_response(&contents, self.currency, self.max_stores)?
        };

        let catalog = catalog.restricted_to(list).filtered(filter);

        for item in catalog.missing_items(list) {
            warn!(item, "shopping list item missing from catalog");
        }

        info!(
            items = catalog.len(),
            stores = catalog.stores().len(),
            "loaded catalog"
        );

        Ok(catalog)
    }
}

/// Parse a catalog out of a model response, which may wrap the JSON document
/// in Markdown code fences.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the remaining text is not a valid catalog.
pub fn parse_catalog_response(
    text: &str,
    currency: &'static Currency,
    max_stores: usize,
) -> Result<Catalog, CatalogError> {
    let cleaned = text.replace("```json", "").replace("```", "");

    Catalog::from_json_str(cleaned.trim(), currency, max_stores)
}
