//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::{
    catalog::{DEFAULT_MAX_STORES, DietaryFilter},
    prices::DEFAULT_CURRENCY,
};

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,

    /// The JSON result document.
    Json,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Dietary and origin filter flags.
#[derive(Debug, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent boolean filter toggles from CLI/env."
)]
pub struct FilterConfig {
    /// Only products of Canada
    #[arg(long, env = "SMARTCART_CANADIAN")]
    pub canadian: bool,

    /// Only vegan products
    #[arg(long, env = "SMARTCART_VEGAN")]
    pub vegan: bool,

    /// Only vegetarian products
    #[arg(long, env = "SMARTCART_VEGETARIAN")]
    pub vegetarian: bool,

    /// Only halal products
    #[arg(long, env = "SMARTCART_HALAL")]
    pub halal: bool,

    /// Only gluten free products
    #[arg(long, env = "SMARTCART_GLUTEN_FREE")]
    pub gluten_free: bool,
}

impl From<&FilterConfig> for DietaryFilter {
    fn from(config: &FilterConfig) -> Self {
        DietaryFilter {
            is_canadian: config.canadian,
            is_vegan: config.vegan,
            is_vegetarian: config.vegetarian,
            is_halal: config.halal,
            gluten_free: config.gluten_free,
        }
    }
}

/// Smartcart cart optimizer configuration
#[derive(Debug, Parser)]
#[command(
    name = "smartcart",
    about = "Find the cheapest way to buy a shopping list across stores",
    long_about = None
)]
pub struct Config {
    /// Price catalog produced by the pricing service (.json, .yml or .yaml)
    #[arg(short, long, env = "SMARTCART_CATALOG")]
    pub catalog: PathBuf,

    /// Comma-separated shopping list, e.g. "cheese, bread, butter"
    #[arg(short = 'L', long, env = "SMARTCART_LIST", conflicts_with = "cart")]
    pub list: Option<String>,

    /// JSON cart document of item -> quantity, e.g. {"bread": 2}
    #[arg(long, env = "SMARTCART_CART")]
    pub cart: Option<PathBuf>,

    /// ISO-4217 currency the catalog is priced in
    #[arg(long, env = "SMARTCART_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Maximum number of distinct stores accepted from a catalog
    #[arg(long, env = "SMARTCART_MAX_STORES", default_value_t = DEFAULT_MAX_STORES)]
    pub max_stores: usize,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Dietary filters
    #[command(flatten)]
    pub filter: FilterConfig,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Dietary filter requested on the command line.
    pub fn dietary_filter(&self) -> DietaryFilter {
        DietaryFilter::from(&self.filter)
    }
}
