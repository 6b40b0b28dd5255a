//! Optimization Report

use std::{fmt, io};

use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Serialize, Serializer, ser::SerializeStruct};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::basket::{Breakdown, SplitBasket, StoreBasket};

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// JSON serialization error
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// The result tiers of one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Cheapest basket from a single store.
    CheapestSingleStore,

    /// Cheapest basket split across two stores.
    CheapestTwoStores,

    /// Cheapest basket split across three stores.
    CheapestThreeStores,

    /// Most expensive basket from a single store.
    HighestSingleStore,
}

impl Tier {
    /// Every tier, in report order.
    pub const ALL: [Self; 4] = [
        Self::CheapestSingleStore,
        Self::CheapestTwoStores,
        Self::CheapestThreeStores,
        Self::HighestSingleStore,
    ];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CheapestSingleStore => "Cheapest single store",
            Self::CheapestTwoStores => "Cheapest two stores",
            Self::CheapestThreeStores => "Cheapest three stores",
            Self::HighestSingleStore => "Highest single store",
        };

        f.write_str(label)
    }
}

/// Outcome of every tier for one catalog.
///
/// A `None` tier has no solution: no store stocks the whole list, or no store
/// combination of the requested size can be put to use.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationReport {
    /// Cheapest basket from a single store
    pub cheapest_single_store: Option<StoreBasket>,

    /// Cheapest basket split across exactly two stores
    pub cheapest_two_stores: Option<SplitBasket>,

    /// Cheapest basket split across exactly three stores
    pub cheapest_three_stores: Option<SplitBasket>,

    /// Most expensive basket from a single store, the comparison baseline
    pub highest_single_store: Option<StoreBasket>,

    /// Currency of every amount in the report
    pub currency: &'static Currency,
}

impl OptimizationReport {
    /// Total of `tier`, if it has a solution.
    pub fn total(&self, tier: Tier) -> Option<Money<'static, Currency>> {
        match tier {
            Tier::CheapestSingleStore => self.cheapest_single_store.as_ref().map(|b| b.total),
            Tier::CheapestTwoStores => self.cheapest_two_stores.as_ref().map(|b| b.total),
            Tier::CheapestThreeStores => self.cheapest_three_stores.as_ref().map(|b| b.total),
            Tier::HighestSingleStore => self.highest_single_store.as_ref().map(|b| b.total),
        }
    }

    /// Breakdown of `tier`, if it has a solution.
    pub fn breakdown(&self, tier: Tier) -> Option<&Breakdown> {
        match tier {
            Tier::CheapestSingleStore => self.cheapest_single_store.as_ref().map(|b| &b.breakdown),
            Tier::CheapestTwoStores => self.cheapest_two_stores.as_ref().map(|b| &b.breakdown),
            Tier::CheapestThreeStores => self.cheapest_three_stores.as_ref().map(|b| &b.breakdown),
            Tier::HighestSingleStore => self.highest_single_store.as_ref().map(|b| &b.breakdown),
        }
    }

    /// Savings of `tier` against the highest single-store basket.
    ///
    /// `Ok(None)` when either side has no solution.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings(&self, tier: Tier) -> Result<Option<Money<'static, Currency>>, MoneyError> {
        let (Some(baseline), Some(total)) = (self.total(Tier::HighestSingleStore), self.total(tier))
        else {
            return Ok(None);
        };

        baseline.sub(total).map(Some)
    }

    /// Write the report as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if serialization or writing fails.
    pub fn write_json(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;

        Ok(())
    }

    /// Write the report as human-readable tables: a tier summary followed by
    /// the store breakdown of every tier that has a solution.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if a savings calculation or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        write_summary_table(&mut out, self)?;

        for tier in Tier::ALL {
            if let Some(breakdown) = self.breakdown(tier) {
                write_breakdown_table(&mut out, tier, breakdown)?;
            }
        }

        Ok(())
    }
}

impl Serialize for OptimizationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let unfulfilled_single = StoreBasket::unfulfilled(self.currency);
        let unfulfilled_split = SplitBasket::unfulfilled(self.currency);

        let mut state = serializer.serialize_struct("OptimizationReport", 4)?;

        state.serialize_field(
            "cheapest_single_store",
            self.cheapest_single_store
                .as_ref()
                .unwrap_or(&unfulfilled_single),
        )?;
        state.serialize_field(
            "cheapest_two_stores",
            self.cheapest_two_stores
                .as_ref()
                .unwrap_or(&unfulfilled_split),
        )?;
        state.serialize_field(
            "cheapest_three_stores",
            self.cheapest_three_stores
                .as_ref()
                .unwrap_or(&unfulfilled_split),
        )?;
        state.serialize_field("highest_single_store", &self.highest_single_store)?;

        state.end()
    }
}

fn write_summary_table(
    out: &mut impl io::Write,
    report: &OptimizationReport,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Tier", "Stores", "Total", "Savings"]);

    for tier in Tier::ALL {
        let stores = report
            .breakdown(tier)
            .map(|breakdown| breakdown.stores().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();

        let total = report
            .total(tier)
            .map_or_else(|| "no solution".to_string(), |total| total.to_string());

        let savings = match tier {
            Tier::HighestSingleStore => String::new(),
            _ => report
                .savings(tier)?
                .map(|savings| savings.to_string())
                .unwrap_or_default(),
        };

        builder.push_record([tier.to_string(), stores, total, savings]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_breakdown_table(
    out: &mut impl io::Write,
    tier: Tier,
    breakdown: &Breakdown,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Store", "Item", "Product", "Price"]);

    for (store, subtotal) in breakdown.iter() {
        for line in &subtotal.items {
            builder.push_record([
                store.to_string(),
                line.name.clone(),
                line.product.clone(),
                line.price.to_string(),
            ]);
        }

        builder.push_record([
            String::new(),
            String::new(),
            "Subtotal".to_string(),
            subtotal.total.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "\n {tier}\n{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::CAD;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{catalog::Catalog, optimizer::optimize};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::builder(CAD)
            .offer("bread", "metro", "White", 300)
            .offer("bread", "sobeys", "White", 200)
            .offer("milk", "metro", "2%", 400)
            .offer("milk", "sobeys", "2%", 500)
            .offer("milk", "sobeys", "Organic", 700)
            .build()
    }

    #[test]
    fn empty_report_serializes_sentinels() -> TestResult {
        let report = optimize(&Catalog::new(CAD));

        assert_eq!(
            serde_json::to_value(&report)?,
            json!({
                "cheapest_single_store": { "store": "", "total": 0.0, "items": {}, "breakdown": {} },
                "cheapest_two_stores": { "total": 0.0, "items": {}, "breakdown": {} },
                "cheapest_three_stores": { "total": 0.0, "items": {}, "breakdown": {} },
                "highest_single_store": null,
            })
        );

        Ok(())
    }

    #[test]
    fn split_tier_serializes_assignments() -> TestResult {
        let report = optimize(&catalog());

        let value = serde_json::to_value(&report)?;

        assert_eq!(
            value.pointer("/cheapest_two_stores/items/bread"),
            Some(&json!({ "store": "sobeys", "product": "White", "price": 2.0 }))
        );
        assert_eq!(
            value.pointer("/cheapest_two_stores/total"),
            Some(&json!(6.0))
        );

        Ok(())
    }

    #[test]
    fn savings_are_measured_against_highest_single_store() -> TestResult {
        let report = optimize(&catalog());

        // highest: sobeys at 2.00 + 7.00; cheapest single: metro at 3.00 + 4.00
        assert_eq!(
            report.total(Tier::HighestSingleStore),
            Some(Money::from_minor(900, CAD))
        );
        assert_eq!(
            report.savings(Tier::CheapestSingleStore)?,
            Some(Money::from_minor(200, CAD))
        );
        assert_eq!(
            report.savings(Tier::CheapestTwoStores)?,
            Some(Money::from_minor(300, CAD))
        );
        assert_eq!(report.savings(Tier::CheapestThreeStores)?, None);

        Ok(())
    }

    #[test]
    fn write_to_renders_every_tier() -> TestResult {
        let report = optimize(&catalog());
        let mut out = Vec::new();

        report.write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Cheapest two stores"));
        assert!(rendered.contains("no solution"));
        assert!(rendered.contains("Subtotal"));
        assert!(rendered.contains("sobeys"));

        Ok(())
    }

    #[test]
    fn write_json_round_trips_through_serde() -> TestResult {
        let report = optimize(&catalog());
        let mut out = Vec::new();

        report.write_json(&mut out)?;

        let value: serde_json::Value = serde_json::from_slice(&out)?;

        assert_eq!(value.pointer("/cheapest_single_store/store"), Some(&json!("metro")));
        assert_eq!(value.pointer("/highest_single_store/store"), Some(&json!("sobeys")));

        Ok(())
    }
}
