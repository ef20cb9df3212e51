//! Provider-agnostic cost schema
//!
//! Every resource builder emits a `Resource` made of `CostLine`s. A cost line
//! carries the billable monthly quantity and the `PriceSelector` that a price
//! catalog matches against its price list. Neither side knows about the other:
//! the builder never looks up prices and the catalog never computes quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced resource: its address, the usage keys it understands and its cost lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    pub usage_schema: Vec<UsageItem>,
    pub cost_lines: Vec<CostLine>,
}

/// One billing dimension of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub name: String,
    pub unit: String,
    pub unit_multiplier: Decimal,
    /// `None` when the usage estimate needed for the quantity was not provided.
    /// A computed zero is `Some(Decimal::ZERO)`.
    pub monthly_quantity: Option<Decimal>,
    pub price_selector: PriceSelector,
}

impl CostLine {
    pub fn has_quantity(&self) -> bool {
        self.monthly_quantity.is_some()
    }
}

/// Compound key used to find a unit price in a price catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSelector {
    pub vendor_name: String,
    pub region: String,
    pub product_family: String,
    pub service: String,
    pub attribute_filters: Vec<AttributeFilter>,
    /// Metering unit code. Empty when the resource attributes map to no known unit.
    pub unit: String,
}

impl PriceSelector {
    /// Whether a metering unit code was resolved for this selector
    pub fn is_resolved(&self) -> bool {
        !self.unit.is_empty()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attribute_filters
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub key: String,
    pub value: String,
}

impl AttributeFilter {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// A usage key a resource accepts, with the value written to usage templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageItem {
    pub key: String,
    pub default_value: Decimal,
    pub value_type: UsageValueType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageValueType {
    Float64,
    Int64,
    String,
}
