//! Local rate card
//!
//! Prices come from the `[[pricing.rates]]` entries of the config file; there
//! is no network lookup. A rate matches a price selector when vendor, service
//! and unit are equal, its region is unset or equal, and every attribute it
//! declares equals the selector's attribute filter of the same key.

use crate::schema::PriceSelector;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

fn default_vendor() -> String {
    "ibm".to_string()
}

fn default_service() -> String {
    "power-iaas".to_string()
}

/// Price of one metering unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    #[serde(default = "default_vendor")]
    pub vendor: String,
    #[serde(default = "default_service")]
    pub service: String,
    /// Unset means the rate applies in every region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub unit: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    pub price: Decimal,
}

impl RateEntry {
    pub fn new(unit: &str, price: Decimal) -> Self {
        Self {
            vendor: default_vendor(),
            service: default_service(),
            region: None,
            unit: unit.to_string(),
            attributes: BTreeMap::new(),
            price,
        }
    }

    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn matches(&self, selector: &PriceSelector) -> bool {
        if !selector.is_resolved() || self.unit != selector.unit {
            return false;
        }
        if self.vendor != selector.vendor_name || self.service != selector.service {
            return false;
        }
        if let Some(region) = &self.region {
            if region != &selector.region {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|(k, v)| selector.attribute(k) == Some(v.as_str()))
    }

    fn specificity(&self) -> usize {
        usize::from(self.region.is_some()) * 1000 + self.attributes.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCard {
    entries: Vec<RateEntry>,
}

impl RateCard {
    pub fn new(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most specific matching rate; region-bound entries beat regionless ones,
    /// then more attributes win, then the earlier entry
    pub fn resolve(&self, selector: &PriceSelector) -> Option<&RateEntry> {
        let mut best: Option<&RateEntry> = None;
        for entry in self.entries.iter().filter(|e| e.matches(selector)) {
            if best.map_or(true, |b| entry.specificity() > b.specificity()) {
                best = Some(entry);
            }
        }
        if best.is_none() {
            debug!(
                "No rate for unit '{}' in region '{}'",
                selector.unit, selector.region
            );
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeFilter;
    use rust_decimal_macros::dec;

    fn selector(unit: &str) -> PriceSelector {
        PriceSelector {
            vendor_name: "ibm".to_string(),
            region: "us-south".to_string(),
            product_family: "service".to_string(),
            service: "power-iaas".to_string(),
            attribute_filters: vec![
                AttributeFilter::new("planName", "power-virtual-server-group"),
                AttributeFilter::new("planType", "Paid"),
            ],
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_resolve_prefers_region_bound_rate() {
        let card = RateCard::new(vec![
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.02)),
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.03)).in_region("us-south"),
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.04)).in_region("eu-de"),
        ]);
        let rate = card.resolve(&selector("MS_GIGABYTE_HOURS")).unwrap();
        assert_eq!(rate.price, dec!(0.03));
    }

    #[test]
    fn test_resolve_falls_back_to_regionless_rate() {
        let card = RateCard::new(vec![
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.04)).in_region("eu-de"),
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.02)),
        ]);
        let rate = card.resolve(&selector("MS_GIGABYTE_HOURS")).unwrap();
        assert_eq!(rate.price, dec!(0.02));
    }

    #[test]
    fn test_attributes_must_match() {
        let card = RateCard::new(vec![
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.01)).with_attribute("planType", "Free"),
        ]);
        assert!(card.resolve(&selector("MS_GIGABYTE_HOURS")).is_none());

        let card = RateCard::new(vec![
            RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.01)).with_attribute("planType", "Paid"),
        ]);
        assert!(card.resolve(&selector("MS_GIGABYTE_HOURS")).is_some());
    }

    #[test]
    fn test_empty_unit_never_matches() {
        let card = RateCard::new(vec![RateEntry::new("", dec!(1))]);
        assert!(card.resolve(&selector("")).is_none());
    }

    #[test]
    fn test_rate_entry_from_toml() {
        let entry: RateEntry = toml::from_str(
            "unit = \"EDD_VIRTUAL_PROCESSOR_CORE_HOURS\"\nregion = \"us-south\"\nprice = 0.75\n",
        )
        .unwrap();
        assert_eq!(entry.vendor, "ibm");
        assert_eq!(entry.service, "power-iaas");
        assert_eq!(entry.price, dec!(0.75));
    }
}
