//! IBM Power Virtual Server instance (`ibm_pi_instance`)
//!
//! An instance is billed on three dimensions: virtual processor cores, memory
//! and attached storage. All three are metered per hour, so each monthly
//! quantity is a capacity multiplied by the estimated monthly instance hours.
//!
//! Pricing information: https://cloud.ibm.com/power/pricing

use crate::resources::units::{self, ProcessorMode, StorageTier, SystemFamily};
use crate::schema::{AttributeFilter, CostLine, PriceSelector, Resource, UsageValueType};
use crate::usage::{UsageField, UsageTarget};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const RESOURCE_TYPE: &str = "ibm_pi_instance";

const VENDOR: &str = "ibm";
const PRODUCT_FAMILY: &str = "service";
const SERVICE: &str = "power-iaas";
const PLAN_NAME: &str = "power-virtual-server-group";
const PLAN_TYPE: &str = "Paid";

/// Static configuration of a Power Virtual Server instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiInstance {
    pub address: String,
    pub region: String,
    pub processor_mode: ProcessorMode,
    pub system_type: SystemFamily,
    pub storage_type: StorageTier,
    /// Memory in GB
    pub memory: Decimal,
    /// Virtual processor cores
    pub cpus: Decimal,
}

/// Usage estimates for a Power Virtual Server instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PiInstanceUsage {
    /// Attached storage in GB
    pub storage: Option<Decimal>,
    pub monthly_instance_hours: Option<Decimal>,
}

impl UsageTarget for PiInstanceUsage {
    const FIELDS: &'static [UsageField<Self>] = &[
        UsageField {
            key: "storage",
            value_type: UsageValueType::Float64,
            default_value: Decimal::ZERO,
            set: set_storage,
        },
        UsageField {
            key: "monthly_instance_hours",
            value_type: UsageValueType::Float64,
            default_value: Decimal::ZERO,
            set: set_monthly_instance_hours,
        },
    ];
}

fn set_storage(usage: &mut PiInstanceUsage, value: Decimal) {
    usage.storage = Some(value);
}

fn set_monthly_instance_hours(usage: &mut PiInstanceUsage, value: Decimal) {
    usage.monthly_instance_hours = Some(value);
}

impl PiInstance {
    /// Builds the priced resource. Never fails: unknown attributes resolve to an
    /// empty unit code and missing estimates to an absent quantity.
    pub fn build_resource(&self, usage: &PiInstanceUsage) -> Resource {
        Resource {
            name: self.address.clone(),
            resource_type: RESOURCE_TYPE.to_string(),
            usage_schema: PiInstanceUsage::usage_schema(),
            cost_lines: self.cost_lines(usage).into(),
        }
    }

    /// Cost lines in billing order: cores, memory, storage
    pub fn cost_lines(&self, usage: &PiInstanceUsage) -> [CostLine; 3] {
        [
            self.cores_cost_line(usage),
            self.memory_cost_line(usage),
            self.storage_cost_line(usage),
        ]
    }

    fn cores_cost_line(&self, usage: &PiInstanceUsage) -> CostLine {
        let quantity = usage
            .monthly_instance_hours
            .and_then(|hours| self.hourly_quantity("cores", self.cpus, hours));

        let unit = units::core_unit(&self.processor_mode, &self.system_type);
        if unit.is_empty() {
            debug!(
                "{}: no core unit for processor mode '{}' on system type '{}'",
                self.address, self.processor_mode, self.system_type
            );
        }

        CostLine {
            name: "Cores".to_string(),
            unit: "Core Hours".to_string(),
            unit_multiplier: Decimal::ONE,
            monthly_quantity: quantity,
            price_selector: self.price_selector(unit),
        }
    }

    fn memory_cost_line(&self, usage: &PiInstanceUsage) -> CostLine {
        let quantity = usage
            .monthly_instance_hours
            .and_then(|hours| self.hourly_quantity("memory", self.memory, hours));

        CostLine {
            name: "Memory".to_string(),
            unit: "GB Hours".to_string(),
            unit_multiplier: Decimal::ONE,
            monthly_quantity: quantity,
            price_selector: self.price_selector(units::MEMORY_UNIT),
        }
    }

    fn storage_cost_line(&self, usage: &PiInstanceUsage) -> CostLine {
        // Storage is billed per GB hour, so it needs both estimates
        let quantity = match (usage.storage, usage.monthly_instance_hours) {
            (Some(storage), Some(hours)) => self.hourly_quantity("storage", storage, hours),
            _ => None,
        };

        let unit = units::storage_unit(&self.storage_type);
        if unit.is_empty() {
            debug!(
                "{}: no storage unit for storage type '{}'",
                self.address, self.storage_type
            );
        }

        CostLine {
            name: format!("Storage - {}", self.storage_type),
            unit: "GB Hours".to_string(),
            unit_multiplier: Decimal::ONE,
            monthly_quantity: quantity,
            price_selector: self.price_selector(unit),
        }
    }

    fn hourly_quantity(&self, dimension: &str, capacity: Decimal, hours: Decimal) -> Option<Decimal> {
        let quantity = capacity.checked_mul(hours);
        if quantity.is_none() {
            warn!(
                "{}: {} quantity overflows ({} x {} hours), leaving it unset",
                self.address, dimension, capacity, hours
            );
        }
        quantity
    }

    fn price_selector(&self, unit: &str) -> PriceSelector {
        PriceSelector {
            vendor_name: VENDOR.to_string(),
            region: self.region.clone(),
            product_family: PRODUCT_FAMILY.to_string(),
            service: SERVICE.to_string(),
            attribute_filters: vec![
                AttributeFilter::new("planName", PLAN_NAME),
                AttributeFilter::new("planType", PLAN_TYPE),
            ],
            unit: unit.to_string(),
        }
    }
}
