//! Resource registry
//!
//! Maps resource types found in a plan to their cost model builders. Types
//! without a builder are reported as unsupported and skipped rather than
//! failing the whole breakdown.

pub mod pi_instance;
pub mod units;

use crate::error::{PicostError, Result};
use crate::schema::Resource;
use crate::usage::{UsageData, UsageFile, UsageTarget};
use crate::validation;
use pi_instance::{PiInstance, PiInstanceUsage};
use tracing::debug;

/// Resource types with a cost model
pub const SUPPORTED_TYPES: &[&str] = &[pi_instance::RESOURCE_TYPE];

/// A resource definition read from a plan
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDefinition {
    PiInstance(PiInstance),
}

impl ResourceDefinition {
    /// Decodes a plan entry of the given type
    ///
    /// Returns `PicostError::UnsupportedResource` for types with no cost model.
    pub fn from_table(resource_type: &str, table: toml::Table) -> Result<Self> {
        match resource_type {
            pi_instance::RESOURCE_TYPE => {
                let instance: PiInstance = toml::Value::Table(table).try_into()?;
                validation::validate_address(&instance.address)?;
                validation::validate_region(&instance.address, &instance.region)?;
                validation::validate_capacity(&instance.address, "memory", instance.memory)?;
                validation::validate_capacity(&instance.address, "cpus", instance.cpus)?;
                Ok(ResourceDefinition::PiInstance(instance))
            }
            other => Err(PicostError::UnsupportedResource(other.to_string())),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            ResourceDefinition::PiInstance(r) => &r.address,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceDefinition::PiInstance(_) => pi_instance::RESOURCE_TYPE,
        }
    }

    /// Builds the priced resource with the usage estimates for its address
    pub fn build(&self, usage: Option<&UsageData>) -> Resource {
        let empty = UsageData::new(self.address());
        let usage = usage.unwrap_or(&empty);
        match self {
            ResourceDefinition::PiInstance(r) => {
                r.build_resource(&PiInstanceUsage::from_usage(&r.address, usage))
            }
        }
    }
}

pub fn is_supported(resource_type: &str) -> bool {
    SUPPORTED_TYPES.contains(&resource_type)
}

/// Builds every definition, pairing each with its usage entry when one exists
pub fn build_resources(
    definitions: &[ResourceDefinition],
    usage: Option<&UsageFile>,
) -> Vec<Resource> {
    definitions
        .iter()
        .map(|def| {
            let data = usage.and_then(|u| u.get(def.address()));
            if data.is_none() {
                debug!("No usage estimates for {}", def.address());
            }
            def.build(data)
        })
        .collect()
}
