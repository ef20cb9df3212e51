//! Plan files
//!
//! A plan lists the resources to price, one `[[resources]]` table each:
//!
//! ```toml
//! [[resources]]
//! type = "ibm_pi_instance"
//! address = "ibm_pi_instance.web"
//! region = "us-south"
//! processor_mode = "dedicated"
//! system_type = "e980"
//! storage_type = "tier1"
//! memory = 32
//! cpus = 4
//! ```

use crate::error::{PicostError, Result};
use crate::resources::{self, ResourceDefinition};
use crate::schema::Resource;
use crate::usage::UsageFile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A plan entry whose type has no cost model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedResource {
    pub address: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub resources: Vec<ResourceDefinition>,
    pub unsupported: Vec<UnsupportedResource>,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    resources: Vec<toml::Table>,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses plan content; `source` names the plan in error messages
    pub fn parse(content: &str, source: &str) -> Result<Self> {
        let raw: RawPlan = toml::from_str(content).map_err(|e| PicostError::Plan {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let mut plan = Plan::default();
        for (index, mut table) in raw.resources.into_iter().enumerate() {
            let resource_type = match table.remove("type") {
                Some(toml::Value::String(t)) => t,
                _ => {
                    return Err(PicostError::Plan {
                        path: source.to_string(),
                        message: format!("resources[{}] is missing a string 'type'", index),
                    })
                }
            };

            if !resources::is_supported(&resource_type) {
                let address = table
                    .get("address")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<unknown>")
                    .to_string();
                warn!("Skipping {} ({}): no cost model", address, resource_type);
                plan.unsupported.push(UnsupportedResource {
                    address,
                    resource_type,
                });
                continue;
            }

            let definition = ResourceDefinition::from_table(&resource_type, table).map_err(
                |e| match e {
                    PicostError::TomlParse(parse) => PicostError::Plan {
                        path: source.to_string(),
                        message: format!("resources[{}]: {}", index, parse),
                    },
                    other => other,
                },
            )?;
            plan.resources.push(definition);
        }

        debug!(
            "Loaded {} resources ({} unsupported) from {}",
            plan.resources.len(),
            plan.unsupported.len(),
            source
        );
        Ok(plan)
    }

    /// Builds every supported resource in plan order
    pub fn build(&self, usage: Option<&UsageFile>) -> Vec<Resource> {
        resources::build_resources(&self.resources, usage)
    }
}
