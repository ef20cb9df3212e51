//! Usage estimates
//!
//! A usage file supplies the estimates a plan cannot know, keyed by resource
//! address:
//!
//! ```toml
//! [resource_usage."ibm_pi_instance.web"]
//! storage = 500
//! monthly_instance_hours = 720
//! ```
//!
//! Each resource type declares its usage keys in a static `UsageField` table
//! that maps a key to a setter on its typed usage struct. Keys missing from the
//! file stay `None`; schema defaults are only written into generated templates.

use crate::error::{PicostError, Result};
use crate::schema::{Resource, UsageItem, UsageValueType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// One usage key of a resource type and where its value goes
pub struct UsageField<T> {
    pub key: &'static str,
    pub value_type: UsageValueType,
    pub default_value: Decimal,
    pub set: fn(&mut T, Decimal),
}

/// Typed usage struct of a resource type
pub trait UsageTarget: Default + 'static {
    const FIELDS: &'static [UsageField<Self>];

    /// Builds the typed usage from raw usage data. Keys not in `FIELDS` are
    /// ignored with a warning.
    fn from_usage(address: &str, data: &UsageData) -> Self {
        let mut target = Self::default();
        for (key, value) in &data.values {
            match Self::FIELDS.iter().find(|f| f.key == key.as_str()) {
                Some(field) => (field.set)(&mut target, *value),
                None => warn!("Ignoring unknown usage key '{}' for {}", key, address),
            }
        }
        target
    }

    fn usage_schema() -> Vec<UsageItem> {
        Self::FIELDS
            .iter()
            .map(|f| UsageItem {
                key: f.key.to_string(),
                default_value: f.default_value,
                value_type: f.value_type,
            })
            .collect()
    }
}

/// Parsed usage values of a single resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageData {
    pub address: String,
    pub values: BTreeMap<String, Decimal>,
}

impl UsageData {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Decimal) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.values.get(key).copied()
    }

    /// Parses one `[resource_usage."<address>"]` table
    pub fn from_table(address: &str, table: &toml::Table) -> Result<Self> {
        let mut data = UsageData::new(address);
        for (key, value) in table {
            let parsed = parse_usage_value(value).ok_or_else(|| PicostError::Usage {
                address: address.to_string(),
                key: key.clone(),
                reason: format!("expected a number, got {}", value.type_str()),
            })?;
            if parsed.is_sign_negative() && !parsed.is_zero() {
                return Err(PicostError::Validation {
                    field: format!("{}.{}", address, key),
                    reason: format!("usage estimates cannot be negative, got {}", parsed),
                });
            }
            data.values.insert(key.clone(), parsed);
        }
        Ok(data)
    }
}

fn parse_usage_value(value: &toml::Value) -> Option<Decimal> {
    match value {
        toml::Value::Integer(i) => Some(Decimal::from(*i)),
        toml::Value::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string()).ok(),
        toml::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// All usage estimates from a usage file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageFile {
    resources: BTreeMap<String, UsageData>,
}

#[derive(Debug, Deserialize)]
struct RawUsageFile {
    #[serde(default)]
    resource_usage: toml::Table,
}

#[derive(Debug, Serialize)]
struct UsageTemplate {
    resource_usage: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

impl UsageFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let usage = Self::parse(&content)?;
        debug!(
            "Loaded usage for {} resources from {}",
            usage.resources.len(),
            path.display()
        );
        Ok(usage)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawUsageFile = toml::from_str(content)?;
        let mut resources = BTreeMap::new();
        for (address, entry) in &raw.resource_usage {
            let table = entry.as_table().ok_or_else(|| PicostError::Usage {
                address: address.clone(),
                key: "*".to_string(),
                reason: format!("expected a table of usage keys, got {}", entry.type_str()),
            })?;
            resources.insert(address.clone(), UsageData::from_table(address, table)?);
        }
        Ok(Self { resources })
    }

    pub fn get(&self, address: &str) -> Option<&UsageData> {
        self.resources.get(address)
    }

    pub fn insert(&mut self, data: UsageData) {
        self.resources.insert(data.address.clone(), data);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Renders a usage file listing every usage key of every resource at its
    /// schema default
    pub fn template(resources: &[Resource]) -> Result<String> {
        let mut template = UsageTemplate {
            resource_usage: BTreeMap::new(),
        };
        for resource in resources.iter().filter(|r| !r.usage_schema.is_empty()) {
            let entry = template
                .resource_usage
                .entry(resource.name.clone())
                .or_default();
            for item in &resource.usage_schema {
                entry.insert(item.key.clone(), template_value(item));
            }
        }
        Ok(toml::to_string_pretty(&template)?)
    }
}

fn template_value(item: &UsageItem) -> toml::Value {
    match item.value_type {
        UsageValueType::Int64 => item
            .default_value
            .trunc()
            .to_string()
            .parse::<i64>()
            .map(toml::Value::Integer)
            .unwrap_or(toml::Value::Integer(0)),
        UsageValueType::Float64 => {
            let text = item.default_value.to_string();
            match text.parse::<i64>() {
                Ok(i) => toml::Value::Integer(i),
                Err(_) => text
                    .parse::<f64>()
                    .map(toml::Value::Float)
                    .unwrap_or(toml::Value::Integer(0)),
            }
        }
        UsageValueType::String => toml::Value::String(item.default_value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_integer_float_and_string_values() {
        let usage = UsageFile::parse(
            r#"
[resource_usage."ibm_pi_instance.web"]
storage = 500
monthly_instance_hours = 720.5

[resource_usage."ibm_pi_instance.db"]
storage = "12.25"
"#,
        )
        .unwrap();

        let web = usage.get("ibm_pi_instance.web").unwrap();
        assert_eq!(web.get("storage"), Some(dec!(500)));
        assert_eq!(web.get("monthly_instance_hours"), Some(dec!(720.5)));

        let db = usage.get("ibm_pi_instance.db").unwrap();
        assert_eq!(db.get("storage"), Some(dec!(12.25)));
        assert_eq!(db.get("monthly_instance_hours"), None);
    }

    #[test]
    fn test_float_values_are_exact() {
        let usage = UsageFile::parse(
            "[resource_usage.a]\nstorage = 0.1\n",
        )
        .unwrap();
        assert_eq!(usage.get("a").unwrap().get("storage"), Some(dec!(0.1)));
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let err = UsageFile::parse("[resource_usage.a]\nstorage = true\n").unwrap_err();
        assert!(matches!(err, PicostError::Usage { ref key, .. } if key == "storage"));
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let err = UsageFile::parse("[resource_usage.a]\nstorage = -1\n").unwrap_err();
        assert!(matches!(err, PicostError::Validation { .. }));
    }

    #[test]
    fn test_empty_file_has_no_usage() {
        let usage = UsageFile::parse("").unwrap();
        assert!(usage.is_empty());
        assert!(usage.get("anything").is_none());
    }
}
