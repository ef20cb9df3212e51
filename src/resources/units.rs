//! Metering unit selection for Power Virtual Server instances
//!
//! The price list meters virtual processor cores with a different unit code for
//! every processor mode and system family, and attached storage with one unit
//! code per storage tier. Both tables are plain data: adding a system family
//! means adding rows, not branches. A lookup miss yields the empty unit code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Memory is metered with a single unit regardless of system family
pub const MEMORY_UNIT: &str = "MS_GIGABYTE_HOURS";

/// (processor mode, system family, unit code)
pub const CORE_UNITS: &[(&str, &str, &str)] = &[
    ("shared", "s922", "SOS_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("shared", "e980", "ESS_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("shared", "e1080", "PTEN_ESS_VIRTUAL_PROCESSOR_CORE_HRS"),
    ("dedicated", "s922", "SOD_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("dedicated", "e980", "EDD_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("dedicated", "e1080", "PTEN_EDD_VIRTUAL_PROCESSOR_CORE_HRS"),
    ("capped", "s922", "SOC_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("capped", "e980", "ECC_VIRTUAL_PROCESSOR_CORE_HOURS"),
    ("capped", "e1080", "PTEN_ECC_VIRTUAL_PROCESSOR_CORE_HRS"),
];

/// (storage tier, unit code)
pub const STORAGE_UNITS: &[(&str, &str)] = &[
    ("tier1", "TIER_ONE_STORAGE_GIGABYTE_HOURS"),
    ("tier3", "TIER_THREE_STORAGE_GIGABYTE_HOURS"),
];

/// Unit code for virtual processor cores, or "" when the pair is not metered
pub fn core_unit(mode: &ProcessorMode, family: &SystemFamily) -> &'static str {
    CORE_UNITS
        .iter()
        .find(|(m, f, _)| *m == mode.as_str() && *f == family.as_str())
        .map(|(_, _, unit)| *unit)
        .unwrap_or("")
}

/// Unit code for attached storage, or "" when the tier is not metered
pub fn storage_unit(tier: &StorageTier) -> &'static str {
    STORAGE_UNITS
        .iter()
        .find(|(t, _)| *t == tier.as_str())
        .map(|(_, unit)| *unit)
        .unwrap_or("")
}

/// Generates an open enum: known variants plus `Other(String)` for values the
/// tables do not know yet. Parsing never fails and round-trips the input.
macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(s) => s.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::from(s.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    /// How virtual cores are allocated and billed
    ProcessorMode {
        Shared => "shared",
        Dedicated => "dedicated",
        Capped => "capped",
    }
);

open_enum!(
    /// Hardware class of the underlying Power system
    SystemFamily {
        S922 => "s922",
        E980 => "e980",
        E1080 => "e1080",
    }
);

open_enum!(
    StorageTier {
        Tier1 => "tier1",
        Tier3 => "tier3",
    }
);
