//! End-to-end tests: plan and usage files on disk through to a breakdown
//!
//! Uses temporary files the same way the CLI reads them.

use picost::catalog::{RateCard, RateEntry};
use picost::config::Config;
use picost::plan::Plan;
use picost::report::{Breakdown, LineStatus};
use picost::usage::UsageFile;
use picost::PicostError;
use rust_decimal_macros::dec;
use tempfile::TempDir;

const PLAN: &str = r#"
[[resources]]
type = "ibm_pi_instance"
address = "ibm_pi_instance.web"
region = "us-south"
processor_mode = "dedicated"
system_type = "e980"
storage_type = "tier1"
memory = 32
cpus = 4

[[resources]]
type = "ibm_pi_instance"
address = "ibm_pi_instance.batch"
region = "eu-de"
processor_mode = "capped"
system_type = "s922"
storage_type = "tier3"
memory = 16
cpus = 0.5

[[resources]]
type = "ibm_is_vpc"
address = "ibm_is_vpc.main"
"#;

const USAGE: &str = r#"
[resource_usage."ibm_pi_instance.web"]
storage = 500
monthly_instance_hours = 720
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_breakdown_from_files() {
    let dir = TempDir::new().unwrap();
    let plan = Plan::load(&write(&dir, "plan.toml", PLAN)).unwrap();
    let usage = UsageFile::load(&write(&dir, "usage.toml", USAGE)).unwrap();

    let resources = plan.build(Some(&usage));
    assert_eq!(resources.len(), 2);

    let web = &resources[0];
    assert_eq!(web.cost_lines[0].monthly_quantity, Some(dec!(2880)));
    assert_eq!(web.cost_lines[1].monthly_quantity, Some(dec!(23040)));
    assert_eq!(web.cost_lines[2].monthly_quantity, Some(dec!(360000)));

    // No usage entry for batch: selectors resolve, quantities stay absent
    let batch = &resources[1];
    assert_eq!(batch.cost_lines[0].price_selector.unit, "SOC_VIRTUAL_PROCESSOR_CORE_HOURS");
    assert_eq!(batch.cost_lines[0].price_selector.region, "eu-de");
    assert!(batch.cost_lines.iter().all(|l| l.monthly_quantity.is_none()));

    let rates = RateCard::new(vec![
        RateEntry::new("EDD_VIRTUAL_PROCESSOR_CORE_HOURS", dec!(0.5)).in_region("us-south"),
        RateEntry::new("MS_GIGABYTE_HOURS", dec!(0.01)),
        RateEntry::new("TIER_ONE_STORAGE_GIGABYTE_HOURS", dec!(0.0001)),
    ]);
    let breakdown = Breakdown::from_resources(&resources, &plan.unsupported, &rates, "USD");

    assert_eq!(breakdown.resources[0].monthly_cost, dec!(1706.4));
    assert_eq!(breakdown.resources[1].monthly_cost, dec!(0));
    assert_eq!(breakdown.total_monthly_cost, dec!(1706.4));
    assert_eq!(breakdown.unsupported.len(), 1);

    let batch_lines = &breakdown.resources[1].lines;
    assert_eq!(batch_lines[0].status, LineStatus::NoMatchingPrice);
    assert_eq!(batch_lines[1].status, LineStatus::NoData);
}

#[test]
fn test_breakdown_json_keeps_absent_quantities() {
    let plan = Plan::parse(PLAN, "plan.toml").unwrap();
    let resources = plan.build(None);
    let breakdown = Breakdown::from_resources(&resources, &plan.unsupported, &RateCard::default(), "USD");

    let json = serde_json::to_value(&breakdown).unwrap();
    let first_line = &json["resources"][0]["lines"][0];
    assert!(first_line["monthly_quantity"].is_null());
    assert_eq!(first_line["status"], "no_matching_price");
    assert_eq!(first_line["unit_code"], "EDD_VIRTUAL_PROCESSOR_CORE_HOURS");
}

#[test]
fn test_usage_template_round_trip() {
    let plan = Plan::parse(PLAN, "plan.toml").unwrap();
    let template = UsageFile::template(&plan.build(None)).unwrap();

    assert!(template.contains("ibm_pi_instance.web"));
    assert!(template.contains("ibm_pi_instance.batch"));
    assert!(template.contains("monthly_instance_hours = 0"));
    assert!(!template.contains("ibm_is_vpc"));

    // A template is a valid usage file, and its zeros are computed quantities
    let usage = UsageFile::parse(&template).unwrap();
    let resources = plan.build(Some(&usage));
    assert!(resources
        .iter()
        .flat_map(|r| &r.cost_lines)
        .all(|l| l.monthly_quantity == Some(dec!(0))));
}

#[test]
fn test_bad_usage_value_is_reported() {
    let err = UsageFile::parse("[resource_usage.\"ibm_pi_instance.web\"]\nstorage = \"lots\"\n")
        .unwrap_err();
    match err {
        PicostError::Usage { address, key, .. } => {
            assert_eq!(address, "ibm_pi_instance.web");
            assert_eq!(key, "storage");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_plan_with_invalid_address() {
    let content = r#"
[[resources]]
type = "ibm_pi_instance"
address = "web"
region = "us-south"
processor_mode = "shared"
system_type = "s922"
storage_type = "tier1"
memory = 2
cpus = 1
"#;
    let err = Plan::parse(content, "plan.toml").unwrap_err();
    assert!(matches!(err, PicostError::Validation { ref field, .. } if field == "address"));
}

#[test]
fn test_config_rates_feed_breakdown() {
    let dir = TempDir::new().unwrap();
    let config_path = write(
        &dir,
        "config.toml",
        r#"
[pricing]
currency = "EUR"

[[pricing.rates]]
unit = "MS_GIGABYTE_HOURS"
region = "eu-de"
price = "0.02"
"#,
    );
    let config = Config::load(Some(&config_path)).unwrap();
    let plan = Plan::parse(PLAN, "plan.toml").unwrap();

    let mut usage = UsageFile::default();
    usage.insert(
        picost::usage::UsageData::new("ibm_pi_instance.batch")
            .with("monthly_instance_hours", dec!(100)),
    );

    let breakdown = Breakdown::from_resources(
        &plan.build(Some(&usage)),
        &plan.unsupported,
        &config.rate_card(),
        &config.pricing.currency,
    );
    assert_eq!(breakdown.currency, "EUR");
    assert_eq!(breakdown.resources[1].lines[1].monthly_cost, Some(dec!(32)));
    assert_eq!(breakdown.total_monthly_cost, dec!(32));
}
