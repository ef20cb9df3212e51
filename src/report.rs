//! Cost breakdown report
//!
//! Joins built resources with the rate card. A line is only costed when it has
//! both a monthly quantity and a matching rate; anything else is shown with the
//! reason it could not be priced and left out of the totals.

use crate::catalog::RateCard;
use crate::plan::UnsupportedResource;
use crate::schema::{CostLine, Resource};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment, Color, Table};
use console::style;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a cost line has, or lacks, a monthly cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Priced,
    /// The resource attributes map to no metering unit
    UnknownUnit,
    NoMatchingPrice,
    /// The usage estimate needed for the quantity was not provided
    NoData,
    /// Quantity and price are known but their product overflows or the unit
    /// multiplier is zero
    CostNotComputable,
}

impl LineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LineStatus::Priced => "priced",
            LineStatus::UnknownUnit => "unknown unit",
            LineStatus::NoMatchingPrice => "no matching price",
            LineStatus::NoData => "no data",
            LineStatus::CostNotComputable => "cost not computable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub name: String,
    pub unit: String,
    pub unit_code: String,
    pub monthly_quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,
    pub status: LineStatus,
}

impl LineBreakdown {
    pub fn from_cost_line(line: &CostLine, rates: &RateCard) -> Self {
        let price = rates.resolve(&line.price_selector).map(|r| r.price);
        let monthly_cost = match (price, line.monthly_quantity) {
            (Some(price), Some(quantity)) if !line.unit_multiplier.is_zero() => price
                .checked_mul(quantity)
                .and_then(|c| c.checked_div(line.unit_multiplier)),
            _ => None,
        };

        let status = if !line.price_selector.is_resolved() {
            LineStatus::UnknownUnit
        } else if price.is_none() {
            LineStatus::NoMatchingPrice
        } else if line.monthly_quantity.is_none() {
            LineStatus::NoData
        } else if monthly_cost.is_none() {
            LineStatus::CostNotComputable
        } else {
            LineStatus::Priced
        };

        Self {
            name: line.name.clone(),
            unit: line.unit.clone(),
            unit_code: line.price_selector.unit.clone(),
            monthly_quantity: line.monthly_quantity,
            price,
            monthly_cost,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    pub name: String,
    pub resource_type: String,
    pub lines: Vec<LineBreakdown>,
    /// Sum of the priced lines only
    pub monthly_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub currency: String,
    pub resources: Vec<ResourceBreakdown>,
    pub unsupported: Vec<UnsupportedResource>,
    pub total_monthly_cost: Decimal,
    pub generated_at: DateTime<Utc>,
}

impl Breakdown {
    pub fn from_resources(
        resources: &[Resource],
        unsupported: &[UnsupportedResource],
        rates: &RateCard,
        currency: &str,
    ) -> Self {
        let resources: Vec<ResourceBreakdown> = resources
            .iter()
            .map(|resource| {
                let lines: Vec<LineBreakdown> = resource
                    .cost_lines
                    .iter()
                    .map(|line| LineBreakdown::from_cost_line(line, rates))
                    .collect();
                let monthly_cost = lines.iter().filter_map(|l| l.monthly_cost).sum();
                ResourceBreakdown {
                    name: resource.name.clone(),
                    resource_type: resource.resource_type.clone(),
                    lines,
                    monthly_cost,
                }
            })
            .collect();

        let total_monthly_cost = resources.iter().map(|r| r.monthly_cost).sum();

        Self {
            currency: currency.to_string(),
            resources,
            unsupported: unsupported.to_vec(),
            total_monthly_cost,
            generated_at: Utc::now(),
        }
    }

    /// Number of lines that could not be costed
    pub fn unpriced_lines(&self) -> usize {
        self.resources
            .iter()
            .flat_map(|r| &r.lines)
            .filter(|l| l.status != LineStatus::Priced)
            .count()
    }

    pub fn render_table(&self, show_unit_codes: bool) -> String {
        let mut out = String::new();

        for resource in &self.resources {
            out.push_str(&format!(
                "{} {}\n",
                style(&resource.name).bold().cyan(),
                style(format!("({})", resource.resource_type)).dim()
            ));

            let mut table = Table::new();
            let mut header = vec!["Cost line", "Monthly qty", "Unit"];
            if show_unit_codes {
                header.push("Unit code");
            }
            header.extend(["Price", "Monthly cost"]);
            table.set_header(header);

            for line in &resource.lines {
                let mut row = vec![
                    Cell::new(&line.name),
                    Cell::new(format_quantity(line.monthly_quantity))
                        .set_alignment(CellAlignment::Right),
                    Cell::new(&line.unit),
                ];
                if show_unit_codes {
                    let code = if line.unit_code.is_empty() {
                        Cell::new("unknown unit").fg(Color::Yellow)
                    } else {
                        Cell::new(&line.unit_code)
                    };
                    row.push(code);
                }
                row.push(
                    Cell::new(line.price.map(format_price).unwrap_or_else(|| "-".to_string()))
                        .set_alignment(CellAlignment::Right),
                );
                row.push(match line.monthly_cost {
                    Some(cost) => Cell::new(format_cost(cost, &self.currency))
                        .set_alignment(CellAlignment::Right),
                    None => Cell::new(line.status.label()).fg(Color::Yellow),
                });
                table.add_row(row);
            }

            out.push_str(&table.to_string());
            out.push('\n');
            out.push_str(&format!(
                "{} {}\n\n",
                style("Resource total:").dim(),
                format_cost(resource.monthly_cost, &self.currency)
            ));
        }

        if !self.unsupported.is_empty() {
            out.push_str(&format!(
                "{} {} resources not supported:\n",
                style("Skipped").yellow(),
                self.unsupported.len()
            ));
            for r in &self.unsupported {
                out.push_str(&format!("  {} ({})\n", r.address, r.resource_type));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "{} {}\n",
            style("OVERALL TOTAL (monthly):").bold(),
            style(format_cost(self.total_monthly_cost, &self.currency)).bold().green()
        ));

        let unpriced = self.unpriced_lines();
        if unpriced > 0 {
            out.push_str(&format!(
                "{}\n",
                style(format!(
                    "{} cost lines have no cost; add usage estimates or rates to price them",
                    unpriced
                ))
                .dim()
            ));
        }

        out
    }
}

pub fn format_quantity(quantity: Option<Decimal>) -> String {
    match quantity {
        Some(q) => q.normalize().to_string(),
        None => "no data".to_string(),
    }
}

fn format_price(price: Decimal) -> String {
    price.normalize().to_string()
}

pub fn format_cost(cost: Decimal, currency: &str) -> String {
    format!("{} {}", cost.round_dp(2), currency)
}
