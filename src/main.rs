use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use picost::config::{self, Config};
use picost::plan::Plan;
use picost::report::Breakdown;
use picost::resources::units::{CORE_UNITS, MEMORY_UNIT, STORAGE_UNITS};
use picost::usage::UsageFile;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "picost")]
#[command(
    about = "Monthly cost breakdowns for IBM Power Virtual Server instances",
    long_about = "picost estimates the monthly cost of IBM Power Virtual Server instances.\n\nIt reads:\n  - a plan file listing the instances and their configuration\n  - an optional usage file with storage and monthly hour estimates\n  - a local rate card from the config file\n\nLines without a usage estimate or a matching rate are listed but not costed."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PICOST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json); defaults to the config's output.format
    #[arg(long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the monthly cost breakdown of a plan
    Breakdown {
        /// Plan file listing the resources
        #[arg(short, long)]
        plan: PathBuf,
        /// Usage file with estimates per resource address
        #[arg(short, long)]
        usage: Option<PathBuf>,
        /// Show metering unit codes
        #[arg(long)]
        show_unit_codes: bool,
    },
    /// Write a usage file listing every usage key of a plan's resources
    UsageTemplate {
        /// Plan file listing the resources
        #[arg(short, long)]
        plan: PathBuf,
        /// Output path (prints to stdout when omitted)
        #[arg(short = 'o', long = "file")]
        file: Option<PathBuf>,
    },
    /// List the metering unit codes used for each processor mode, system type and storage tier
    Units,
    /// Initialize a configuration file
    Init {
        /// Output path for config file
        #[arg(short = 'o', long = "file", default_value = ".picost.toml")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - only warnings and errors unless verbose
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref().map(config::expand_path);
    let config = Config::load(config_path.as_deref())?;
    let output = cli.output.unwrap_or_else(|| config.output.format.clone());
    if !matches!(output.as_str(), "text" | "json") {
        anyhow::bail!("Unsupported output format: {}. Use 'text' or 'json'", output);
    }

    match cli.command {
        Commands::Breakdown {
            plan,
            usage,
            show_unit_codes,
        } => {
            let plan_path = config::expand_path(&plan);
            let plan = Plan::load(&plan_path)
                .with_context(|| format!("Failed to load plan: {}", plan_path.display()))?;

            let usage = match usage {
                Some(path) => {
                    let path = config::expand_path(&path);
                    let usage = UsageFile::load(&path)
                        .with_context(|| format!("Failed to load usage: {}", path.display()))?;
                    Some(usage)
                }
                None => None,
            };

            let resources = plan.build(usage.as_ref());
            info!("Built {} resources", resources.len());

            let breakdown = Breakdown::from_resources(
                &resources,
                &plan.unsupported,
                &config.rate_card(),
                &config.pricing.currency,
            );

            if output == "json" {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print!(
                    "{}",
                    breakdown.render_table(show_unit_codes || config.output.show_unit_codes)
                );
            }
        }
        Commands::UsageTemplate { plan, file } => {
            let plan_path = config::expand_path(&plan);
            let plan = Plan::load(&plan_path)
                .with_context(|| format!("Failed to load plan: {}", plan_path.display()))?;
            let template = UsageFile::template(&plan.build(None))?;

            match file {
                Some(path) => {
                    let path = config::expand_path(&path);
                    std::fs::write(&path, template)
                        .with_context(|| format!("Failed to write usage file: {}", path.display()))?;
                    println!("Created usage file: {}", path.display());
                }
                None => print!("{}", template),
            }
        }
        Commands::Units => {
            if output == "json" {
                let cores: Vec<_> = CORE_UNITS
                    .iter()
                    .map(|(mode, family, unit)| {
                        serde_json::json!({
                            "processor_mode": mode,
                            "system_type": family,
                            "unit": unit,
                        })
                    })
                    .collect();
                let storage: Vec<_> = STORAGE_UNITS
                    .iter()
                    .map(|(tier, unit)| serde_json::json!({ "storage_type": tier, "unit": unit }))
                    .collect();
                let units = serde_json::json!({
                    "cores": cores,
                    "memory": MEMORY_UNIT,
                    "storage": storage,
                });
                println!("{}", serde_json::to_string_pretty(&units)?);
            } else {
                println!("Cores:");
                for (mode, family, unit) in CORE_UNITS {
                    println!("  {:<10} {:<6} {}", mode, family, unit);
                }
                println!("Memory:");
                println!("  {}", MEMORY_UNIT);
                println!("Storage:");
                for (tier, unit) in STORAGE_UNITS {
                    println!("  {:<10} {}", tier, unit);
                }
            }
        }
        Commands::Init { file } => {
            config::init_config(&config::expand_path(&file))?;
        }
    }

    Ok(())
}
