//! fleet-runner: headless runner for the synthetic grid fleet.
//!
//! Usage:
//!   fleet-runner                          print the fleet summary
//!   fleet-runner --seed 7 --config fleet.json
//!   fleet-runner --tag COMED-0001         dump one asset and its deepened views
//!   fleet-runner --ipc-mode               JSON lines on stdin/stdout

use anyhow::Result;
use gridfleet_core::{
    asset_synthesizer::GridAsset,
    config::FleetConfig,
    diagnostic_synthesizer::DiagnosticRecord,
    fleet::{Fleet, FleetGenerator},
    health_record_synthesizer::HealthSeries,
    scenario_synthesizer::DecisionScenario,
    work_order_synthesizer::WorkOrder,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetSummary,
    GetAsset { tag: String },
    Diagnostic { tag: String },
    HealthRecords { tag: String },
    WorkOrders { tag: String },
    Scenario { tag: String },
    Quit,
}

#[derive(serde::Serialize)]
struct AssetReport {
    asset: GridAsset,
    diagnostic: DiagnosticRecord,
    health_records: HealthSeries,
    work_orders: Vec<WorkOrder>,
    scenario: DecisionScenario,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let tag = string_arg(&args, "--tag");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => FleetConfig::load(path)?,
        None => FleetConfig::default(),
    };
    config.fleet_seed = parse_arg(&args, "--seed", config.fleet_seed);
    let generator = FleetGenerator::new(config);

    if ipc_mode {
        let fleet = generator.generate_fleet();
        return run_ipc_loop(&generator, &fleet);
    }

    match tag {
        Some(tag) => {
            let report = build_report(&generator, tag)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => {
            let fleet = generator.generate_fleet();
            print_summary(&generator, &fleet);
        }
    }
    Ok(())
}

fn run_ipc_loop(generator: &FleetGenerator, fleet: &Fleet) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unreadable IPC line: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetSummary => Ok(serde_json::to_value(&fleet.stats)?),
            IpcCommand::GetAsset { tag } => {
                lookup(generator, fleet, &tag).and_then(|a| Ok(serde_json::to_value(a)?))
            }
            IpcCommand::Diagnostic { tag } => lookup(generator, fleet, &tag)
                .and_then(|a| Ok(serde_json::to_value(generator.diagnostic(&a))?)),
            IpcCommand::HealthRecords { tag } => lookup(generator, fleet, &tag)
                .and_then(|a| Ok(serde_json::to_value(generator.health_records(&a))?)),
            IpcCommand::WorkOrders { tag } => lookup(generator, fleet, &tag)
                .and_then(|a| Ok(serde_json::to_value(generator.work_orders(&a))?)),
            IpcCommand::Scenario { tag } => lookup(generator, fleet, &tag).and_then(|a| {
                let diagnostic = generator.diagnostic(&a);
                Ok(serde_json::to_value(generator.scenario(&a, &diagnostic))?)
            }),
        };

        match response {
            Ok(value) => writeln!(stdout, "{value}")?,
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Prefer the fleet copy; fall back to regenerating from the tag.
fn lookup(generator: &FleetGenerator, fleet: &Fleet, tag: &str) -> Result<GridAsset> {
    match fleet.find(tag) {
        Some(asset) => Ok(asset.clone()),
        None => Ok(generator.asset(tag)?),
    }
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn build_report(generator: &FleetGenerator, tag: &str) -> Result<AssetReport> {
    let asset = generator.asset(tag)?;
    let health_records = generator.health_records(&asset);
    let diagnostic = generator.diagnostic(&asset);
    let work_orders = generator.work_orders(&asset);
    let scenario = generator.scenario(&asset, &diagnostic);
    Ok(AssetReport { asset, diagnostic, health_records, work_orders, scenario })
}

fn print_summary(generator: &FleetGenerator, fleet: &Fleet) {
    let config = generator.config();
    let s = &fleet.stats;

    println!("=== FLEET SUMMARY ===");
    println!("  seed:           {}", config.fleet_seed);
    println!("  as of:          {}", config.as_of);
    println!("  assets:         {}", s.total_assets);
    println!("  customers:      {}", s.total_customers);
    println!("  avg age:        {:.1} years", s.avg_age);
    println!("  avg health:     {:.1}", s.avg_health);
    println!("  avg load:       {:.1}%", s.avg_load);
    println!("  aged (>40y):    {}", s.aged_count);
    println!("  poor (<60):     {}", s.poor_count);
    println!("  critical (<40): {}", s.critical_count);

    println!();
    println!("=== BY REGION ===");
    for (region, count) in &s.by_region {
        println!("  {region:<28} {count}");
    }

    println!();
    println!("=== BY RISK TREND ===");
    for (trend, count) in &s.by_risk_trend {
        println!("  {trend:<28} {count}");
    }

    println!();
    println!("=== BY FAILURE MODE ===");
    for (mode, count) in &s.by_failure_mode {
        println!("  {mode:<28} {count}");
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
