//! Scenario harness report binary: an argv-parsed binary with
//! `all`/`scenarios`/`properties` groups, printing a box-drawing summary
//! of which scenarios and invariants passed.

use std::env;
use std::time::Instant;

use vqsim_tester::common::{print_scenario_table, print_section, print_summary, ScenarioResult};
use vqsim_tester::{properties, scenarios};

fn print_header() {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                 vqsim scenario harness");
    println!("═══════════════════════════════════════════════════════════════\n");
}

fn print_usage() {
    println!("Usage: vqsim-tester [OPTIONS]");
    println!();
    println!("Options:");
    println!("  all          Run scenarios and properties (default)");
    println!("  scenarios    Run the six end-to-end scenarios only");
    println!("  properties   Run the testable-properties invariants only");
    println!("  help         Show this help message");
}

fn run_scenarios() -> Vec<ScenarioResult> {
    print_section("Scenarios");
    scenarios::all()
        .into_iter()
        .map(|s| {
            let grid = (s.build)();
            let start = Instant::now();
            let outcome = (s.check)(&grid);
            let elapsed = start.elapsed();
            ScenarioResult {
                name: s.name.to_string(),
                elapsed,
                passed: outcome.is_ok(),
                detail: outcome.err(),
            }
        })
        .collect()
}

fn run_properties() -> Vec<ScenarioResult> {
    print_section("Properties");
    properties::all()
        .into_iter()
        .map(|p| {
            let start = Instant::now();
            let outcome = (p.run)();
            let elapsed = start.elapsed();
            ScenarioResult {
                name: p.name.to_string(),
                elapsed,
                passed: outcome.is_ok(),
                detail: outcome.err(),
            }
        })
        .collect()
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    print_header();

    let run_all = args.is_empty() || args.iter().any(|a| a == "all");
    let run_scenarios_flag = run_all || args.iter().any(|a| a == "scenarios");
    let run_properties_flag = run_all || args.iter().any(|a| a == "properties");

    let mut results = Vec::new();
    if run_scenarios_flag {
        results.extend(run_scenarios());
    }
    if run_properties_flag {
        results.extend(run_properties());
    }

    if !results.is_empty() {
        print_scenario_table(&results);
        print_summary(&results);
        if !results.iter().all(|r| r.passed) {
            std::process::exit(1);
        }
    }
}
