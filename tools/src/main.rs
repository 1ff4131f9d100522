//! sweep-runner: headless parameter sweep runner.
//!
//! Usage:
//!   sweep-runner --config data/parameters.json --db results.db
//!   sweep-runner --config parameters.json --seed 42 --iterations 120 --group-by salary
//!   sweep-runner --config parameters.json --json > report.json

use anyhow::Result;
use profitsim_core::{
    config::SweepConfig,
    engine::{new_run_id, SweepEngine, SweepReport},
    stats::OutcomeSummary,
    store::ResultStore,
    types::CombinationId,
    ParamField, ParameterCombination,
};
use std::env;
use std::time::Instant;

#[derive(serde::Serialize)]
struct GroupView {
    varying: ParamField,
    key: String,
    members: usize,
    distinct_values: usize,
    comparable_series: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = string_arg(&args, "--config").unwrap_or("./data/parameters.json");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let json_mode = args.iter().any(|a| a == "--json");

    let mut config = SweepConfig::load(config_path)?;
    if let Some(seed) = parse_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(iterations) = parse_arg(&args, "--iterations") {
        anyhow::ensure!(iterations > 0, "--iterations must be greater than 0");
        config.iterations = iterations;
    }

    // Explicit --group-by wins; otherwise every field with more than one value.
    let group_fields: Vec<ParamField> = match string_arg(&args, "--group-by") {
        Some(name) => vec![name.parse()?],
        None => ParamField::ALL
            .into_iter()
            .filter(|f| config.parameters.varies(*f))
            .collect(),
    };

    let started = chrono::Local::now();
    let run_id = new_run_id();

    if !json_mode {
        println!("sweep-runner: Monte Carlo profit sweep");
        println!("  config:      {config_path}");
        println!("  seed:        {} ({})", config.seed, config.seed_mode.as_str());
        println!("  iterations:  {}", config.iterations);
        println!("  db:          {db}");
        println!("  started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
        println!();
    }

    let store = ResultStore::open(db)?;
    store.migrate()?;
    store.insert_run(
        &run_id,
        config.seed,
        config.seed_mode,
        config.iterations,
        env!("CARGO_PKG_VERSION"),
    )?;

    let clock = Instant::now();
    let engine = SweepEngine::new(run_id.clone(), config)?;
    let report = engine.run_with_store(&store)?;

    if json_mode {
        print_json(&report, &group_fields)?;
    } else {
        print_summary(&report, &group_fields);
        println!();
        println!("Elapsed: {:.1} s", clock.elapsed().as_secs_f64());
    }
    Ok(())
}

fn group_views(report: &SweepReport, fields: &[ParamField]) -> Vec<GroupView> {
    fields
        .iter()
        .flat_map(|field| {
            report.group_by(*field).into_iter().map(move |g| GroupView {
                varying: *field,
                key: g.key.to_string(),
                members: g.len(),
                distinct_values: g.distinct_varying_values().len(),
                comparable_series: g.comparable_members().len(),
            })
        })
        .collect()
}

fn print_json(report: &SweepReport, fields: &[ParamField]) -> Result<()> {
    let value = serde_json::json!({
        "report": report,
        "groups": group_views(report, fields),
        "best": report.best_by_mean_profit().map(|(id, mean)| serde_json::json!({
            "combination_id": id,
            "combination": report.combinations[id.0],
            "mean_profit": mean,
        })),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_summary(report: &SweepReport, fields: &[ParamField]) {
    println!("=== SWEEP SUMMARY ===");
    println!("  run_id:        {}", report.run_id);
    println!("  combinations:  {}", report.combinations.len());
    println!("  completed:     {}", report.completed_count());
    println!("  failed:        {}", report.failures.len());
    for failure in &report.failures {
        println!("    {} [{}]: {}", failure.id, failure.combination, failure.reason);
    }

    println!();
    println!("=== PER COMBINATION ===");
    for (id, combination) in report.combinations.iter().enumerate() {
        let id = CombinationId(id);
        if let Some(s) = report.summary(id) {
            print_combination(id, combination, &s);
        }
    }

    println!();
    println!("=== GROUPS ===");
    if fields.is_empty() {
        println!("  (No parameter has more than one value)");
    }
    for view in group_views(report, fields) {
        if view.distinct_values < 2 {
            continue;
        }
        println!(
            "  {} varies | {} | {} runs, {} comparable",
            view.varying, view.key, view.members, view.comparable_series
        );
    }

    println!();
    match report.best_by_mean_profit() {
        Some((id, mean)) => {
            println!("=== BEST COMBINATION ===");
            println!("  {id} [{}]", report.combinations[id.0]);
            println!("  mean monthly profit: {mean:.0}");
        }
        None => println!("  (No combination completed)"),
    }
}

fn print_combination(
    id: CombinationId,
    combination: &ParameterCombination,
    s: &OutcomeSummary,
) {
    println!(
        "  {id} [{combination}] | mean {:.0} | sd {:.0} | p10 {:.0} | p90 {:.0} | success {:.1}% | total {:.0}",
        s.mean_profit,
        s.std_dev_profit,
        s.percentile_10,
        s.percentile_90,
        s.success_rate * 100.0,
        s.final_amount
    );
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let value = string_arg(args, flag)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {flag}: cannot parse '{value}'");
            None
        }
    }
}
