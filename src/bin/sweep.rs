use anyhow::Context;
use dotenv::dotenv;
use reserve_planner::consts::CONFIG_PATH_ENV;
use reserve_planner::{run, PlanParameters};
use std::{env, fs::File, io::Write, time::Instant};
use tracing_subscriber::EnvFilter;

/// Reruns the same configuration across several mutation rates and stores
/// every result as pretty JSON next to the working directory.
fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut base = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => PlanParameters::from_path(&path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        Err(_) => PlanParameters::default(),
    };
    base.validate().context("Invalid configuration")?;
    // Same seed for every run so only the mutation rate differs.
    base.ga.global_seed = Some(base.ga.global_seed.unwrap_or(42));

    println!("Starting sweep: ");
    let start = Instant::now();

    for mutation_rate in [0.0, 0.05, 0.1, 0.2, 0.3] {
        let mut params = base.clone();
        params.ga.mutation_rate = mutation_rate;

        let result = run(&params)
            .with_context(|| format!("Run with mutation rate {mutation_rate} failed"))?;

        let filename = format!("reserve_result_mutation_{mutation_rate}.json");
        let json = serde_json::to_string_pretty(&result)?;
        let mut f = File::create(&filename)
            .with_context(|| format!("Failed to create {filename}"))?;
        f.write_all(json.as_bytes())?;

        match result.final_summary.best_reserve {
            Some(reserve) => println!(
                "→ run(mutation {:.2}): best_reserve = {:.2}, feasible = {}/{}",
                mutation_rate,
                reserve,
                result.final_summary.feasible_count,
                result.final_summary.population_size
            ),
            None => println!("→ run(mutation {:.2}): no feasible plan", mutation_rate),
        }
    }

    let elapsed = start.elapsed();
    println!("Total sweep time: {:.2?}", elapsed);
    Ok(())
}
