use anyhow::Context;
use dotenv::dotenv;
use reserve_planner::consts::CONFIG_PATH_ENV;
use reserve_planner::report::render_result;
use reserve_planner::{run, PlanParameters};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // First argument wins over the environment.
    let config_path = env::args().nth(1).or_else(|| env::var(CONFIG_PATH_ENV).ok());
    let params = match config_path {
        Some(path) => PlanParameters::from_path(&path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => {
            info!("No configuration file given, using default parameters.");
            PlanParameters::default()
        }
    };
    params.validate().context("Invalid configuration")?;

    let result = run(&params).context("Plan evolution failed")?;
    println!("{}", render_result(&result));
    Ok(())
}
