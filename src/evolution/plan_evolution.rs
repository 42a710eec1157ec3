use crate::config::{ConfigurationError, PlanParameters};
use crate::evolution::aggregator::{Aggregator, ArithmeticMean, StandardDeviation};
use crate::evolution::fitness::{PlanCost, PlanObjective, ReserveObjective};
use crate::evolution::operators::{generate_offspring_pair, select_parents, tournament_selection};
use crate::plan::{Plan, Population};
use crate::sampling::sample_plan;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Monitoring snapshot of one generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub feasible_count: usize,
    /// Highest reserve among feasible plans.
    pub best_reserve: Option<f64>,
    pub mean_reserve: Option<f64>,
    pub reserve_std_dev: Option<f64>,
}

/// Summary statistics for the final population after evolution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FinalPopulationSummary {
    pub population_size: usize,
    pub feasible_count: usize,
    pub best_reserve: Option<f64>,
    /// Mean reserve across the feasible plans of the final population.
    pub population_average_reserve: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvolutionResult {
    pub best_plan: Plan,
    /// Cost the best plan had when it was picked out of the final population.
    pub best_cost: PlanCost,
    /// A fresh evaluation of the best plan, for reporting.
    pub reported_cost: PlanCost,
    pub generation_summaries: Vec<GenerationSummary>,
    pub final_summary: FinalPopulationSummary,
}

impl EvolutionResult {
    /// False when not a single plan of the final population was feasible.
    pub fn is_feasible(&self) -> bool {
        self.best_cost.is_feasible()
    }
}

pub fn initialize_population<R: Rng + ?Sized>(
    params: &PlanParameters,
    rng: &mut R,
) -> Result<Population, ConfigurationError> {
    params.validate_structure()?;

    Ok((0..params.ga.population_size)
        .map(|_| sample_plan(params, rng))
        .collect())
}

fn feasible_reserves(costs: &[PlanCost]) -> Vec<f64> {
    costs.iter().filter_map(PlanCost::reserve).collect()
}

fn summarize_generation<O, R>(
    generation: usize,
    population: &[Plan],
    objective: &O,
    rng: &mut R,
) -> GenerationSummary
where
    O: PlanObjective,
    R: Rng + ?Sized,
{
    let costs: Vec<PlanCost> = population
        .iter()
        .map(|plan| objective.evaluate(plan, rng))
        .collect();
    let reserves = feasible_reserves(&costs);

    GenerationSummary {
        generation,
        feasible_count: reserves.len(),
        best_reserve: reserves.iter().copied().reduce(f64::max),
        mean_reserve: ArithmeticMean.value(&reserves).ok(),
        reserve_std_dev: StandardDeviation.value(&reserves).ok(),
    }
}

/// Runs the generational GA to completion.
///
/// The population is replaced wholesale every generation. With an odd
/// population size the slot left over by pairing is filled with a tournament
/// winner copied through unchanged. Snapshots, when enabled, draw from their
/// own stream seeded from `rng`, so they never alter the search itself.
pub fn evolve_plans<R: Rng + ?Sized>(
    params: &PlanParameters,
    rng: &mut R,
) -> Result<EvolutionResult, ConfigurationError> {
    params.validate_structure()?;

    let population_size = params.ga.population_size;
    let generations = params.ga.generations;
    let tournament_size = params.ga.tournament_size;
    let check_interval = params.ga.generation_check_interval;

    let objective = ReserveObjective::new(params);
    let mut monitor_rng = StdRng::seed_from_u64(rng.gen());

    if population_size % 2 == 1 {
        warn!(
            population_size,
            "Odd population size, one tournament winner is carried over unchanged each generation."
        );
    }
    info!(
        population_size,
        generations,
        months = params.num_months,
        "Starting plan evolution."
    );

    let mut population = initialize_population(params, rng)?;
    let mut generation_summaries = Vec::new();

    for generation in 1..=generations {
        let mut next_generation: Population = Vec::with_capacity(population_size);

        for _ in 0..population_size / 2 {
            let (parent_1, parent_2) =
                select_parents(&population, tournament_size, &objective, rng)?;
            let (child_1, child_2) = generate_offspring_pair(parent_1, parent_2, params, rng);
            next_generation.push(child_1);
            next_generation.push(child_2);
        }
        if population_size % 2 == 1 {
            let carried = tournament_selection(&population, tournament_size, &objective, rng)?;
            next_generation.push(carried.clone());
        }

        population = next_generation;
        debug!(generation, "Generation complete.");

        if check_interval > 0 && generation % check_interval == 0 {
            let summary =
                summarize_generation(generation, &population, &objective, &mut monitor_rng);
            info!(
                generation,
                feasible = summary.feasible_count,
                best_reserve = ?summary.best_reserve,
                mean_reserve = ?summary.mean_reserve,
                "Generation snapshot."
            );
            generation_summaries.push(summary);
        }
    }

    // --- Final Evaluation After the Loop ---
    let final_costs: Vec<PlanCost> = population
        .iter()
        .map(|plan| objective.evaluate(plan, rng))
        .collect();
    let (best_index, best_cost) = final_costs
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .ok_or_else(|| {
            ConfigurationError::BadPopulationParameter("Final population is empty".into())
        })?;
    let best_plan = population[best_index].clone();
    let reported_cost = objective.evaluate(&best_plan, rng);

    let reserves = feasible_reserves(&final_costs);
    let final_summary = FinalPopulationSummary {
        population_size: population.len(),
        feasible_count: reserves.len(),
        best_reserve: best_cost.reserve(),
        population_average_reserve: ArithmeticMean.value(&reserves).ok(),
    };

    if reserves.is_empty() {
        warn!("No feasible plan in the final population; returning the least bad one.");
    }
    info!(
        feasible = final_summary.feasible_count,
        best_reserve = ?final_summary.best_reserve,
        "Plan evolution finished."
    );

    Ok(EvolutionResult {
        best_plan,
        best_cost,
        reported_cost,
        generation_summaries,
        final_summary,
    })
}

/// Runs the GA with the random source dictated by `ga.global_seed`
/// (OS entropy when no seed is configured).
pub fn run(params: &PlanParameters) -> Result<EvolutionResult, ConfigurationError> {
    let mut rng = match params.ga.global_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    evolve_plans(params, &mut rng)
}
