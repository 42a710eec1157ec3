use crate::config::{ConfigurationError, PlanParameters};
use crate::evolution::fitness::PlanObjective;
use crate::plan::Plan;
use crate::sampling::{sample_discretionary, sample_essential, split_leftover};
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks `k` distinct plans at random and returns the one with the lowest cost.
///
/// Every contestant is evaluated afresh, so a plan that won one tournament
/// may lose the next on the same population.
pub fn tournament_selection<'p, O, R>(
    population: &'p [Plan],
    k: usize,
    objective: &O,
    rng: &mut R,
) -> Result<&'p Plan, ConfigurationError>
where
    O: PlanObjective,
    R: Rng + ?Sized,
{
    let contestants: Vec<&Plan> = population.choose_multiple(rng, k).collect();

    contestants
        .into_iter()
        .map(|plan| (plan, objective.evaluate(plan, rng)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(plan, _)| plan)
        .ok_or_else(|| {
            ConfigurationError::BadPopulationParameter(format!(
                "Tournament selection failed: No contestants selected (k={}, population_size={})",
                k,
                population.len()
            ))
        })
}

pub fn select_parents<'p, O, R>(
    population: &'p [Plan],
    k: usize,
    objective: &O,
    rng: &mut R,
) -> Result<(&'p Plan, &'p Plan), ConfigurationError>
where
    O: PlanObjective,
    R: Rng + ?Sized,
{
    let parent_1 = tournament_selection(population, k, objective, rng)?;
    let parent_2 = tournament_selection(population, k, objective, rng)?;
    Ok((parent_1, parent_2))
}

/// Single-point crossover at `cut`: months before the cut come from one
/// parent, the rest from the other.
pub fn crossover_at(parent_1: &Plan, parent_2: &Plan, cut: usize) -> (Plan, Plan) {
    debug_assert_eq!(parent_1.len(), parent_2.len());
    let (head_1, tail_1) = parent_1.months().split_at(cut);
    let (head_2, tail_2) = parent_2.months().split_at(cut);

    let child_1 = Plan::new(head_1.iter().chain(tail_2).copied().collect());
    let child_2 = Plan::new(head_2.iter().chain(tail_1).copied().collect());
    (child_1, child_2)
}

/// Single-point crossover with the cut drawn from `1..len`.
/// Plans shorter than two months have no cut point and are copied.
pub fn crossover<R: Rng + ?Sized>(parent_1: &Plan, parent_2: &Plan, rng: &mut R) -> (Plan, Plan) {
    if parent_1.len() < 2 {
        return (parent_1.clone(), parent_2.clone());
    }
    let cut = rng.gen_range(1..parent_1.len());
    crossover_at(parent_1, parent_2, cut)
}

/// Per month, three independent coin flips at `mutation_rate`: redraw the
/// essential spend, redraw the discretionary spend, re-split the leftover.
pub fn mutate<R: Rng + ?Sized>(plan: &mut Plan, params: &PlanParameters, rng: &mut R) {
    let mutation_rate = params.ga.mutation_rate;

    for month in plan.months_mut() {
        if rng.gen_bool(mutation_rate) {
            month.essential = sample_essential(params, rng);
        }
        if rng.gen_bool(mutation_rate) {
            month.discretionary = sample_discretionary(params, rng);
        }
        if rng.gen_bool(mutation_rate) {
            split_leftover(month, params, rng);
        }
    }
}

/// Produces two children from two parents: crossover with probability
/// `crossover_rate`, then mutation of both children.
pub fn generate_offspring_pair<R: Rng + ?Sized>(
    parent_1: &Plan,
    parent_2: &Plan,
    params: &PlanParameters,
    rng: &mut R,
) -> (Plan, Plan) {
    let (mut child_1, mut child_2) = if rng.gen_bool(params.ga.crossover_rate) {
        crossover(parent_1, parent_2, rng)
    } else {
        (parent_1.clone(), parent_2.clone())
    };

    mutate(&mut child_1, params, rng);
    mutate(&mut child_2, params, rng);
    (child_1, child_2)
}
