pub mod aggregator;
pub mod fitness;
pub mod operators;
pub mod plan_evolution;

pub use fitness::{evaluate, InfeasibilityReason, PlanCost, PlanObjective, ReserveObjective};
pub use plan_evolution::{
    evolve_plans, initialize_population, run, EvolutionResult, FinalPopulationSummary,
    GenerationSummary,
};
