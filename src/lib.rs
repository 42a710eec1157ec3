// Modules
pub mod config;
pub mod consts;
pub mod evolution;
pub mod plan;
pub mod report;
pub mod sampling;

pub use config::{ConfigurationError, PlanParameters};
pub use evolution::{evolve_plans, run, EvolutionResult, PlanCost};
pub use plan::{MonthAllocation, Plan, Population};
