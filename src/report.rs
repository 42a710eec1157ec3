use crate::evolution::{EvolutionResult, InfeasibilityReason, PlanCost};
use crate::plan::{MonthAllocation, Plan};
use itertools::Itertools;

fn render_month(month_number: usize, month: &MonthAllocation) -> String {
    format!(
        "Month {}:\n  Essential spending: {:.2}\n  Discretionary spending: {:.2}\n  Fixed income: {:.2}\n  Variable income: {:.2}\n  Treasury: {:.2}",
        month_number,
        month.essential,
        month.discretionary,
        month.fixed_income,
        month.variable_income,
        month.treasury
    )
}

fn describe(reason: &InfeasibilityReason) -> String {
    match reason {
        InfeasibilityReason::EssentialOutOfBounds { month } => {
            format!("essential spending out of bounds in month {month}")
        }
        InfeasibilityReason::DiscretionaryOutOfBounds { month } => {
            format!("discretionary spending out of bounds in month {month}")
        }
        InfeasibilityReason::ReserveOutOfBounds { month, reserve } => {
            format!("reserve of {reserve:.2} out of bounds in month {month}")
        }
        InfeasibilityReason::SpendExceedsIncome { month } => {
            format!("spending exceeds income in month {month}")
        }
        InfeasibilityReason::EmergencyExceedsReserve { emergency, reserve } => {
            format!("emergency of {emergency:.2} exceeds the remaining reserve of {reserve:.2}")
        }
        InfeasibilityReason::TargetNotReached { reserve } => {
            format!("final reserve of {reserve:.2} is below the target")
        }
    }
}

pub fn render_cost(cost: &PlanCost) -> String {
    match cost {
        PlanCost::Feasible { reserve } => format!("Total reserve: {reserve:.2}"),
        PlanCost::Infeasible(reason) => format!("Infeasible plan: {}", describe(reason)),
    }
}

/// Month-by-month listing of `plan` followed by its cost.
pub fn render_plan(plan: &Plan, cost: &PlanCost) -> String {
    let months = plan
        .iter()
        .enumerate()
        .map(|(idx, month)| render_month(idx + 1, month))
        .join("\n");
    format!("{}\n{}", months, render_cost(cost))
}

pub fn render_result(result: &EvolutionResult) -> String {
    let mut rendered = render_plan(&result.best_plan, &result.reported_cost);
    if !result.is_feasible() {
        rendered.push_str("\nNo feasible plan was found within the generation budget.");
    }
    rendered
}
