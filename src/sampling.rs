//! Constrained generation of monthly allocations.
//!
//! Spend fields are drawn directly inside their configured bounds and the
//! leftover is clamped to the reserve ceiling before being split across the
//! three instruments, so sampling never retries.

use crate::config::PlanParameters;
use crate::plan::{MonthAllocation, Plan};
use rand::Rng;

pub fn sample_essential<R: Rng + ?Sized>(params: &PlanParameters, rng: &mut R) -> f64 {
    let income = params.total_income();
    rng.gen_range(params.essential.lower(income)..=params.essential.upper(income))
}

pub fn sample_discretionary<R: Rng + ?Sized>(params: &PlanParameters, rng: &mut R) -> f64 {
    let income = params.total_income();
    rng.gen_range(params.discretionary.lower(income)..=params.discretionary.upper(income))
}

/// Re-splits what is left of the income after the month's spend fields.
///
/// The leftover is clamped to `[0, reserve.max * income]`; anything above the
/// ceiling is dropped rather than redistributed.
pub fn split_leftover<R: Rng + ?Sized>(
    month: &mut MonthAllocation,
    params: &PlanParameters,
    rng: &mut R,
) {
    let income = params.total_income();
    let mut leftover = (income - month.total_spend()).clamp(0., params.reserve.upper(income));

    month.fixed_income = rng.gen_range(0.0..=leftover);
    leftover -= month.fixed_income;
    month.variable_income = rng.gen_range(0.0..=leftover);
    month.treasury = leftover - month.variable_income;
}

pub fn sample_month<R: Rng + ?Sized>(params: &PlanParameters, rng: &mut R) -> MonthAllocation {
    let mut month = MonthAllocation {
        essential: sample_essential(params, rng),
        discretionary: sample_discretionary(params, rng),
        fixed_income: 0.,
        variable_income: 0.,
        treasury: 0.,
    };
    split_leftover(&mut month, params, rng);
    month
}

pub fn sample_plan<R: Rng + ?Sized>(params: &PlanParameters, rng: &mut R) -> Plan {
    Plan::new(
        (0..params.num_months)
            .map(|_| sample_month(params, rng))
            .collect(),
    )
}
