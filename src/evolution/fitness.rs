use crate::config::{PlanParameters, RiskCoefficients};
use crate::consts::{
    EMERGENCY_COST_MAX_FRACTION, EMERGENCY_COST_MIN_FRACTION, EMERGENCY_COUNT_MAX,
    EMERGENCY_COUNT_MIN, FLOAT_COMPARISON_EPSILON,
};
use crate::plan::Plan;
use itertools::izip;
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::cmp::Ordering;

/// Why a plan was rejected. Month numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InfeasibilityReason {
    EssentialOutOfBounds { month: usize },
    DiscretionaryOutOfBounds { month: usize },
    ReserveOutOfBounds { month: usize, reserve: f64 },
    SpendExceedsIncome { month: usize },
    EmergencyExceedsReserve { emergency: f64, reserve: f64 },
    TargetNotReached { reserve: f64 },
}

/// Outcome of one (noisy) evaluation of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlanCost {
    Feasible { reserve: f64 },
    Infeasible(InfeasibilityReason),
}

impl PlanCost {
    /// Scalar cost to minimize: the negated reserve, or +inf for infeasible plans.
    pub fn value(&self) -> f64 {
        match self {
            PlanCost::Feasible { reserve } => -reserve,
            PlanCost::Infeasible(_) => f64::INFINITY,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, PlanCost::Feasible { .. })
    }

    pub fn reserve(&self) -> Option<f64> {
        match self {
            PlanCost::Feasible { reserve } => Some(*reserve),
            PlanCost::Infeasible(_) => None,
        }
    }

    pub fn total_cmp(&self, other: &PlanCost) -> Ordering {
        self.value().total_cmp(&other.value())
    }
}

/// Anything able to score a whole plan. Scores may be stochastic, so callers
/// must not assume two calls on the same plan agree.
pub trait PlanObjective {
    fn evaluate<R: Rng + ?Sized>(&self, plan: &Plan, rng: &mut R) -> PlanCost;
}

/// Zero-mean multiplicative return noise for each instrument.
/// An instrument with a zero risk coefficient is left untouched.
#[derive(Debug, Clone)]
struct ReturnNoise {
    fixed_income: Option<Normal>,
    variable_income: Option<Normal>,
    treasury: Option<Normal>,
}

impl ReturnNoise {
    fn new(risk: &RiskCoefficients) -> Self {
        let factor = |sigma: f64| {
            if sigma > 0. {
                Normal::new(0., sigma).ok()
            } else {
                None
            }
        };
        ReturnNoise {
            fixed_income: factor(risk.fixed_income),
            variable_income: factor(risk.variable_income),
            treasury: factor(risk.treasury),
        }
    }
}

fn perturb<R: Rng + ?Sized>(amount: f64, noise: &Option<Normal>, rng: &mut R) -> f64 {
    match noise {
        Some(normal) => amount * (1. + normal.sample(rng)),
        None => amount,
    }
}

/// The accumulated-reserve objective: monthly bound checks under return noise,
/// followed by a handful of random emergencies.
#[derive(Debug, Clone)]
pub struct ReserveObjective<'a> {
    params: &'a PlanParameters,
    noise: ReturnNoise,
}

impl<'a> ReserveObjective<'a> {
    pub fn new(params: &'a PlanParameters) -> Self {
        ReserveObjective {
            params,
            noise: ReturnNoise::new(&params.risk),
        }
    }

    pub fn params(&self) -> &PlanParameters {
        self.params
    }
}

impl PlanObjective for ReserveObjective<'_> {
    fn evaluate<R: Rng + ?Sized>(&self, plan: &Plan, rng: &mut R) -> PlanCost {
        let params = self.params;
        let income = params.total_income();
        let mut total_reserve = 0.;

        for (idx, month) in plan.iter().enumerate() {
            let month_number = idx + 1;
            let total_spend = month.total_spend();

            let reserve: f64 = izip!(
                [month.fixed_income, month.variable_income, month.treasury],
                [
                    &self.noise.fixed_income,
                    &self.noise.variable_income,
                    &self.noise.treasury
                ]
            )
            .map(|(amount, noise)| perturb(amount, noise, rng))
            .sum();

            // Spend bounds look at the plan as written, the reserve bound at the noisy outcome.
            if !params.essential.contains(month.essential, income) {
                return PlanCost::Infeasible(InfeasibilityReason::EssentialOutOfBounds {
                    month: month_number,
                });
            }
            if !params.discretionary.contains(month.discretionary, income) {
                return PlanCost::Infeasible(InfeasibilityReason::DiscretionaryOutOfBounds {
                    month: month_number,
                });
            }
            if !params.reserve.contains(reserve, income) {
                return PlanCost::Infeasible(InfeasibilityReason::ReserveOutOfBounds {
                    month: month_number,
                    reserve,
                });
            }
            if total_spend > income + FLOAT_COMPARISON_EPSILON {
                return PlanCost::Infeasible(InfeasibilityReason::SpendExceedsIncome {
                    month: month_number,
                });
            }

            total_reserve += reserve;
        }

        let emergencies = rng.gen_range(EMERGENCY_COUNT_MIN..=EMERGENCY_COUNT_MAX);
        for _ in 0..emergencies {
            let emergency =
                rng.gen_range(EMERGENCY_COST_MIN_FRACTION..=EMERGENCY_COST_MAX_FRACTION) * income;
            if emergency > total_reserve {
                return PlanCost::Infeasible(InfeasibilityReason::EmergencyExceedsReserve {
                    emergency,
                    reserve: total_reserve,
                });
            }
            total_reserve -= emergency;
        }

        if total_reserve < params.reserve_target {
            return PlanCost::Infeasible(InfeasibilityReason::TargetNotReached {
                reserve: total_reserve,
            });
        }
        PlanCost::Feasible {
            reserve: total_reserve,
        }
    }
}

/// Scores `plan` once against `params`.
pub fn evaluate<R: Rng + ?Sized>(plan: &Plan, params: &PlanParameters, rng: &mut R) -> PlanCost {
    ReserveObjective::new(params).evaluate(plan, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FractionBounds, MonthlyIncome};
    use crate::plan::MonthAllocation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> PlanParameters {
        PlanParameters {
            income: MonthlyIncome::Total(1000.),
            num_months: 3,
            reserve_target: 100.,
            essential: FractionBounds::new(0.3, 0.5),
            discretionary: FractionBounds::new(0.0, 0.2),
            reserve: FractionBounds::new(0.0, 0.7),
            risk: RiskCoefficients::zero(),
            ..PlanParameters::default()
        }
    }

    fn month(essential: f64, discretionary: f64, invested: [f64; 3]) -> MonthAllocation {
        MonthAllocation {
            essential,
            discretionary,
            fixed_income: invested[0],
            variable_income: invested[1],
            treasury: invested[2],
        }
    }

    fn good_month() -> MonthAllocation {
        month(400., 100., [200., 200., 100.])
    }

    #[test]
    fn test_feasible_plan_without_noise() {
        let params = params();
        let plan = Plan::new(vec![good_month(); 3]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let cost = evaluate(&plan, &params, &mut rng);
            let reserve = cost.reserve().expect("plan should be feasible");
            // 1500 invested, between 1 x 100 and 3 x 300 lost to emergencies.
            assert!((600. - 1e-6..=1400. + 1e-6).contains(&reserve), "Got {}", reserve);
            assert!((cost.value() + reserve).abs() < FLOAT_COMPARISON_EPSILON);
        }
    }

    #[test]
    fn test_spend_violations_are_infeasible_for_any_seed() {
        let mut params = params();
        params.risk = RiskCoefficients {
            fixed_income: 0.3,
            variable_income: 0.3,
            treasury: 0.3,
        };
        let essential_plan = Plan::new(vec![month(600., 0., [100., 100., 100.]), good_month()]);
        let discretionary_plan = Plan::new(vec![month(400., 250., [100., 100., 100.])]);

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cost = evaluate(&essential_plan, &params, &mut rng);
            assert_eq!(
                cost,
                PlanCost::Infeasible(InfeasibilityReason::EssentialOutOfBounds { month: 1 })
            );
            let cost = evaluate(&discretionary_plan, &params, &mut rng);
            assert_eq!(
                cost,
                PlanCost::Infeasible(InfeasibilityReason::DiscretionaryOutOfBounds { month: 1 })
            );
            assert_eq!(cost.value(), f64::INFINITY);
        }
    }

    #[test]
    fn test_reserve_bound_uses_noisy_amounts() {
        // Investing exactly the ceiling is fine without noise...
        let mut params = params();
        let plan = Plan::new(vec![month(300., 0., [300., 300., 100.]); 2]);
        params.reserve_target = 0.;
        let mut rng = StdRng::seed_from_u64(9);
        assert!(evaluate(&plan, &params, &mut rng).is_feasible());

        // ...but upward noise pushes it above the ceiling on some evaluations.
        params.risk.variable_income = 0.2;
        let breaches = (0..200)
            .map(|_| evaluate(&plan, &params, &mut rng))
            .filter(|cost| {
                matches!(
                    cost,
                    PlanCost::Infeasible(InfeasibilityReason::ReserveOutOfBounds { month: 1, .. })
                )
            })
            .count();
        assert!(breaches > 0);
    }

    #[test]
    fn test_reserve_floor_is_enforced() {
        let mut params = params();
        params.reserve = FractionBounds::new(0.6, 0.7);
        let plan = Plan::new(vec![good_month()]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            evaluate(&plan, &params, &mut rng),
            PlanCost::Infeasible(InfeasibilityReason::ReserveOutOfBounds { month: 1, .. })
        ));
    }

    #[test]
    fn test_spend_above_income_is_infeasible() {
        let mut params = params();
        params.essential = FractionBounds::new(0.0, 1.0);
        params.discretionary = FractionBounds::new(0.0, 1.0);
        let plan = Plan::new(vec![month(700., 400., [0., 0., 0.])]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            evaluate(&plan, &params, &mut rng),
            PlanCost::Infeasible(InfeasibilityReason::SpendExceedsIncome { month: 1 })
        );
    }

    #[test]
    fn test_emergency_larger_than_reserve() {
        let mut params = params();
        params.reserve_target = 0.;
        // 50 saved, while the smallest emergency costs 100.
        let plan = Plan::new(vec![month(400., 200., [50., 0., 0.])]);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            evaluate(&plan, &params, &mut rng),
            PlanCost::Infeasible(InfeasibilityReason::EmergencyExceedsReserve { .. })
        ));
    }

    #[test]
    fn test_reserve_target_not_reached() {
        let mut params = params();
        params.reserve_target = 10_000.;
        let plan = Plan::new(vec![good_month(); 3]);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            evaluate(&plan, &params, &mut rng),
            PlanCost::Infeasible(InfeasibilityReason::TargetNotReached { .. })
        ));
    }

    #[test]
    fn test_repeated_evaluations_are_not_cached() {
        let mut params = params();
        params.risk.variable_income = 0.05;
        params.reserve = FractionBounds::new(0.0, 0.7);
        let plan = Plan::new(vec![good_month(); 3]);
        let objective = ReserveObjective::new(&params);
        let mut rng = StdRng::seed_from_u64(21);

        let reserves: Vec<f64> = (0..20)
            .filter_map(|_| objective.evaluate(&plan, &mut rng).reserve())
            .collect();
        assert!(reserves.len() > 1);
        assert!(reserves.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn test_cost_ordering_puts_infeasible_last() {
        let good = PlanCost::Feasible { reserve: 500. };
        let better = PlanCost::Feasible { reserve: 800. };
        let bad = PlanCost::Infeasible(InfeasibilityReason::TargetNotReached { reserve: 10. });
        assert_eq!(better.total_cmp(&good), Ordering::Less);
        assert_eq!(good.total_cmp(&bad), Ordering::Less);
    }
}
