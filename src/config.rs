use crate::consts::FLOAT_COMPARISON_EPSILON;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("max essential + max discretionary + max reserve fractions sum to {total}, which exceeds 1.0")]
    FractionBudgetExceeded { total: f64 },
    #[error("invalid {category} bounds: min = {min}, max = {max} (expected 0 <= min <= max <= 1)")]
    InvalidBounds {
        category: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Invalid population parameters were passed: {0}")]
    BadPopulationParameter(String),
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("risk coefficient for {instrument} must be finite and non-negative, got {value}")]
    NegativeRisk { instrument: &'static str, value: f64 },
    #[error("monthly income must be finite and positive, got {0}")]
    InvalidIncome(f64),
    #[error("reserve target must be finite and non-negative, got {0}")]
    InvalidReserveTarget(f64),
    #[error("planning horizon must span at least one month")]
    InvalidHorizon,
    #[error("failed to read configuration file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
}

/// Monthly income, either as a single figure or split into its sources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MonthlyIncome {
    Total(f64),
    Components {
        fixed_salary: f64,
        investment_returns: f64,
        other_income: f64,
    },
}

impl MonthlyIncome {
    pub fn total(&self) -> f64 {
        match self {
            MonthlyIncome::Total(total) => *total,
            MonthlyIncome::Components {
                fixed_salary,
                investment_returns,
                other_income,
            } => fixed_salary + investment_returns + other_income,
        }
    }
}

/// Inclusive bounds expressed as fractions of monthly income.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FractionBounds {
    pub min: f64,
    pub max: f64,
}

impl FractionBounds {
    pub fn new(min: f64, max: f64) -> Self {
        FractionBounds { min, max }
    }

    pub fn lower(&self, income: f64) -> f64 {
        self.min * income
    }

    pub fn upper(&self, income: f64) -> f64 {
        self.max * income
    }

    /// Inclusive check, tolerant to rounding left over from splitting amounts.
    pub fn contains(&self, amount: f64, income: f64) -> bool {
        self.lower(income) - FLOAT_COMPARISON_EPSILON <= amount
            && amount <= self.upper(income) + FLOAT_COMPARISON_EPSILON
    }

    fn check(&self, category: &'static str) -> Result<(), ConfigurationError> {
        let ordered = 0.0 <= self.min && self.min <= self.max && self.max <= 1.0;
        if !ordered || !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigurationError::InvalidBounds {
                category,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Standard deviation of the multiplicative return noise, per instrument.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RiskCoefficients {
    pub fixed_income: f64,
    pub variable_income: f64,
    pub treasury: f64,
}

impl RiskCoefficients {
    pub fn zero() -> Self {
        RiskCoefficients {
            fixed_income: 0.,
            variable_income: 0.,
            treasury: 0.,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GaSettings {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub tournament_size: usize,
    /// Record a monitoring snapshot every N generations. Zero disables snapshots.
    pub generation_check_interval: usize,
    pub global_seed: Option<u64>,
}

impl Default for GaSettings {
    fn default() -> Self {
        GaSettings {
            population_size: 100,
            generations: 50,
            mutation_rate: 0.1,
            crossover_rate: 0.5,
            tournament_size: 3,
            generation_check_interval: 10,
            global_seed: None,
        }
    }
}

/// Every parameter of a planning run. Built once and only ever borrowed afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlanParameters {
    pub income: MonthlyIncome,
    pub num_months: usize,
    pub reserve_target: f64,
    pub essential: FractionBounds,
    pub discretionary: FractionBounds,
    /// Bounds on the monthly amount sent to the three instruments.
    pub reserve: FractionBounds,
    pub risk: RiskCoefficients,
    #[serde(flatten)]
    pub ga: GaSettings,
}

impl Default for PlanParameters {
    fn default() -> Self {
        PlanParameters {
            income: MonthlyIncome::Components {
                fixed_salary: 5000.,
                investment_returns: 500.,
                other_income: 200.,
            },
            num_months: 12,
            reserve_target: 10_000.,
            essential: FractionBounds::new(0.3, 0.5),
            discretionary: FractionBounds::new(0.0, 0.2),
            reserve: FractionBounds::new(0.1, 0.3),
            risk: RiskCoefficients {
                fixed_income: 0.01,
                variable_income: 0.05,
                treasury: 0.02,
            },
            ga: GaSettings::default(),
        }
    }
}

impl PlanParameters {
    pub fn total_income(&self) -> f64 {
        self.income.total()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Full validation, as performed before a run is started from configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_structure()?;

        let total = self.essential.max + self.discretionary.max + self.reserve.max;
        if total > 1.0 + FLOAT_COMPARISON_EPSILON {
            return Err(ConfigurationError::FractionBudgetExceeded { total });
        }
        Ok(())
    }

    /// The subset of checks the engine needs to run without panicking.
    pub fn validate_structure(&self) -> Result<(), ConfigurationError> {
        let income = self.total_income();
        if !income.is_finite() || income <= 0. {
            return Err(ConfigurationError::InvalidIncome(income));
        }
        if !self.reserve_target.is_finite() || self.reserve_target < 0. {
            return Err(ConfigurationError::InvalidReserveTarget(
                self.reserve_target,
            ));
        }
        if self.num_months == 0 {
            return Err(ConfigurationError::InvalidHorizon);
        }

        self.essential.check("essential")?;
        self.discretionary.check("discretionary")?;
        self.reserve.check("reserve")?;

        for (instrument, value) in [
            ("fixed income", self.risk.fixed_income),
            ("variable income", self.risk.variable_income),
            ("treasury", self.risk.treasury),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(ConfigurationError::NegativeRisk { instrument, value });
            }
        }

        let ga = &self.ga;
        if ga.population_size == 0 {
            return Err(ConfigurationError::BadPopulationParameter(
                "Population size cannot be zero".into(),
            ));
        }
        if ga.tournament_size == 0 || ga.tournament_size > ga.population_size {
            return Err(ConfigurationError::BadPopulationParameter(format!(
                "Tournament size must be between 1 and the population size ({}), got {}",
                ga.population_size, ga.tournament_size
            )));
        }
        for (name, value) in [
            ("mutation_rate", ga.mutation_rate),
            ("crossover_rate", ga.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}
