/// Tolerance used when comparing accumulated floating point amounts.
pub const FLOAT_COMPARISON_EPSILON: f64 = 1e-9;

/// Inclusive range for the number of emergencies simulated per plan.
pub const EMERGENCY_COUNT_MIN: usize = 1;
pub const EMERGENCY_COUNT_MAX: usize = 3;

/// Emergency cost as a fraction of monthly income, drawn uniformly.
pub const EMERGENCY_COST_MIN_FRACTION: f64 = 0.1;
pub const EMERGENCY_COST_MAX_FRACTION: f64 = 0.3;

/// Environment variable holding the path to a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "RESERVE_PLANNER_CONFIG";
