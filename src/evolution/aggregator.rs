use thiserror::Error;

/// Reduces a series (here, reserves of feasible plans) to a single f64.
pub trait Aggregator {
    fn value(&self, series: &[f64]) -> Result<f64, AggregatorError>;
}

#[derive(Error, Debug, PartialEq)]
pub enum AggregatorError {
    #[error("Number of periods is invalid for aggregator: `{0}`")]
    InvalidNumberOfPeriods(String),
}

pub struct ArithmeticMean;
impl Aggregator for ArithmeticMean {
    fn value(&self, series: &[f64]) -> Result<f64, AggregatorError> {
        if series.is_empty() {
            return Err(AggregatorError::InvalidNumberOfPeriods(
                "Mean cannot be computed for an empty series.".into(),
            ));
        }
        Ok(series.iter().sum::<f64>() / (series.len() as f64))
    }
}

pub struct StandardDeviation;
impl Aggregator for StandardDeviation {
    fn value(&self, series: &[f64]) -> Result<f64, AggregatorError> {
        if series.len() <= 1 {
            return Err(AggregatorError::InvalidNumberOfPeriods(
                "Standard deviation cannot be computed for series with less than 2 elements."
                    .into(),
            ));
        }
        let number_of_periods = series.len() as f64;
        let mean = ArithmeticMean.value(series)?;
        let variance =
            series.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (number_of_periods - 1.);
        Ok(variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FLOAT_COMPARISON_EPSILON;

    #[test]
    fn test_mean_and_sample_standard_deviation() {
        let series = [2., 4., 4., 4., 5., 5., 7., 9.];
        assert!((ArithmeticMean.value(&series).unwrap() - 5.).abs() < FLOAT_COMPARISON_EPSILON);
        let expected = (32f64 / 7.).sqrt();
        assert!((StandardDeviation.value(&series).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_short_series_are_rejected() {
        assert!(ArithmeticMean.value(&[]).is_err());
        assert!(StandardDeviation.value(&[1.]).is_err());
    }
}
