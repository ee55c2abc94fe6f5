use serde::{Deserialize, Serialize};

/// Minutes each job is assumed to run per pipeline execution.
pub const DEFAULT_MINUTES_PER_JOB: f64 = 5.0;
/// Linux hosted runner price per minute in USD.
pub const DEFAULT_PRICE_PER_MINUTE: f64 = 0.008;
/// Pipeline executions assumed per month.
pub const DEFAULT_RUNS_PER_MONTH: f64 = 200.0;

/// Fixed per-job cost model.
///
/// This is an order-of-magnitude estimator. It ignores step content and real
/// durations, so every job costs the same.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub minutes_per_job: f64,
    pub price_per_minute: f64,
    pub runs_per_month: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            minutes_per_job: DEFAULT_MINUTES_PER_JOB,
            price_per_minute: DEFAULT_PRICE_PER_MINUTE,
            runs_per_month: DEFAULT_RUNS_PER_MONTH,
        }
    }
}

impl CostModel {
    /// Estimated monthly compute spend for a pipeline with `job_count` jobs.
    pub fn monthly_cost(&self, job_count: usize) -> f64 {
        job_count as f64 * self.minutes_per_job * self.price_per_minute * self.runs_per_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_monthly_cost() {
        let model = CostModel::default();
        assert_eq!(model.monthly_cost(0), 0.0);
        assert_eq!(model.monthly_cost(1), 1.0 * 5.0 * 0.008 * 200.0);
        assert_eq!(model.monthly_cost(3), 3.0 * 5.0 * 0.008 * 200.0);
        assert!((model.monthly_cost(1) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_model() {
        let model = CostModel {
            minutes_per_job: 10.0,
            price_per_minute: 0.016,
            runs_per_month: 100.0,
        };
        assert!((model.monthly_cost(2) - 32.0).abs() < 1e-9);
    }
}
