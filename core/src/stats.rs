//! Summary statistics over one run's month series.

use crate::simulation::RunOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub months: usize,
    pub mean_profit: f64,
    pub std_dev_profit: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    pub percentile_10: f64,
    pub percentile_50: f64,
    pub percentile_90: f64,
    pub mean_clients: f64,
    /// Successful orders over all clients; 0 when there were no clients.
    pub success_rate: f64,
    pub final_amount: f64,
}

impl OutcomeSummary {
    /// None for an empty series.
    pub fn from_outcome(outcome: &RunOutcome) -> Option<Self> {
        if outcome.series.is_empty() {
            return None;
        }
        let n = outcome.series.len() as f64;

        let mut profits: Vec<f64> = outcome.profits().collect();
        profits.sort_by(f64::total_cmp);

        let mean_profit = profits.iter().sum::<f64>() / n;
        let variance = profits.iter().map(|p| (p - mean_profit).powi(2)).sum::<f64>() / n;

        let total_clients: u64 = outcome.series.iter().map(|m| m.clients as u64).sum();
        let total_successes: u64 = outcome.series.iter().map(|m| m.successes as u64).sum();
        let success_rate = if total_clients > 0 {
            total_successes as f64 / total_clients as f64
        } else {
            0.0
        };

        Some(Self {
            months: profits.len(),
            mean_profit,
            std_dev_profit: variance.sqrt(),
            min_profit: profits[0],
            max_profit: profits[profits.len() - 1],
            percentile_10: percentile(&profits, 10.0),
            percentile_50: percentile(&profits, 50.0),
            percentile_90: percentile(&profits, 90.0),
            mean_clients: total_clients as f64 / n,
            success_rate,
            final_amount: outcome.final_amount,
        })
    }
}

/// Percentile of an already sorted, non-empty slice: the element at the
/// linear rank `p / 100 * (n - 1)`, rounded to the nearest index.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let index = ((p / 100.0) * (sorted.len() as f64 - 1.0)).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
