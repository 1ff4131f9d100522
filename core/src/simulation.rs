//! Running one combination for a fixed number of months.

use crate::{
    combination::ParameterCombination,
    company_model::{CompanyModel, RiskModel},
    error::SimResult,
    order_model::OrderModel,
    rng::LcgStream,
    types::Seed,
};
use serde::{Deserialize, Serialize};

/// Result of one simulated month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthOutcome {
    pub profit: f64,
    pub clients: u32,
    /// Never exceeds `clients`.
    pub successes: u32,
}

/// The ordered month series of one run plus the final cumulative money.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub final_amount: f64,
    pub series: Vec<MonthOutcome>,
}

impl RunOutcome {
    pub fn profits(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().map(|m| m.profit)
    }

    /// Number of distinct profit values in the series.
    pub fn distinct_profit_count(&self) -> usize {
        let mut profits: Vec<f64> = self.profits().collect();
        profits.sort_by(f64::total_cmp);
        profits.dedup_by(|a, b| a.to_bits() == b.to_bits());
        profits.len()
    }

    /// A series with fewer than two distinct profits cannot be compared.
    pub fn has_variation(&self) -> bool {
        self.distinct_profit_count() >= 2
    }

    pub fn mean_profit(&self) -> Option<f64> {
        if self.series.is_empty() {
            return None;
        }
        Some(self.profits().sum::<f64>() / self.series.len() as f64)
    }
}

/// Build the company model a combination describes, around a fresh stream.
pub fn build_company(combination: &ParameterCombination, seed: Seed) -> SimResult<CompanyModel> {
    let order = OrderModel::new(combination.mean_order_cost, combination.order_std_dev)?;
    let risk = match combination.risk_shape() {
        Some((alpha, beta)) => RiskModel::Fixed { alpha, beta },
        None => RiskModel::Dynamic,
    };
    CompanyModel::new(LcgStream::new(seed), combination.employees, combination.salary, order, risk)
}

/// Simulate `iterations` months of one combination from `seed`.
pub fn simulate(combination: &ParameterCombination, seed: Seed, iterations: u32) -> SimResult<RunOutcome> {
    let mut company = build_company(combination, seed)?;
    let mut series = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        series.push(company.simulate_month(combination.average_clients)?);
    }
    Ok(RunOutcome {
        final_amount: company.amount_money(),
        series,
    })
}
