//! Cartesian parameter sweep.
//!
//! Combinations are enumerated in nested order: employees varies
//! slowest, beta fastest. The sweep is a plain value; `iter()` can be
//! called any number of times and always yields the same sequence.

use crate::{
    combination::{ParamField, ParameterCombination},
    error::{SimError, SimResult},
    types::CombinationId,
};
use serde::{Deserialize, Serialize};

/// Sweeps larger than this are allowed but logged.
pub const LARGE_SWEEP_WARNING: usize = 100_000;

/// One ordered value list per tunable parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterLists {
    #[serde(alias = "Employees")]
    pub employees: Vec<u32>,
    #[serde(alias = "Salary")]
    pub salary: Vec<f64>,
    #[serde(alias = "AverageClientsMonth")]
    pub average_clients: Vec<u32>,
    #[serde(alias = "MeanCostOrder")]
    pub mean_order_cost: Vec<f64>,
    #[serde(alias = "OrderStdDev")]
    pub order_std_dev: Vec<f64>,
    #[serde(default, alias = "Alpha")]
    pub alpha: Vec<u32>,
    #[serde(default, alias = "Beta")]
    pub beta: Vec<u32>,
}

impl ParameterLists {
    /// Number of values given for a field. Omitted risk shapes count as 0.
    pub fn len_of(&self, field: ParamField) -> usize {
        match field {
            ParamField::Employees => self.employees.len(),
            ParamField::Salary => self.salary.len(),
            ParamField::AverageClients => self.average_clients.len(),
            ParamField::MeanOrderCost => self.mean_order_cost.len(),
            ParamField::OrderStdDev => self.order_std_dev.len(),
            ParamField::Alpha => self.alpha.len(),
            ParamField::Beta => self.beta.len(),
        }
    }

    /// Whether grouping by this field can compare anything.
    pub fn varies(&self, field: ParamField) -> bool {
        self.len_of(field) > 1
    }

    fn has_risk_shape(&self) -> bool {
        !self.alpha.is_empty()
    }
}

/// A validated sweep over a set of parameter lists.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    lists: ParameterLists,
    /// Per-field list length, with 1 for omitted risk shapes.
    radices: [usize; 7],
    len: usize,
}

impl ParameterSweep {
    pub fn new(lists: ParameterLists) -> SimResult<Self> {
        for field in &ParamField::ALL[..5] {
            if lists.len_of(*field) == 0 {
                return Err(SimError::EmptyParameterList { field: *field });
            }
        }
        if lists.alpha.is_empty() != lists.beta.is_empty() {
            return Err(SimError::IncompleteRiskShape);
        }

        let mut radices = [1usize; 7];
        for (slot, field) in radices.iter_mut().zip(ParamField::ALL) {
            *slot = lists.len_of(field).max(1);
        }
        let len = radices
            .iter()
            .try_fold(1usize, |acc, r| acc.checked_mul(*r))
            .ok_or(SimError::SweepTooLarge)?;

        if len > LARGE_SWEEP_WARNING {
            log::warn!("sweep expands to {len} combinations");
        }

        Ok(Self { lists, radices, len })
    }

    pub fn lists(&self) -> &ParameterLists {
        &self.lists
    }

    /// Total number of combinations: the product of the list lengths.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The combination at a position in sweep order.
    pub fn combination_at(&self, id: CombinationId) -> Option<ParameterCombination> {
        if id.0 >= self.len {
            return None;
        }
        // Mixed-radix decode, rightmost field fastest.
        let mut digits = [0usize; 7];
        let mut rest = id.0;
        for (digit, radix) in digits.iter_mut().zip(self.radices).rev() {
            *digit = rest % radix;
            rest /= radix;
        }

        let l = &self.lists;
        let risk = l.has_risk_shape();
        Some(ParameterCombination {
            employees: l.employees[digits[0]],
            salary: l.salary[digits[1]],
            average_clients: l.average_clients[digits[2]],
            mean_order_cost: l.mean_order_cost[digits[3]],
            order_std_dev: l.order_std_dev[digits[4]],
            alpha: risk.then(|| l.alpha[digits[5]]),
            beta: risk.then(|| l.beta[digits[6]]),
        })
    }

    pub fn iter(&self) -> SweepIter<'_> {
        SweepIter { sweep: self, next: 0 }
    }

    /// Combinations paired with their ids.
    pub fn enumerate(&self) -> impl Iterator<Item = (CombinationId, ParameterCombination)> + '_ {
        self.iter().enumerate().map(|(i, c)| (CombinationId(i), c))
    }
}

impl<'a> IntoIterator for &'a ParameterSweep {
    type Item = ParameterCombination;
    type IntoIter = SweepIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct SweepIter<'a> {
    sweep: &'a ParameterSweep,
    next: usize,
}

impl Iterator for SweepIter<'_> {
    type Item = ParameterCombination;

    fn next(&mut self) -> Option<Self::Item> {
        let combination = self.sweep.combination_at(CombinationId(self.next))?;
        self.next += 1;
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.sweep.len.saturating_sub(self.next);
        (left, Some(left))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n);
        self.next()
    }
}

impl ExactSizeIterator for SweepIter<'_> {}

/// Expand parameter lists into the full ordered list of combinations.
pub fn run_sweep(lists: ParameterLists) -> SimResult<Vec<ParameterCombination>> {
    Ok(ParameterSweep::new(lists)?.iter().collect())
}
