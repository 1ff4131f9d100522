//! Parameter combinations and the closed table of their fields.
//!
//! Grouping needs "every field except one". Instead of walking a
//! struct's fields at runtime, each field is a `ParamField` tag with a
//! fixed accessor; comparison is per tag, exact for integers and within
//! `FIELD_TOLERANCE` for reals.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Absolute tolerance for comparing real-valued fields.
pub const FIELD_TOLERANCE: f64 = 1e-9;

/// One point of the parameter grid. Drives exactly one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterCombination {
    pub employees: u32,
    pub salary: f64,
    pub average_clients: u32,
    pub mean_order_cost: f64,
    pub order_std_dev: f64,
    /// Fixed risk shape. Present together with `beta` or not at all.
    pub alpha: Option<u32>,
    pub beta: Option<u32>,
}

impl ParameterCombination {
    /// Both shapes, when the combination uses the fixed risk variant.
    pub fn risk_shape(&self) -> Option<(u32, u32)> {
        self.alpha.zip(self.beta)
    }

    pub fn value_of(&self, field: ParamField) -> FieldValue {
        match field {
            ParamField::Employees => FieldValue::Int(self.employees),
            ParamField::Salary => FieldValue::Real(self.salary),
            ParamField::AverageClients => FieldValue::Int(self.average_clients),
            ParamField::MeanOrderCost => FieldValue::Real(self.mean_order_cost),
            ParamField::OrderStdDev => FieldValue::Real(self.order_std_dev),
            ParamField::Alpha => self.alpha.map_or(FieldValue::Absent, FieldValue::Int),
            ParamField::Beta => self.beta.map_or(FieldValue::Absent, FieldValue::Int),
        }
    }

    /// True when every field other than `except` matches within tolerance.
    pub fn matches_except(&self, other: &Self, except: ParamField) -> bool {
        ParamField::ALL
            .iter()
            .filter(|f| **f != except)
            .all(|f| self.value_of(*f).approx_eq(&other.value_of(*f)))
    }
}

impl fmt::Display for ParameterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "E={} S={} C={} M={} D={}",
            self.employees, self.salary, self.average_clients, self.mean_order_cost, self.order_std_dev
        )?;
        if let Some((alpha, beta)) = self.risk_shape() {
            write!(f, " A={alpha} B={beta}")?;
        }
        Ok(())
    }
}

/// The value of one field, typed by how it compares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u32),
    Real(f64),
    Absent,
}

impl FieldValue {
    pub fn approx_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => (a - b).abs() <= FIELD_TOLERANCE,
            (Self::Absent, Self::Absent) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Absent => f.write_str("-"),
        }
    }
}

/// Tag for each tunable parameter, in sweep nesting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    Employees,
    Salary,
    AverageClients,
    MeanOrderCost,
    OrderStdDev,
    Alpha,
    Beta,
}

impl ParamField {
    /// Every field, leftmost (slowest in a sweep) first.
    pub const ALL: [ParamField; 7] = [
        Self::Employees,
        Self::Salary,
        Self::AverageClients,
        Self::MeanOrderCost,
        Self::OrderStdDev,
        Self::Alpha,
        Self::Beta,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Salary => "salary",
            Self::AverageClients => "average_clients",
            Self::MeanOrderCost => "mean_order_cost",
            Self::OrderStdDev => "order_std_dev",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
        }
    }

    /// Name used by the legacy parameter files.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::Employees => "Employees",
            Self::Salary => "Salary",
            Self::AverageClients => "AverageClientsMonth",
            Self::MeanOrderCost => "MeanCostOrder",
            Self::OrderStdDev => "OrderStdDev",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamField {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamField::ALL
            .into_iter()
            .find(|f| f.name() == s || f.legacy_name() == s)
            .ok_or_else(|| SimError::UnknownField { name: s.to_string() })
    }
}
