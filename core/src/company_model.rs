//! Company model: one simulated month of orders, payroll and risk.
//!
//! The company owns the run's stream and lends it to the client and
//! order sub-models on every call, so all draws of a run come from one
//! sequence in a fixed order:
//!   1. client count (Poisson)
//!   2. per order: failure probability (Beta), success roll,
//!      order cost (Normal, successful orders only)
//!
//! Staffing cost uses a quadratic deviation penalty around the optimal
//! head count and a log-normalized load term in the risk shape.

use crate::{
    client_model::ClientModel,
    distributions,
    error::{SimError, SimResult},
    order_model::OrderModel,
    rng::LcgStream,
    simulation::MonthOutcome,
};

/// Salary multiplier applied after a low-risk order fails.
const RISK_PENALTY: f64 = 0.15;
/// Extra share of an order's value earned when a high-risk order succeeds.
const RISK_BONUS: f64 = 0.20;
const HIGH_RISK: f64 = 0.7;
const LOW_RISK: f64 = 0.3;

const SHAPE_MIN: f64 = 0.01;
const SHAPE_MAX: f64 = 0.99;
const LOAD_WEIGHT: f64 = 0.6;
const VARIABILITY_WEIGHT: f64 = 0.4;
const BETA_PER_EMPLOYEE: f64 = 0.05;

const OPTIMAL_PER_CLIENT: f64 = 0.5;
const OPTIMAL_COMPLEXITY_WEIGHT: f64 = 10.0;
const DEVIATION_PENALTY: f64 = 0.001;

/// Where an order's failure probability comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskModel {
    /// Shape derived every month from load and order variability.
    #[default]
    Dynamic,
    /// Fixed Beta(alpha, beta) shape.
    Fixed { alpha: u32, beta: u32 },
}

#[derive(Debug, Clone)]
pub struct CompanyModel {
    stream: LcgStream,
    employees: u32,
    salary: f64,
    client: ClientModel,
    order: OrderModel,
    risk: RiskModel,
    amount_money: f64,
}

impl CompanyModel {
    pub fn new(
        stream: LcgStream,
        employees: u32,
        salary: f64,
        order: OrderModel,
        risk: RiskModel,
    ) -> SimResult<Self> {
        if employees == 0 {
            return Err(SimError::invalid("employees", 0.0, "must be at least 1"));
        }
        if !salary.is_finite() || salary < 0.0 {
            return Err(SimError::invalid("salary", salary, "must be a finite value of at least 0"));
        }
        if let RiskModel::Fixed { alpha, beta } = risk {
            if alpha == 0 {
                return Err(SimError::invalid("alpha", 0.0, "must be greater than 0"));
            }
            if beta == 0 {
                return Err(SimError::invalid("beta", 0.0, "must be greater than 0"));
            }
        }
        Ok(Self {
            stream,
            employees,
            salary,
            client: ClientModel::new(),
            order,
            risk,
            amount_money: 0.0,
        })
    }

    /// Cumulative profit over every month simulated so far.
    pub fn amount_money(&self) -> f64 {
        self.amount_money
    }

    pub fn employees(&self) -> u32 {
        self.employees
    }

    pub fn order(&self) -> &OrderModel {
        &self.order
    }

    /// Simulate one month and fold its profit into `amount_money`.
    pub fn simulate_month(&mut self, average_clients: u32) -> SimResult<MonthOutcome> {
        let clients = self.client.client_count(&mut self.stream, average_clients);
        let (alpha, beta) = self.risk_shape(clients);

        let mut profit = 0.0;
        let mut successes = 0u32;
        let mut base_salary = self.salary;
        let mut total_fail_chance = 0.0;

        for _ in 0..clients {
            let fail_chance = distributions::beta(&mut self.stream, alpha, beta)?;
            total_fail_chance += fail_chance;

            let succeeded = self.stream.next_f64() > fail_chance;
            let cost = if succeeded {
                self.order.order_cost(&mut self.stream)
            } else {
                0.0
            };
            profit += settle_order(fail_chance, succeeded, cost, &mut base_salary);
            successes += u32::from(succeeded);
        }

        let avg_complexity = if clients > 0 {
            total_fail_chance / clients as f64
        } else {
            0.0
        };
        let optimal = optimal_employees(avg_complexity, clients);
        let salary_cost = self.salary_cost(optimal, base_salary);
        profit -= salary_cost;

        self.amount_money += profit;

        log::debug!(
            "month: clients={clients} successes={successes} optimal_staff={optimal:.2} \
             salary_cost={salary_cost:.2} profit={profit:.2}"
        );

        Ok(MonthOutcome { profit, clients, successes })
    }

    /// Beta shape for this month's failure probabilities.
    fn risk_shape(&self, clients: u32) -> (f64, f64) {
        match self.risk {
            RiskModel::Fixed { alpha, beta } => (alpha as f64, beta as f64),
            RiskModel::Dynamic => {
                let load = clients as f64 / self.employees as f64;
                let alpha = LOAD_WEIGHT * load.ln_1p() + VARIABILITY_WEIGHT * self.order.variability();
                let beta = self.employees as f64 * BETA_PER_EMPLOYEE;
                (alpha.clamp(SHAPE_MIN, SHAPE_MAX), beta.clamp(SHAPE_MIN, SHAPE_MAX))
            }
        }
    }

    /// Payroll for the month, penalizing distance from the optimal head count.
    fn salary_cost(&self, optimal: f64, base_salary: f64) -> f64 {
        let deviation = self.employees as f64 - optimal;
        self.employees as f64 * base_salary * (1.0 + DEVIATION_PENALTY * deviation * deviation)
    }
}

/// Revenue of one order. A success earns `cost * (1 + (1 - fail)^2)`,
/// plus `RISK_BONUS` of that when the order was high risk. A failed
/// low-risk order earns nothing and raises `base_salary` by
/// `RISK_PENALTY` for the rest of the month.
pub fn settle_order(fail_chance: f64, succeeded: bool, cost: f64, base_salary: &mut f64) -> f64 {
    if succeeded {
        let value = cost * (1.0 + (1.0 - fail_chance).powi(2));
        if fail_chance > HIGH_RISK {
            value + value * RISK_BONUS
        } else {
            value
        }
    } else if fail_chance < LOW_RISK {
        *base_salary *= 1.0 + RISK_PENALTY;
        0.0
    } else {
        0.0
    }
}

/// Head count the month's workload calls for. Grows with clients and
/// with the square of the average failure probability.
pub fn optimal_employees(avg_complexity: f64, clients: u32) -> f64 {
    OPTIMAL_PER_CLIENT * clients as f64 + OPTIMAL_COMPLEXITY_WEIGHT * avg_complexity * avg_complexity
}
