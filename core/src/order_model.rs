use crate::{
    distributions,
    error::{SimError, SimResult},
    rng::LcgStream,
};

/// Cost of a single order, normally distributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderModel {
    mean_cost: f64,
    std_dev: f64,
}

impl OrderModel {
    /// Rejects a negative mean and a deviation outside `0..=mean`.
    pub fn new(mean_cost: f64, std_dev: f64) -> SimResult<Self> {
        if !mean_cost.is_finite() || mean_cost < 0.0 {
            return Err(SimError::invalid(
                "mean_order_cost",
                mean_cost,
                "must be a finite value of at least 0",
            ));
        }
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(SimError::invalid("order_std_dev", std_dev, "must be a finite value of at least 0"));
        }
        if std_dev > mean_cost {
            return Err(SimError::invalid("order_std_dev", std_dev, "must not exceed the mean order cost"));
        }
        Ok(Self { mean_cost, std_dev })
    }

    pub fn mean_cost(&self) -> f64 {
        self.mean_cost
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Coefficient of variation. A free order counts as perfectly stable.
    pub fn variability(&self) -> f64 {
        if self.mean_cost > 0.0 {
            self.std_dev / self.mean_cost
        } else {
            0.0
        }
    }

    pub fn order_cost(&self, stream: &mut LcgStream) -> f64 {
        distributions::normal(stream, self.mean_cost, self.std_dev)
    }
}
