use crate::{distributions, rng::LcgStream};

/// Monthly client arrivals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientModel;

impl ClientModel {
    pub fn new() -> Self {
        Self
    }

    /// Number of clients arriving this month, Poisson around the average.
    pub fn client_count(&self, stream: &mut LcgStream, average_per_month: u32) -> u32 {
        distributions::poisson(stream, average_per_month as f64)
    }
}
