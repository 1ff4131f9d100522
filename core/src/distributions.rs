//! Distribution samplers built on the deterministic stream.
//!
//! Every sampler is a free function taking the run's stream. The number
//! of draws consumed per sample varies by sampler and, for the rejection
//! and multiplicative methods, by the draws themselves. Callers must not
//! assume a fixed draw count.

use crate::{
    error::{SimError, SimResult},
    rng::LcgStream,
};
use std::f64::consts::PI;

/// Acceptance constant of the gamma rejection loop (e^-1).
const GAMMA_ACCEPT_K: f64 = 0.367_879_441_171_442_321_595_6;

/// Above this rate the Poisson threshold is applied in steps so that
/// exp(-lambda) never underflows.
const POISSON_STEP: f64 = 500.0;

/// Poisson sample by Knuth's multiplicative method.
///
/// A non-positive (or NaN) rate returns 0 without touching the stream.
pub fn poisson(stream: &mut LcgStream, lambda: f64) -> u32 {
    if lambda.is_nan() || lambda <= 0.0 {
        return 0;
    }
    if lambda < POISSON_STEP {
        let limit = (-lambda).exp();
        let mut k: u32 = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= stream.next_f64();
            if p <= limit {
                return k - 1;
            }
        }
    }

    // Large rates: fold e^lambda into p a step at a time.
    let mut remaining = lambda;
    let mut k: u32 = 0;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= stream.next_f64();
        while p < 1.0 && remaining > 0.0 {
            if remaining > POISSON_STEP {
                p *= POISSON_STEP.exp();
                remaining -= POISSON_STEP;
            } else {
                p *= remaining.exp();
                remaining = 0.0;
            }
        }
        if p <= 1.0 {
            return k - 1;
        }
    }
}

/// Normal sample by the Box–Muller transform (two draws).
pub fn normal(stream: &mut LcgStream, mean: f64, std_dev: f64) -> f64 {
    let u1 = stream.next_f64().max(f64::MIN_POSITIVE);
    let u2 = stream.next_f64();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z0
}

/// Gamma sample.
///
/// Shapes below 1 are boosted through `gamma(shape + 1)`; shapes of at
/// least 1 use a Marsaglia–Tsang style rejection loop with no iteration
/// cap. Samples are strictly positive.
pub fn gamma(stream: &mut LcgStream, shape: f64, scale: f64) -> SimResult<f64> {
    if !shape.is_finite() || shape <= 0.0 {
        return Err(SimError::invalid("shape", shape, "must be a finite value greater than 0"));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SimError::invalid("scale", scale, "must be a finite value greater than 0"));
    }

    if shape < 1.0 {
        let u = stream.next_f64();
        let v = gamma(stream, shape + 1.0, scale)?;
        // u^(1/shape) underflows for small shapes; keep the sample positive.
        return Ok((u.powf(1.0 / shape) * v).max(f64::MIN_POSITIVE));
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let u1 = stream.next_f64();
        let u2 = stream.next_f64();
        let v = (u1 / (1.0 - u1)).ln();
        let x = 1.0 + c * v;
        let x_cubed = x * x * x;

        if x > 0.0 && u2 < 1.0 + GAMMA_ACCEPT_K * v * v * x_cubed {
            return Ok((d * x_cubed * scale).max(f64::MIN_POSITIVE));
        }
    }
}

/// Beta sample as the ratio of two unit-scale gamma samples.
pub fn beta(stream: &mut LcgStream, alpha: f64, beta: f64) -> SimResult<f64> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(SimError::invalid("alpha", alpha, "must be a finite value greater than 0"));
    }
    if !beta.is_finite() || beta <= 0.0 {
        return Err(SimError::invalid("beta", beta, "must be a finite value greater than 0"));
    }
    let x = gamma(stream, alpha, 1.0)?;
    let y = gamma(stream, beta, 1.0)?;
    Ok(x / (x + y))
}
