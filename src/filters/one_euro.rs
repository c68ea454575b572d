//! 1€ filter: an adaptive low-pass filter for a timestamped scalar signal.
//!
//! The cutoff frequency grows with the estimated speed of the signal, so slow
//! motion is smoothed strongly (less jitter) while fast motion passes with
//! little lag.

use super::SignalFilter;
use crate::constants::{DEFAULT_BETA, DEFAULT_D_CUTOFF, DEFAULT_MIN_CUTOFF};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tuning of a [`OneEuroFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneEuroParams {
    /// Minimum cutoff frequency in Hz, lower is smoother at rest
    pub min_cutoff: f64,
    /// Speed coefficient, higher means less lag during fast motion
    pub beta: f64,
    /// Cutoff frequency in Hz used for the derivative estimate
    pub d_cutoff: f64,
}

impl Default for OneEuroParams {
    fn default() -> Self {
        Self {
            min_cutoff: DEFAULT_MIN_CUTOFF,
            beta: DEFAULT_BETA,
            d_cutoff: DEFAULT_D_CUTOFF,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    t_prev: f64,
    x_prev: f64,
    dx_prev: f64,
}

/// 1€ filter for one coordinate of one joint
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    params: OneEuroParams,
    state: Option<State>,
}

impl OneEuroFilter {
    /// Create a filter primed with an initial sample
    #[must_use]
    pub fn new(t0: f64, x0: f64, params: OneEuroParams) -> Self {
        Self {
            params,
            state: Some(State {
                t_prev: t0,
                x_prev: x0,
                dx_prev: 0.0,
            }),
        }
    }

    /// Create a filter that passes its first sample through unchanged
    #[must_use]
    pub const fn unprimed(params: OneEuroParams) -> Self {
        Self { params, state: None }
    }

    /// Current tuning
    #[must_use]
    pub const fn params(&self) -> OneEuroParams {
        self.params
    }

    /// Restart from a new sample, keeping the tuning
    pub fn prime(&mut self, t0: f64, x0: f64) {
        self.state = Some(State {
            t_prev: t0,
            x_prev: x0,
            dx_prev: 0.0,
        });
    }

    fn smoothing_factor(t_e: f64, cutoff: f64) -> f64 {
        let r = 2.0 * PI * cutoff * t_e;
        r / (r + 1.0)
    }

    fn exponential_smoothing(alpha: f64, x: f64, x_prev: f64) -> f64 {
        alpha.mul_add(x - x_prev, x_prev)
    }
}

impl SignalFilter for OneEuroFilter {
    fn apply(&mut self, t: f64, x: f64) -> f64 {
        let Some(state) = self.state else {
            self.prime(t, x);
            return x;
        };

        let t_e = t - state.t_prev;
        if t_e <= 0.0 {
            return state.x_prev;
        }

        let a_d = Self::smoothing_factor(t_e, self.params.d_cutoff);
        let dx = (x - state.x_prev) / t_e;
        let dx_hat = Self::exponential_smoothing(a_d, dx, state.dx_prev);

        let cutoff = self.params.beta.mul_add(dx_hat.abs(), self.params.min_cutoff);
        let a = Self::smoothing_factor(t_e, cutoff);
        let x_hat = Self::exponential_smoothing(a, x, state.x_prev);

        self.state = Some(State {
            t_prev: t,
            x_prev: x_hat,
            dx_prev: dx_hat,
        });
        x_hat
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn tune(&mut self, min_cutoff: f64, beta: f64) {
        self.params.min_cutoff = min_cutoff;
        self.params.beta = beta;
    }

    fn name(&self) -> &str {
        "OneEuroFilter"
    }
}
