//! Signal filtering for smoothing tracked joint coordinates.
//!
//! Each coordinate of each joint gets its own filter; the tracker applies
//! them before any geometry is computed, so the interaction logic only ever
//! sees smoothed positions.

/// Adaptive 1€ low-pass filter
pub mod one_euro;

use crate::{Error, Result};
use one_euro::{OneEuroFilter, OneEuroParams};

/// Trait for timestamped scalar filters
pub trait SignalFilter: Send + Sync {
    /// Filter `value` observed at `timestamp` seconds
    fn apply(&mut self, timestamp: f64, value: f64) -> f64;

    /// Forget all state; the next sample passes through unchanged
    fn reset(&mut self);

    /// Change the tuning without losing internal state
    fn tune(&mut self, _min_cutoff: f64, _beta: f64) {}

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn apply(&mut self, _timestamp: f64, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a signal filter by type name
///
/// # Errors
///
/// Returns `InvalidInput` for unknown filter names
pub fn create_filter(filter_type: &str, params: OneEuroParams) -> Result<Box<dyn SignalFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "one_euro" | "oneeuro" | "1euro" => Ok(Box::new(OneEuroFilter::unprimed(params))),
        _ => Err(Error::InvalidInput(format!("Unknown filter type: {filter_type}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        assert_eq!(filter.apply(0.0, 10.0), 10.0);
        assert_eq!(filter.apply(1.0, -3.0), -3.0);
    }

    #[test]
    fn test_create_filter() {
        let params = OneEuroParams::default();
        assert_eq!(create_filter("none", params).unwrap().name(), "NoFilter");
        assert_eq!(create_filter("One_Euro", params).unwrap().name(), "OneEuroFilter");
        assert!(create_filter("kalman", params).is_err());
    }
}
