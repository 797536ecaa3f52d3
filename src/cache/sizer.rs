//! Size Estimator Module
//!
//! Pluggable cost estimation for cached values. Every cache is constructed
//! with an estimator; the store charges each entry its estimated byte cost
//! against the cache's memory ceiling.
//!
//! Estimation never fails. Deployments whose values are opaque use
//! [`FallbackEstimator`], which charges the flat [`FALLBACK_COST`] for
//! everything; value types that can describe their own footprint implement
//! [`EstimateCost`] and plug in through [`CostEstimator`].

use std::collections::HashMap;

// == Constants ==
/// Flat byte cost charged for values with no better estimate.
pub const FALLBACK_COST: usize = 64;

// == Size Estimator ==
/// Maps a value to an integer byte-equivalent cost.
pub trait SizeEstimator<V> {
    fn estimate(&self, value: &V) -> usize;
}

// == Fallback Estimator ==
/// Charges [`FALLBACK_COST`] for every value, whatever its type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEstimator;

impl<V> SizeEstimator<V> for FallbackEstimator {
    fn estimate(&self, _value: &V) -> usize {
        FALLBACK_COST
    }
}

// == Fn Estimator ==
/// Adapts a closure into an estimator, for one-off deployments.
#[derive(Debug, Clone)]
pub struct FnEstimator<F>(pub F);

impl<V, F: Fn(&V) -> usize> SizeEstimator<V> for FnEstimator<F> {
    fn estimate(&self, value: &V) -> usize {
        (self.0)(value)
    }
}

// == Cost Estimator ==
/// Estimator for value types that implement [`EstimateCost`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl<V: EstimateCost> SizeEstimator<V> for CostEstimator {
    fn estimate(&self, value: &V) -> usize {
        value.estimated_cost()
    }
}

// == Estimate Cost ==
/// Self-reported byte cost of a value.
///
/// Composite impls sum their elements recursively, so a
/// `Vec<HashMap<String, Frame>>` costs what its leaves cost.
pub trait EstimateCost {
    fn estimated_cost(&self) -> usize;
}

/// Cost of a raster-like buffer: `width * height * bytes_per_pixel`.
///
/// Convenience for value types wrapping composited frames or decoded
/// images; pixel payloads dominate cache memory in practice.
pub fn raster_cost(width: usize, height: usize, bytes_per_pixel: usize) -> usize {
    width * height * bytes_per_pixel
}

macro_rules! impl_estimate_cost_for_scalar {
    ($($ty:ty),*) => {
        $(
            impl EstimateCost for $ty {
                fn estimated_cost(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

impl_estimate_cost_for_scalar!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64, bool, char);

impl EstimateCost for String {
    fn estimated_cost(&self) -> usize {
        self.len()
    }
}

impl<T: EstimateCost> EstimateCost for Vec<T> {
    fn estimated_cost(&self) -> usize {
        self.iter().map(EstimateCost::estimated_cost).sum()
    }
}

impl<K: EstimateCost, V: EstimateCost> EstimateCost for HashMap<K, V> {
    fn estimated_cost(&self) -> usize {
        self.iter()
            .map(|(k, v)| k.estimated_cost() + v.estimated_cost())
            .sum()
    }
}

impl<T: EstimateCost> EstimateCost for Option<T> {
    fn estimated_cost(&self) -> usize {
        self.as_ref().map_or(0, EstimateCost::estimated_cost)
    }
}

impl<A: EstimateCost, B: EstimateCost> EstimateCost for (A, B) {
    fn estimated_cost(&self) -> usize {
        self.0.estimated_cost() + self.1.estimated_cost()
    }
}
