//! Operator traits for the generational scheduler.
//!
//! The scheduler is constructed with concrete implementations of these
//! traits and never inspects individuals beyond moving them between
//! populations. All operators must be safe to call from worker threads;
//! each invocation receives its own target individual, and the scheduler
//! guarantees that no two workers ever write to the same population index.

use crate::schema::{Individual, Population};

/// Error produced by a failing operator invocation.
///
/// Any operator error aborts the run; there is no retry and partial
/// results are discarded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct EvalError(pub String);

impl EvalError {
    /// Build an error from anything printable.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Fitness evaluation of a single individual.
///
/// Implementations must be pure and side-effect-free: the worker pool
/// calls `evaluate` concurrently on distinct individuals.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, individual: &Individual) -> Result<f64, EvalError>;
}

/// Recombination of the parents population into one offspring slot.
///
/// Invoked once per offspring slot; each invocation sees the whole
/// parents population and produces the replacement for its target
/// individual.
pub trait Recombine: Send + Sync {
    fn apply(&self, parents: &Population, target: &Individual) -> Result<Individual, EvalError>;
}

/// Mutation of a single individual.
pub trait Mutate: Send + Sync {
    /// Produce the mutated replacement for `target`. The returned
    /// individual overwrites the target's slot; its fitness is stale
    /// until the next evaluation.
    fn apply(&self, target: &Individual) -> Result<Individual, EvalError>;

    /// Re-initialize self-adaptive mutation parameters after prolonged
    /// stagnation. Called by the scheduler when the patience limit is
    /// reached, with the current parents population.
    fn reset_params(&self, parents: &mut Population);
}

/// Survivor selection over parents and offspring.
///
/// The operator owns the replacement policy ((μ+λ), (μ,λ), elitist, ...)
/// and mutates `parents` in place to hold the next generation.
///
/// Contract: after `apply` returns, `parents` must be non-empty, keep its
/// configured size, and hold its best individual at index 0. The
/// scheduler reads `parents.fitnesses()[0]` as the generation's best
/// without re-scanning.
pub trait Select: Send + Sync {
    fn apply(&self, parents: &mut Population, offspring: &mut Population, minimize: bool);
}

/// Fitness comparator: lower wins when minimizing, higher wins otherwise.
#[inline]
pub(crate) fn is_better(a: f64, b: f64, minimize: bool) -> bool {
    if minimize {
        a < b
    } else {
        a > b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_direction() {
        assert!(is_better(1.0, 2.0, true));
        assert!(!is_better(2.0, 1.0, true));
        assert!(is_better(2.0, 1.0, false));
        assert!(!is_better(1.0, 2.0, false));
    }

    #[test]
    fn test_comparator_rejects_ties() {
        // A tie is not an improvement in either direction
        assert!(!is_better(1.0, 1.0, true));
        assert!(!is_better(1.0, 1.0, false));
    }

    #[test]
    fn test_eval_error_display() {
        let err = EvalError::new("simulation diverged");
        assert_eq!(err.to_string(), "simulation diverged");
    }
}
