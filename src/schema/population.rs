//! Population containers for the generational scheduler.
//!
//! A `Population` is an ordered sequence of individuals plus an
//! index-parallel vector of fitness values. The scheduler holds two of
//! them, parents and offspring, and moves data between them only through
//! the operator interfaces.

use serde::{Deserialize, Serialize};

/// One candidate solution.
///
/// Carries a numeric representation and self-adaptive mutation parameters
/// (for example per-dimension step sizes). The scheduler never inspects
/// either field; it only overwrites whole individuals after recombination
/// and mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Numeric representation of the candidate.
    pub values: Vec<f64>,
    /// Self-adaptive mutation parameters, one per dimension.
    pub mut_params: Vec<f64>,
}

impl Individual {
    /// Create an individual with every value and mutation parameter set to
    /// the given constants.
    pub fn filled(dimensions: usize, value: f64, mut_param: f64) -> Self {
        Self {
            values: vec![value; dimensions],
            mut_params: vec![mut_param; dimensions],
        }
    }

    /// Number of dimensions in the representation.
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }
}

/// An ordered, index-addressed collection of individuals with parallel
/// fitness values.
///
/// Fitnesses are stale immediately after mutation and become valid again
/// only after the next evaluation pass; the scheduler is the only
/// component that reads them in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    individuals: Vec<Individual>,
    /// Unset fitnesses are the NaN sentinel; serde_json emits NaN as
    /// `null`, so map `null` back to NaN on the way in to keep the
    /// round-trip lossless.
    #[serde(with = "nan_as_null")]
    fitnesses: Vec<f64>,
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(fitnesses: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        fitnesses
            .iter()
            .map(|f| if f.is_nan() { None } else { Some(*f) })
            .collect::<Vec<Option<f64>>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|f| f.unwrap_or(f64::NAN))
            .collect())
    }
}

impl Population {
    /// Create a population from a set of individuals. Fitnesses start out
    /// unset (NaN) until the first evaluation.
    pub fn new(individuals: Vec<Individual>) -> Self {
        let fitnesses = vec![f64::NAN; individuals.len()];
        Self {
            individuals,
            fitnesses,
        }
    }

    /// Create a population of `size` identical individuals with constant
    /// values and unit step sizes. Useful as a neutral starting point in
    /// tests and demos.
    pub fn filled(size: usize, dimensions: usize, value: f64) -> Self {
        Self::new(vec![Individual::filled(dimensions, value, 1.0); size])
    }

    /// Number of individuals.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Read-only view of the individuals.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Mutable view of the individuals. Callers must preserve the
    /// one-writer-per-index discipline when writing concurrently.
    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Read-only view of the fitness values, index-parallel to
    /// `individuals()`.
    pub fn fitnesses(&self) -> &[f64] {
        &self.fitnesses
    }

    /// Mutable view of the fitness values.
    pub fn fitnesses_mut(&mut self) -> &mut [f64] {
        &mut self.fitnesses
    }

    /// Replace every fitness with the given values.
    ///
    /// `scores[i]` must correspond to `individuals()[i]`.
    pub fn assign_fitnesses(&mut self, scores: Vec<f64>) {
        debug_assert_eq!(scores.len(), self.individuals.len());
        self.fitnesses = scores;
    }

    /// Shrink the population to its first `n` individuals.
    ///
    /// Prefix truncation only: the surviving individuals keep their order
    /// and indices. Growing is not supported; a larger `n` is a no-op.
    pub fn resize(&mut self, n: usize) {
        self.individuals.truncate(n);
        self.fitnesses.truncate(n);
    }

    /// Replace the contents of both vectors at once. Used by selection
    /// operators that rebuild the parents wholesale.
    pub fn replace(&mut self, individuals: Vec<Individual>, fitnesses: Vec<f64>) {
        debug_assert_eq!(individuals.len(), fitnesses.len());
        self.individuals = individuals;
        self.fitnesses = fitnesses;
    }
}
