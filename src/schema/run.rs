//! Run configuration and report types for the generational scheduler.

use serde::{Deserialize, Serialize};

use super::Individual;

/// Configuration for one scheduler run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Whether lower fitness is better.
    #[serde(default = "default_minimize")]
    pub minimize: bool,
    /// Maximum total number of individual evaluations for the whole run.
    #[serde(default = "default_budget")]
    pub budget: usize,
    /// Consecutive non-improving generations before the mutation
    /// parameters are reset. `None` disables the mechanism.
    #[serde(default)]
    pub patience: Option<usize>,
    /// Number of worker threads. `None` selects the built-in default.
    #[serde(default)]
    pub pool_size: Option<usize>,
    /// Verbosity of per-generation logging. Zero logs at debug level,
    /// anything higher at info level. Never affects control flow.
    #[serde(default)]
    pub verbosity: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            minimize: default_minimize(),
            budget: default_budget(),
            patience: None,
            pool_size: None,
            verbosity: 0,
        }
    }
}

fn default_minimize() -> bool {
    true
}
fn default_budget() -> usize {
    10_000
}

/// Run configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Evaluation budget must be positive")]
    InvalidBudget,
    #[error("Worker pool size must be positive")]
    InvalidPoolSize,
    #[error("Parents population must not be empty")]
    EmptyParents,
    #[error("Offspring population must not be empty")]
    EmptyOffspring,
}

impl RunConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget == 0 {
            return Err(ConfigError::InvalidBudget);
        }
        if self.pool_size == Some(0) {
            return Err(ConfigError::InvalidPoolSize);
        }
        Ok(())
    }
}

/// Per-generation snapshot handed to an observer callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Completed generations so far.
    pub generation: usize,
    /// Evaluations consumed so far.
    pub budget_used: usize,
    /// Evaluation ceiling for the run.
    pub budget_total: usize,
    /// Offspring evaluated (and charged) this generation; may shrink
    /// near the end of the budget.
    pub offspring_size: usize,
    /// Best fitness seen so far.
    pub best_fitness: f64,
    /// Best fitness of the generation that just completed.
    pub generation_best: f64,
    /// Generations since the last improvement.
    pub patience_counter: usize,
}

/// Final result of a scheduler run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Best individual found.
    pub best: Individual,
    /// Fitness of the best individual.
    pub best_fitness: f64,
    /// Best fitness recorded at the end of each generation.
    ///
    /// One entry per completed generation. The initial parent evaluation
    /// is not recorded, so the first entry is the outcome of generation 1.
    pub history: Vec<f64>,
    /// Statistics from the run.
    pub stats: RunStats,
}

/// Statistics from a scheduler run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Total generations completed.
    pub generations: usize,
    /// Total evaluations performed.
    pub evaluations: usize,
    /// Generations that improved on the best-so-far fitness.
    pub successful_generations: usize,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
}
