//! evostrat - Generational scheduling engine for evolution strategies.
//!
//! This crate coordinates a pool of parallel workers to evaluate candidate
//! solutions, advances a population through bounded generations under an
//! evaluation-count budget, and adapts a stagnation-driven mutation
//! parameter through a patience mechanism.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Run configuration, population containers, and report types
//! - `engine`: The worker pool, operator traits, and the generational
//!   scheduler
//!
//! The scheduler owns exactly one pipeline shape: evaluate parents, then
//! repeat {recombine, mutate, evaluate offspring, select} until the budget
//! is exhausted. The recombination, mutation, selection, and evaluation
//! operators are injected at construction time and are the only places
//! where problem-specific math lives.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use evostrat::{
//!     engine::{EvalError, Evaluate, GenerationScheduler, Mutate, Select},
//!     schema::{Individual, Population, RunConfig},
//! };
//!
//! struct Sphere;
//!
//! impl Evaluate for Sphere {
//!     fn evaluate(&self, individual: &Individual) -> Result<f64, EvalError> {
//!         Ok(individual.values.iter().map(|x| x * x).sum())
//!     }
//! }
//!
//! struct CloneMutation;
//!
//! impl Mutate for CloneMutation {
//!     fn apply(&self, target: &Individual) -> Result<Individual, EvalError> {
//!         Ok(target.clone())
//!     }
//!     fn reset_params(&self, _parents: &mut Population) {}
//! }
//!
//! struct KeepParents;
//!
//! impl Select for KeepParents {
//!     fn apply(&self, _parents: &mut Population, _offspring: &mut Population, _minimize: bool) {}
//! }
//!
//! let scheduler = GenerationScheduler::new(
//!     Arc::new(Sphere),
//!     Arc::new(CloneMutation),
//!     Arc::new(KeepParents),
//! );
//!
//! let parents = Population::filled(10, 4, 0.5);
//! let offspring = Population::filled(20, 4, 0.5);
//!
//! let config = RunConfig { budget: 500, ..RunConfig::default() };
//! let report = scheduler.run(parents, offspring, &config).unwrap();
//!
//! println!("best fitness: {:.3}", report.best_fitness);
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{EngineError, EvalError, GenerationScheduler, WorkerPool};
pub use schema::{Individual, Population, RunConfig, RunReport};
