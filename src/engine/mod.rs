//! Engine module - Worker pool, operator traits, and the generational
//! scheduler.
//!
//! # Overview
//!
//! The engine consists of:
//!
//! - **Operator Traits** (`operators`): Pluggable evaluation,
//!   recombination, mutation, and selection
//! - **Worker Pool** (`pool`): Fixed-size parallel map over individuals
//! - **Scheduler** (`scheduler`): The budgeted generation loop
//!
//! # Control flow
//!
//! One coordinating thread drives the run. It blocks at three points per
//! generation, each a full barrier on the worker pool: recombination (when
//! configured), mutation, and offspring evaluation. Generations never
//! overlap; every effect of generation `g` is committed before `g + 1`
//! begins.

mod operators;
mod pool;
mod scheduler;

pub use operators::{EvalError, Evaluate, Mutate, Recombine, Select};
pub use pool::{PendingMap, WorkerPool, DEFAULT_POOL_SIZE};
pub use scheduler::{EngineError, GenerationScheduler};
