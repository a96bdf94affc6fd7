//! Schema module - Configuration, population, and report types for the
//! generational scheduler.

mod population;
mod run;

pub use population::*;
pub use run::*;
