//! The generational scheduler: a budgeted evolution-strategy loop.
//!
//! One coordinating thread drives the run:
//!
//! ```text
//! INITIAL_EVAL -> loop { SIZE_CONTROL -> RECOMBINE? -> MUTATE
//!                        -> EVALUATE -> SELECT -> BOOKKEEP } -> DONE
//! ```
//!
//! The loop terminates when the evaluation budget is exhausted. There is
//! no convergence-based early exit; stagnation is handled by resetting
//! the mutation parameters through the patience mechanism, not by
//! stopping.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::schema::{
    ConfigError, Individual, Population, Progress, RunConfig, RunReport, RunStats,
};

use super::operators::{is_better, EvalError, Evaluate, Mutate, Recombine, Select};
use super::pool::{WorkerPool, DEFAULT_POOL_SIZE};

/// Errors that abort a scheduler run.
///
/// All of them are fatal: no partial result is returned and the worker
/// pool is released before the error surfaces.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The run configuration or the initial populations are invalid.
    /// Raised before any worker pool is created.
    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),
    /// An evaluation, recombination, or mutation invocation failed.
    #[error("Operator failed for individual {index}: {source}")]
    Evaluation { index: usize, source: EvalError },
    /// Selection broke its post-conditions on the parents population.
    #[error("Selection contract violated: {0}")]
    SelectionContract(String),
    /// The worker pool could not be built.
    #[error("Worker pool setup failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Scheduler-private state for one run.
struct RunState {
    budget_used: usize,
    budget_total: usize,
    patience_counter: usize,
    generation_count: usize,
    successful_generations: usize,
    best: Individual,
    best_fitness: f64,
    history: Vec<f64>,
}

/// The generational scheduler.
///
/// Owns the control loop, the budget and patience bookkeeping, and the
/// offspring-size clamp. The four operators are injected at construction
/// time; recombination is optional, the rest are required.
pub struct GenerationScheduler {
    evaluate: Arc<dyn Evaluate>,
    recombine: Option<Arc<dyn Recombine>>,
    mutate: Arc<dyn Mutate>,
    select: Arc<dyn Select>,
}

impl GenerationScheduler {
    /// Create a scheduler from the three required operators.
    pub fn new(
        evaluate: Arc<dyn Evaluate>,
        mutate: Arc<dyn Mutate>,
        select: Arc<dyn Select>,
    ) -> Self {
        Self {
            evaluate,
            recombine: None,
            mutate,
            select,
        }
    }

    /// Add a recombination operator. Without one, offspring go straight
    /// from their previous contents into mutation.
    pub fn with_recombination(mut self, recombine: Arc<dyn Recombine>) -> Self {
        self.recombine = Some(recombine);
        self
    }

    /// Run the loop to budget exhaustion and return the best individual
    /// found together with the per-generation fitness history.
    pub fn run(
        &self,
        parents: Population,
        offspring: Population,
        config: &RunConfig,
    ) -> Result<RunReport, EngineError> {
        self.run_with_observer(parents, offspring, config, |_| {})
    }

    /// Run with a progress observer.
    ///
    /// The observer is called once after the initial evaluation
    /// (generation 0) and once per completed generation. It is purely a
    /// reporting sink; its absence or behavior never changes control
    /// flow.
    pub fn run_with_observer<F>(
        &self,
        mut parents: Population,
        mut offspring: Population,
        config: &RunConfig,
        observer: F,
    ) -> Result<RunReport, EngineError>
    where
        F: Fn(&Progress),
    {
        config.validate()?;
        if parents.is_empty() {
            return Err(ConfigError::EmptyParents.into());
        }
        if offspring.is_empty() {
            return Err(ConfigError::EmptyOffspring.into());
        }

        let start = Instant::now();

        // The pool is owned by this call frame: workers are joined when it
        // drops, on both the normal and every error return path.
        let pool = WorkerPool::new(config.pool_size.unwrap_or(DEFAULT_POOL_SIZE))?;

        // The parents population must keep this size for the whole run;
        // selection is checked against it after every generation.
        let parents_size = parents.size();

        info!(
            "starting run: budget {}, parents {}, offspring {}, {} workers",
            config.budget,
            parents_size,
            offspring.size(),
            pool.size()
        );

        // Initial evaluation of the parents.
        let scores = self.evaluate_all(&pool, &parents)?;
        parents.assign_fitnesses(scores);

        let mut state = RunState {
            budget_used: parents_size,
            budget_total: config.budget,
            patience_counter: 0,
            generation_count: 0,
            successful_generations: 0,
            best: parents.individuals()[0].clone(),
            best_fitness: parents.fitnesses()[0],
            history: Vec::new(),
        };
        for (individual, &fitness) in parents.individuals().iter().zip(parents.fitnesses()) {
            if is_better(fitness, state.best_fitness, config.minimize) {
                state.best = individual.clone();
                state.best_fitness = fitness;
            }
        }

        observer(&snapshot(&state, offspring.size(), state.best_fitness));

        while state.budget_used < state.budget_total {
            // Selection is free to shrink the offspring container, but a
            // drained one can never advance the budget; refuse to spin.
            if offspring.is_empty() {
                return Err(EngineError::SelectionContract(
                    "selection left the offspring population empty".into(),
                ));
            }

            // Size control: never start an offspring generation the
            // budget cannot pay for.
            let remaining = state.budget_total - state.budget_used;
            if remaining < offspring.size() {
                warn!(
                    "truncating offspring population {} -> {} to honor the budget",
                    offspring.size(),
                    remaining
                );
                offspring.resize(remaining);
            }

            // This generation evaluates exactly this many offspring; the
            // charge is fixed now, before selection gets a chance to
            // rearrange the container.
            let charged = offspring.size();

            if let Some(recombine) = &self.recombine {
                let replacements = pool.map(offspring.individuals(), |index, target| {
                    recombine
                        .apply(&parents, target)
                        .map_err(|source| EngineError::Evaluation { index, source })
                })?;
                overwrite(&mut offspring, replacements);
            }

            // Mutation is submitted to the pool and awaited right away.
            let mutate = Arc::clone(&self.mutate);
            let pending = pool.map_submit(offspring.individuals().to_vec(), move |index, target| {
                mutate
                    .apply(target)
                    .map_err(|source| EngineError::Evaluation { index, source })
            });
            overwrite(&mut offspring, pending.wait()?);

            // Offspring fitnesses are stale from here until this
            // evaluation lands.
            let scores = self.evaluate_all(&pool, &offspring)?;
            offspring.assign_fitnesses(scores);

            self.select
                .apply(&mut parents, &mut offspring, config.minimize);
            if parents.is_empty() {
                return Err(EngineError::SelectionContract(
                    "selection left the parents population empty".into(),
                ));
            }
            if parents.size() != parents_size {
                return Err(EngineError::SelectionContract(format!(
                    "selection changed the parents population size from {} to {}",
                    parents_size,
                    parents.size()
                )));
            }

            // Bookkeeping. Selection guarantees the generation's best
            // individual sits at parents index 0; the scheduler trusts
            // that instead of re-scanning.
            let curr_best = parents.fitnesses()[0];
            state.history.push(curr_best);
            state.budget_used += charged;
            state.generation_count += 1;

            // Two independent checks, in order: patience expiry first,
            // then best-tracking. Both may fire in the same generation.
            if let Some(limit) = config.patience {
                if state.patience_counter >= limit {
                    info!(
                        "patience expired after {} stale generations, resetting mutation parameters",
                        state.patience_counter
                    );
                    self.mutate.reset_params(&mut parents);
                    state.patience_counter = 0;
                }
            }
            if is_better(curr_best, state.best_fitness, config.minimize) {
                state.best = parents.individuals()[0].clone();
                state.best_fitness = curr_best;
                state.patience_counter = 0;
                state.successful_generations += 1;
            } else {
                state.patience_counter += 1;
            }

            if config.verbosity > 0 {
                info!(
                    "generation {}: best {:.6e}, current {:.6e}, budget {}/{}",
                    state.generation_count,
                    state.best_fitness,
                    curr_best,
                    state.budget_used,
                    state.budget_total
                );
            } else {
                debug!(
                    "generation {}: best {:.6e}, budget {}/{}",
                    state.generation_count,
                    state.best_fitness,
                    state.budget_used,
                    state.budget_total
                );
            }
            observer(&snapshot(&state, charged, curr_best));
        }

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "run complete: {} generations, {} evaluations, best {:.6e}",
            state.generation_count, state.budget_used, state.best_fitness
        );

        Ok(RunReport {
            best: state.best,
            best_fitness: state.best_fitness,
            history: state.history,
            stats: RunStats {
                generations: state.generation_count,
                evaluations: state.budget_used,
                successful_generations: state.successful_generations,
                elapsed_seconds: elapsed,
            },
        })
    }

    /// Blocking evaluation of a whole population on the worker pool.
    fn evaluate_all(
        &self,
        pool: &WorkerPool,
        population: &Population,
    ) -> Result<Vec<f64>, EngineError> {
        pool.map(population.individuals(), |index, individual| {
            self.evaluate
                .evaluate(individual)
                .map_err(|source| EngineError::Evaluation { index, source })
        })
    }
}

/// Overwrite each population slot with its same-indexed replacement.
fn overwrite(population: &mut Population, replacements: Vec<Individual>) {
    for (slot, replacement) in population.individuals_mut().iter_mut().zip(replacements) {
        *slot = replacement;
    }
}

fn snapshot(state: &RunState, offspring_size: usize, generation_best: f64) -> Progress {
    Progress {
        generation: state.generation_count,
        budget_used: state.budget_used,
        budget_total: state.budget_total,
        offspring_size,
        best_fitness: state.best_fitness,
        generation_best,
        patience_counter: state.patience_counter,
    }
}


#[cfg(test)]
mod property_tests {
    use super::tests_support::*;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The loop must always land exactly on the budget (when the
        // initial evaluation fits) and keep one history entry per
        // generation.
        #[test]
        fn run_exhausts_budget_exactly(
            parents_size in 1usize..12,
            offspring_size in 1usize..12,
            extra_budget in 1usize..60,
        ) {
            let budget = parents_size + extra_budget;
            let scheduler = constant_scheduler();
            let config = RunConfig {
                budget,
                pool_size: Some(2),
                ..RunConfig::default()
            };

            let report = scheduler
                .run(
                    constant_population(parents_size),
                    constant_population(offspring_size),
                    &config,
                )
                .unwrap();

            prop_assert_eq!(report.stats.evaluations, budget);
            prop_assert_eq!(report.history.len(), report.stats.generations);
            prop_assert!(report.stats.generations >= 1);
        }
    }
}

#[cfg(test)]
mod tests_support {
    use super::*;

    struct ConstantEval;
    impl Evaluate for ConstantEval {
        fn evaluate(&self, _: &Individual) -> Result<f64, EvalError> {
            Ok(1.0)
        }
    }

    struct IdentityMutation;
    impl Mutate for IdentityMutation {
        fn apply(&self, target: &Individual) -> Result<Individual, EvalError> {
            Ok(target.clone())
        }
        fn reset_params(&self, _: &mut Population) {}
    }

    struct KeepParents;
    impl Select for KeepParents {
        fn apply(&self, _: &mut Population, _: &mut Population, _: bool) {}
    }

    pub(super) fn constant_scheduler() -> GenerationScheduler {
        GenerationScheduler::new(
            Arc::new(ConstantEval),
            Arc::new(IdentityMutation),
            Arc::new(KeepParents),
        )
    }

    pub(super) fn constant_population(size: usize) -> Population {
        Population::filled(size, 2, 0.0)
    }
}
