//! Minimize the sphere function with a (μ+λ) evolution strategy.
//!
//! Demonstrates wiring concrete operators into the generational
//! scheduler: intermediate recombination, log-normal self-adaptive
//! mutation with a patience-driven step-size reset, and elitist
//! survivor selection.
//!
//! Run with: `cargo run --example sphere`

use std::sync::Arc;

use rand::Rng;
use rand_distr::StandardNormal;

use evostrat::{
    engine::{EvalError, Evaluate, GenerationScheduler, Mutate, Recombine, Select},
    schema::{Individual, Population, RunConfig},
};

const DIMENSIONS: usize = 10;
const INITIAL_SIGMA: f64 = 0.5;

/// f(x) = Σ x_i², minimum 0 at the origin.
struct Sphere;

impl Evaluate for Sphere {
    fn evaluate(&self, individual: &Individual) -> Result<f64, EvalError> {
        Ok(individual.values.iter().map(|x| x * x).sum())
    }
}

/// Intermediate recombination: average two random parents, values and
/// step sizes alike.
struct Intermediate;

impl Recombine for Intermediate {
    fn apply(&self, parents: &Population, _target: &Individual) -> Result<Individual, EvalError> {
        let mut rng = rand::thread_rng();
        let a = &parents.individuals()[rng.gen_range(0..parents.size())];
        let b = &parents.individuals()[rng.gen_range(0..parents.size())];

        let mix = |x: &[f64], y: &[f64]| {
            x.iter()
                .zip(y)
                .map(|(u, v)| 0.5 * (u + v))
                .collect::<Vec<f64>>()
        };

        Ok(Individual {
            values: mix(&a.values, &b.values),
            mut_params: mix(&a.mut_params, &b.mut_params),
        })
    }
}

/// Log-normal self-adaptation: each step size drifts multiplicatively,
/// then perturbs its dimension.
struct LogNormal {
    learning_rate: f64,
}

impl Mutate for LogNormal {
    fn apply(&self, target: &Individual) -> Result<Individual, EvalError> {
        let mut rng = rand::thread_rng();
        let mut next = target.clone();
        for (value, sigma) in next.values.iter_mut().zip(next.mut_params.iter_mut()) {
            let drift: f64 = rng.sample(StandardNormal);
            *sigma *= (self.learning_rate * drift).exp();
            let step: f64 = rng.sample(StandardNormal);
            *value += *sigma * step;
        }
        Ok(next)
    }

    fn reset_params(&self, parents: &mut Population) {
        for individual in parents.individuals_mut() {
            individual.mut_params.fill(INITIAL_SIGMA);
        }
    }
}

/// (μ+λ) survivor selection: best of parents and offspring combined.
struct Plus;

impl Select for Plus {
    fn apply(&self, parents: &mut Population, offspring: &mut Population, minimize: bool) {
        let mut combined: Vec<(Individual, f64)> = parents
            .individuals()
            .iter()
            .cloned()
            .zip(parents.fitnesses().iter().copied())
            .chain(
                offspring
                    .individuals()
                    .iter()
                    .cloned()
                    .zip(offspring.fitnesses().iter().copied()),
            )
            .collect();
        combined.sort_by(|a, b| {
            if minimize {
                a.1.total_cmp(&b.1)
            } else {
                b.1.total_cmp(&a.1)
            }
        });
        combined.truncate(parents.size());
        let (individuals, fitnesses) = combined.into_iter().unzip();
        parents.replace(individuals, fitnesses);
    }
}

fn random_population(size: usize) -> Population {
    let mut rng = rand::thread_rng();
    Population::new(
        (0..size)
            .map(|_| Individual {
                values: (0..DIMENSIONS).map(|_| rng.gen_range(-5.0..5.0)).collect(),
                mut_params: vec![INITIAL_SIGMA; DIMENSIONS],
            })
            .collect(),
    )
}

fn main() {
    env_logger::init();

    let scheduler = GenerationScheduler::new(
        Arc::new(Sphere),
        Arc::new(LogNormal {
            learning_rate: 1.0 / (2.0 * DIMENSIONS as f64).sqrt(),
        }),
        Arc::new(Plus),
    )
    .with_recombination(Arc::new(Intermediate));

    let config = RunConfig {
        minimize: true,
        budget: 20_000,
        patience: Some(15),
        pool_size: Some(8),
        verbosity: 1,
    };

    let report = scheduler
        .run_with_observer(
            random_population(15),
            random_population(100),
            &config,
            |progress| {
                if progress.generation % 20 == 0 {
                    println!(
                        "generation {:4}  best {:.6e}  budget {}/{}",
                        progress.generation,
                        progress.best_fitness,
                        progress.budget_used,
                        progress.budget_total
                    );
                }
            },
        )
        .expect("run failed");

    println!();
    println!(
        "finished: {} generations, {} evaluations, {} improving, {:.2}s",
        report.stats.generations,
        report.stats.evaluations,
        report.stats.successful_generations,
        report.stats.elapsed_seconds
    );
    println!("best fitness: {:.6e}", report.best_fitness);
    println!(
        "best point (first 4 dims): {:?}",
        &report.best.values[..4.min(report.best.values.len())]
    );
}
