//! Execution helper that runs the Rprop solver on an ELBO problem and
//! returns a crate-friendly [`SviOutcome`].
use crate::svi::{
    elbo_optimizer::{
        Theta,
        adapter::SviAdapter,
        progress::ProgressObserver,
        rprop::Rprop,
        traits::{Elbo, SviOptions, SviOutcome},
    },
    errors::SviResult,
};
use argmin::core::{Executor, State, observers::ObserverMode};

/// Run an `argmin` optimization for an ELBO problem.
///
/// Wires up the adapted problem, the Rprop solver, the initial parameter
/// vector, the fixed iteration budget, and (when `opts.verbose`) the
/// progress observer at the configured reporting cadence, then executes the
/// solver and converts the result into [`SviOutcome`].
///
/// # Arguments
/// - `theta0`: Initial parameter vector. It is **consumed** and set on the
///   optimizer state via `state.param(theta0)`.
/// - `opts`: Trainer options (learning rate, budget, decay, verbosity).
/// - `batch_size`: Observation count used to normalize the reported loss.
/// - `problem`: An [`SviAdapter`] wrapping the model variant and its data.
/// - `solver`: A fully constructed [`Rprop`] solver.
///
/// # Returns
/// An [`SviOutcome`] containing the best parameter found, the best ELBO
/// value, termination status, iteration count, and function-evaluation
/// counts.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver
///   errors) via the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors from [`SviOutcome::new`].
pub fn run_rprop<'a, F>(
    theta0: Theta, opts: &SviOptions, batch_size: usize, problem: SviAdapter<'a, F>, solver: Rprop,
) -> SviResult<SviOutcome>
where
    F: Elbo,
{
    let mut optimizer = Executor::new(problem, solver);
    optimizer =
        optimizer.configure(|state| state.param(theta0).max_iters(opts.max_iter as u64));
    let reporter = ProgressObserver::new(opts.max_iter as u64, batch_size);
    if opts.verbose {
        optimizer = optimizer
            .add_observer(reporter.clone(), ObserverMode::Every(opts.print_interval() as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let final_cost = result.get_best_cost();
    let outcome = SviOutcome::new(
        result.take_best_param(),
        -final_cost,
        termination,
        iterations,
        function_counts,
    )?;
    if opts.verbose {
        // Persist the last status line instead of leaving it overwritten.
        reporter.report(iterations.saturating_sub(1), final_cost)?;
        println!();
    }
    Ok(outcome)
}
