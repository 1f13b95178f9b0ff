//! Progress observer for the trainer: an overwritten terminal status line.
//!
//! Attached by the runner with `ObserverMode::Every(k)` so the cadence is
//! handled by Argmin; each report clears the line and rewrites percent
//! complete and the current per-sample loss. The runner prints one final,
//! persisted line after the executor returns.
use std::io::{self, Write};

use argmin::core::{Error, KV, State, observers::Observe};

/// Prints `"{pct}% - ELBO loss: {loss}"` on a carriage-returned line.
///
/// The loss shown is the executor's current cost divided by the batch size,
/// so runs on differently sized series report comparable numbers.
#[derive(Debug, Clone)]
pub struct ProgressObserver {
    total_iters: u64,
    batch_size: f64,
}

impl ProgressObserver {
    /// `total_iters` is the fixed iteration budget; `batch_size` the number
    /// of observations the loss is normalized by (clamped to at least 1).
    pub fn new(total_iters: u64, batch_size: usize) -> Self {
        Self { total_iters, batch_size: batch_size.max(1) as f64 }
    }

    /// Render one status line for the given iteration and raw loss.
    pub fn report(&self, iter: u64, cost: f64) -> Result<(), Error> {
        let pct_done = 100.0 * (iter + 1) as f64 / self.total_iters.max(1) as f64;
        let loss = cost / self.batch_size;
        let mut out = io::stdout();
        write!(out, "{:100}\r", "")?;
        write!(out, "{pct_done:.2}% - ELBO loss: {loss:.4}\r")?;
        out.flush()?;
        Ok(())
    }
}

impl<I> Observe<I> for ProgressObserver
where
    I: State<Float = f64>,
{
    fn observe_init(&mut self, _name: &str, _state: &I, _kv: &KV) -> Result<(), Error> {
        Ok(())
    }

    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        self.report(state.get_iter(), state.get_cost())
    }
}
