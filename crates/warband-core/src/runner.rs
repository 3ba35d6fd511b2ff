//! Bounded multi-tick runner.
//!
//! [`run_bounded`] wraps [`run_tick`] with an [`IntentLog`], drains the
//! intents issued during each tick and hands them to a [`TickCallback`]
//! together with the state, so the host can apply them and refresh the
//! snapshot before the next tick.

use tracing::info;
use warband_agents::{Intent, IntentLog};

use crate::tick::{SimulationState, TickError, TickSummary, run_tick};

/// Result of a bounded run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Ticks executed.
    pub total_ticks: u64,
    /// Intents accepted across the whole run.
    pub total_intents: u64,
    /// Summary of the last tick, if any ran.
    pub final_summary: Option<TickSummary>,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called with the tick's summary and the intents it issued, in order.
    fn on_tick(&mut self, summary: &TickSummary, state: &mut SimulationState, intents: &[Intent]);
}

/// A callback that discards every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &mut SimulationState, _intents: &[Intent]) {}
}

/// Run `max_ticks` ticks.
///
/// # Errors
///
/// Returns the first [`TickError`]; ticks completed before it have already
/// been reported to the callback.
pub fn run_bounded(
    state: &mut SimulationState,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, TickError> {
    info!(max_ticks, agents = state.agents.len(), "Simulation starting");

    let mut result = RunResult::default();
    let mut log = IntentLog::new();
    for _ in 0..max_ticks {
        let summary = run_tick(state, &mut log)?;
        let intents = log.drain();
        callback.on_tick(&summary, state, &intents);

        result.total_ticks = result.total_ticks.saturating_add(1);
        result.total_intents = result
            .total_intents
            .saturating_add(u64::from(summary.intents_issued));
        result.final_summary = Some(summary);
    }

    info!(
        ticks = result.total_ticks,
        intents = result.total_intents,
        "Simulation finished"
    );
    Ok(result)
}
