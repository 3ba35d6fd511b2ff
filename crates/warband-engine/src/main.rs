//! Skirmish runner for the Warband engine.
//!
//! Wires the tick cycle to a seeded scenario and a stand-in game server,
//! runs it for the configured number of ticks, and logs what happened.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `warband-config.yaml` (or `WARBAND_CONFIG`)
//! 2. Initialize structured logging (tracing), defaulting to the configured
//!    level when `RUST_LOG` is unset
//! 3. Seed the skirmish scenario and attach its overlords
//! 4. Run the bounded tick loop with the [`host::SkirmishHost`] applying
//!    intents between ticks
//! 5. Log the result

mod error;
mod host;
mod scenario;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warband_core::{SimulationConfig, run_bounded};

use crate::error::EngineError;
use crate::host::SkirmishHost;

/// Environment variable overriding the configuration file path.
const CONFIG_ENV: &str = "WARBAND_CONFIG";

/// Configuration file read when `WARBAND_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "warband-config.yaml";

fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so report where the
    //    config came from once it is.
    let config_path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("warband-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        max_ticks = config.simulation.max_ticks,
        seed = config.simulation.seed,
        partner_tolerance = config.combat.partner_tolerance,
        retreat_hits_pct = config.combat.retreat_hits_pct,
        hits_target = config.fortify.hits_target,
        "Simulation bounds"
    );

    // 3. Seed the scenario.
    let mut state = scenario::build(&config).context("seeding scenario")?;

    // 4. Run.
    let mut host = SkirmishHost::new();
    let result = run_bounded(&mut state, config.simulation.max_ticks, &mut host)
        .map_err(EngineError::from)
        .context("running tick loop")?;

    // 5. Log results.
    let totals = host.totals();
    info!(
        total_ticks = result.total_ticks,
        total_intents = result.total_intents,
        agents_remaining = state.agents.len(),
        damage_dealt = totals.damage_dealt,
        damage_taken = totals.damage_taken,
        healed = totals.healed,
        repaired = totals.repaired,
        destroyed = totals.destroyed,
        casualties = totals.casualties,
        "warband-engine shutdown complete"
    );

    Ok(())
}

/// Load the configuration at `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was found.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
