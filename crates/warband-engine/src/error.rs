//! Error types for the skirmish runner.
//!
//! [`EngineError`] wraps every failure mode of startup and the run loop so
//! the helpers in this binary can propagate with `?`; `main` adds context
//! through `anyhow`.

/// Top-level error for the skirmish runner.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: warband_core::ConfigError,
    },

    /// Loading the persisted memory store failed.
    #[error("memory error: {source}")]
    Memory {
        /// The underlying memory store error.
        #[from]
        source: warband_core::MemoryError,
    },

    /// Building the scenario's world snapshot failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: warband_world::WorldError,
    },

    /// The tick loop failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: warband_core::TickError,
    },
}
