use thiserror::Error;

use crate::types::BoneId;

/// Top-level error type for the Marionette solver.
#[derive(Debug, Error)]
pub enum MarionetteError {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Bone-chain resolution errors.
///
/// Detected before any pose write, so a failed resolve never leaves the
/// skeleton partially posed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Root '{root}' is not an ancestor of tip '{tip}'")]
    RootNotAncestor { tip: BoneId, root: BoneId },

    #[error("Degenerate chain: tip and root are the same bone '{0}'")]
    Degenerate(BoneId),
}

/// Solver configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid precision: {0} (must be > 0)")]
    InvalidPrecision(f32),

    #[error("max_iterations must be >= 1")]
    ZeroIterations,

    #[error("Invalid damping: {0} (must be >= 0)")]
    InvalidDamping(f32),

    #[error("Unknown solver method: {0}")]
    UnknownMethod(String),
}
