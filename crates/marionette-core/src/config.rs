use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_precision() -> f32 {
    1e-3
}
const fn default_max_iterations() -> u32 {
    10
}
const fn default_damping() -> f32 {
    0.01
}

// ---------------------------------------------------------------------------
// IkMethod
// ---------------------------------------------------------------------------

/// Which IK algorithm a solve call runs. Methods are mutually exclusive per
/// invocation; none depends on another at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IkMethod {
    /// Cyclic Coordinate Descent: per-joint greedy rotation, tip to root.
    #[default]
    Ccd,
    /// Forward-And-Backward Reaching IK: position passes plus orientation
    /// reconstruction.
    Fabrik,
    /// Single-shot Jacobian-transpose step, re-invoked by the host per frame.
    JacobianTranspose,
    /// Single-shot damped-pseudoinverse step, re-invoked by the host per frame.
    JacobianPseudoinverse,
}

impl IkMethod {
    /// True for the single-shot Jacobian methods, which ignore
    /// `max_iterations` and amortize convergence over repeated calls.
    pub const fn is_single_shot(self) -> bool {
        matches!(self, Self::JacobianTranspose | Self::JacobianPseudoinverse)
    }
}

impl FromStr for IkMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ccd" => Ok(Self::Ccd),
            "fabrik" => Ok(Self::Fabrik),
            "jacobian_transpose" => Ok(Self::JacobianTranspose),
            "jacobian_pseudoinverse" => Ok(Self::JacobianPseudoinverse),
            other => Err(ConfigError::UnknownMethod(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Solver configuration: method selection plus numeric budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Algorithm to run (default: CCD).
    #[serde(default)]
    pub method: IkMethod,

    /// Convergence distance threshold between tip and target (default: 1e-3).
    #[serde(default = "default_precision")]
    pub precision: f32,

    /// Hard iteration ceiling for CCD and FABRIK (default: 10). Caps
    /// worst-case per-call latency regardless of `precision`.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Tikhonov damping factor for the pseudoinverse method (default: 0.01).
    /// Higher is more robust near singular configurations but converges
    /// slower.
    #[serde(default = "default_damping")]
    pub damping: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: IkMethod::default(),
            precision: default_precision(),
            max_iterations: default_max_iterations(),
            damping: default_damping(),
        }
    }
}

impl SolverConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.precision > 0.0) {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !(self.damping >= 0.0) {
            return Err(ConfigError::InvalidDamping(self.damping));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
