// marionette-core: Types, traits, config, and errors for the Marionette IK solver.

pub mod config;
pub mod error;
pub mod skeleton;
pub mod types;

pub use config::{IkMethod, SolverConfig};
pub use error::{ChainError, ConfigError, MarionetteError};
pub use skeleton::SkeletonPose;
pub use types::{Axis, BoneId};
