//! Inverse kinematics solvers for skeletal bone chains.
//!
//! Four interchangeable algorithms — CCD, FABRIK, Jacobian-Transpose, and
//! Jacobian-Pseudoinverse — share one contract: resolve a root-to-tip
//! [`BoneChain`] from the host's bone hierarchy, then pose its joints so
//! the tip reaches a world-space target.
//!
//! # Architecture
//!
//! ```text
//! SkeletonPose ──► BoneChain ──► IkSolver ──► committed joint poses
//! ```
//!
//! The bone-pose store is owned by the host and injected through
//! [`SkeletonPose`](marionette_core::skeleton::SkeletonPose); the solvers
//! read and mutate world-space poses by bone identifier and keep no state
//! between calls. CCD and FABRIK iterate internally up to a hard cap; the
//! Jacobian methods take one step per call and rely on the host's per-frame
//! re-invocation for convergence.

pub mod ccd;
pub mod chain;
pub mod fabrik;
pub mod jacobian;
mod rotation;
pub mod solver;

pub use chain::BoneChain;
pub use solver::{IkSolver, SolveOutcome};
