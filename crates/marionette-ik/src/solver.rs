//! Solver façade: method selection and per-call dispatch.

use log::debug;
use nalgebra::Point3;

use marionette_core::config::{IkMethod, SolverConfig};
use marionette_core::error::MarionetteError;
use marionette_core::skeleton::SkeletonPose;
use marionette_core::types::BoneId;

use crate::chain::BoneChain;
use crate::{ccd, fabrik, jacobian};

/// Result of one solve call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOutcome {
    /// Whether the tip ended within `precision` of the target.
    pub converged: bool,
    /// Chain sweeps spent (CCD/FABRIK), or whether the single-shot step was
    /// applied (Jacobian methods: 1 applied, 0 skipped).
    pub iterations: u32,
    /// Final tip-to-target distance.
    pub distance: f32,
}

/// Configured IK solver dispatching to one of the four algorithms.
///
/// Methods are mutually exclusive per invocation and selected by
/// [`SolverConfig::method`]; swapping algorithms is a configuration change,
/// not a call-site change.
pub struct IkSolver {
    config: SolverConfig,
}

impl IkSolver {
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Resolve the chain from `tip` up to `root`, then pose it toward
    /// `target` with the configured method.
    ///
    /// # Errors
    ///
    /// Returns a [`ChainError`](marionette_core::error::ChainError) if
    /// `root` is not a proper ancestor of `tip`; no pose is written in that
    /// case.
    pub fn solve<S: SkeletonPose>(
        &self,
        skeleton: &mut S,
        tip: &BoneId,
        root: &BoneId,
        target: Point3<f32>,
    ) -> Result<SolveOutcome, MarionetteError> {
        let chain = BoneChain::resolve(skeleton, tip, root)?;
        Ok(self.solve_chain(skeleton, &chain, target))
    }

    /// Pose an already-resolved chain toward `target`.
    pub fn solve_chain<S: SkeletonPose>(
        &self,
        skeleton: &mut S,
        chain: &BoneChain,
        target: Point3<f32>,
    ) -> SolveOutcome {
        let c = &self.config;
        let outcome = match c.method {
            IkMethod::Ccd => ccd::solve(skeleton, chain, target, c.precision, c.max_iterations),
            IkMethod::Fabrik => {
                fabrik::solve(skeleton, chain, target, c.precision, c.max_iterations)
            }
            IkMethod::JacobianTranspose => {
                jacobian::solve_transpose(skeleton, chain, target, c.precision)
            }
            IkMethod::JacobianPseudoinverse => {
                jacobian::solve_pseudoinverse(skeleton, chain, target, c.precision, c.damping)
            }
        };

        debug!(
            "{:?} solve: converged={} iterations={} distance={}",
            c.method, outcome.converged, outcome.iterations, outcome.distance
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_core::error::ChainError;
    use marionette_test_utils::straight_chain;

    fn solver_for(method: IkMethod) -> IkSolver {
        IkSolver::new(SolverConfig {
            method,
            precision: 1e-2,
            max_iterations: 100,
            damping: 0.01,
        })
    }

    #[test]
    fn ccd_dispatch_converges() {
        let (mut skeleton, ids) = straight_chain(&["root", "mid", "tip"], 1.0);
        let solver = solver_for(IkMethod::Ccd);
        let outcome = solver
            .solve(&mut skeleton, &ids[2], &ids[0], Point3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert!(outcome.converged);
    }

    #[test]
    fn fabrik_dispatch_converges() {
        let (mut skeleton, ids) = straight_chain(&["root", "mid", "tip"], 1.0);
        let solver = solver_for(IkMethod::Fabrik);
        let outcome = solver
            .solve(&mut skeleton, &ids[2], &ids[0], Point3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert!(outcome.converged);
    }

    #[test]
    fn jacobian_dispatches_take_single_steps() {
        for method in [IkMethod::JacobianTranspose, IkMethod::JacobianPseudoinverse] {
            let (mut skeleton, ids) = straight_chain(&["root", "mid", "tip"], 1.0);
            let solver = solver_for(method);
            let target = Point3::new(1.8, 0.4, 0.0);
            let initial = (skeleton.world_position(&ids[2]) - target).norm();
            let outcome = solver
                .solve(&mut skeleton, &ids[2], &ids[0], target)
                .unwrap();
            assert_eq!(outcome.iterations, 1);
            assert!(outcome.distance < initial);
        }
    }

    #[test]
    fn chain_error_aborts_without_posing() {
        let (mut skeleton, ids) = straight_chain(&["root", "mid", "tip"], 1.0);
        let positions: Vec<_> = ids.iter().map(|b| skeleton.world_position(b)).collect();

        let solver = IkSolver::with_defaults();
        // Inverted tip/root is not resolvable.
        let err = solver
            .solve(&mut skeleton, &ids[0], &ids[2], Point3::new(1.0, 1.0, 0.0))
            .unwrap_err();

        assert!(matches!(
            err,
            MarionetteError::Chain(ChainError::RootNotAncestor { .. })
        ));
        for (bone, position) in ids.iter().zip(&positions) {
            assert_eq!(skeleton.world_position(bone), *position);
        }
    }

    #[test]
    fn degenerate_chain_is_rejected() {
        let (mut skeleton, ids) = straight_chain(&["root", "tip"], 1.0);
        let solver = IkSolver::with_defaults();
        let err = solver
            .solve(&mut skeleton, &ids[1], &ids[1], Point3::origin())
            .unwrap_err();
        assert!(matches!(
            err,
            MarionetteError::Chain(ChainError::Degenerate(_))
        ));
    }
}
