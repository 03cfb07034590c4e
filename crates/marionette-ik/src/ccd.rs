//! Cyclic Coordinate Descent solver.
//!
//! Each iteration visits the joints tip-to-root (excluding the tip itself)
//! and rotates each one so the current tip direction swings onto the target
//! direction. Greedy and cheap; convergence is linear and an unreachable
//! target simply exhausts the iteration cap, which is an accepted outcome
//! rather than an error.

use nalgebra::Point3;

use marionette_core::skeleton::SkeletonPose;

use crate::chain::BoneChain;
use crate::rotation::delta_rotation;
use crate::solver::SolveOutcome;

/// Pose `chain` so its tip approaches `target`.
///
/// Runs until the tip is within `precision` of the target or
/// `max_iterations` full chain sweeps have been spent, whichever comes
/// first. Joints whose to-tip and to-target directions are parallel or
/// antiparallel are skipped for that sweep.
pub fn solve<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    target: Point3<f32>,
    precision: f32,
    max_iterations: u32,
) -> SolveOutcome {
    let bones = chain.bones();
    let tip = chain.tip();

    let mut distance = (skeleton.world_position(tip) - target).norm();
    let mut iterations = 0;

    while distance > precision && iterations < max_iterations {
        iterations += 1;

        for joint in bones[..bones.len() - 1].iter().rev() {
            // Tip moves as earlier joints rotate, so re-read it per joint.
            let tip_position = skeleton.world_position(tip);
            let joint_position = skeleton.world_position(joint);

            let to_tip = tip_position - joint_position;
            let to_target = target - joint_position;

            if let Some(delta) = delta_rotation(&to_tip, &to_target) {
                let mut orientation = delta * skeleton.world_orientation(joint);
                orientation.renormalize();
                skeleton.set_world_orientation(joint, orientation);
            }
        }

        distance = (skeleton.world_position(tip) - target).norm();
    }

    SolveOutcome {
        converged: distance <= precision,
        iterations,
        distance,
    }
}
