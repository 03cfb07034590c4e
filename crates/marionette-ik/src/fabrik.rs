//! Forward-And-Backward Reaching IK solver.
//!
//! FABRIK treats the joints as free points: a forward pass pins the tip to
//! the target and walks inward, a backward pass pins the root back to its
//! original position and walks outward, both preserving segment lengths
//! exactly. Orientations are reconstructed afterwards from the original
//! versus solved segment directions.

use nalgebra::Point3;

use marionette_core::skeleton::SkeletonPose;

use crate::chain::BoneChain;
use crate::rotation::delta_rotation;
use crate::solver::SolveOutcome;

/// Pose `chain` so its tip approaches `target`.
///
/// If the target lies beyond the chain's total reach, the chain is
/// stretched deterministically into a straight line toward it without
/// iterating. Otherwise the forward/backward passes run until the tip is
/// within `precision` or `max_iterations` is exhausted.
pub fn solve<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    target: Point3<f32>,
    precision: f32,
    max_iterations: u32,
) -> SolveOutcome {
    let bones = chain.bones();
    let tip = chain.tip();

    // Original positions (for orientation reconstruction) and segment
    // lengths (invariant through every pass).
    let original: Vec<Point3<f32>> = bones.iter().map(|b| skeleton.world_position(b)).collect();
    let lengths: Vec<f32> = original
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).norm())
        .collect();
    let reach: f32 = lengths.iter().sum();

    let root_position = original[0];
    let mut iterations = 0;

    if (target - root_position).norm() > reach {
        // Unreachable: stretch straight toward the target, re-reading each
        // joint so every step works from the previous placement.
        for (index, length) in lengths.iter().enumerate() {
            let position = skeleton.world_position(&bones[index]);
            let to_target = target - position;
            let lambda = length / to_target.norm();
            skeleton.set_world_position(&bones[index + 1], position + to_target * lambda);
        }
    } else {
        let mut distance = (skeleton.world_position(tip) - target).norm();

        while distance > precision && iterations < max_iterations {
            iterations += 1;

            // Forward reaching: pin the tip to the target, walk in to the root.
            skeleton.set_world_position(tip, target);
            for index in (0..lengths.len()).rev() {
                let position = skeleton.world_position(&bones[index]);
                let child = skeleton.world_position(&bones[index + 1]);
                let lambda = lengths[index] / (position - child).norm();
                skeleton.set_world_position(&bones[index], child + (position - child) * lambda);
            }

            // Backward reaching: pin the root back, walk out to the tip.
            skeleton.set_world_position(chain.root(), root_position);
            for (index, length) in lengths.iter().enumerate() {
                let position = skeleton.world_position(&bones[index]);
                let child = skeleton.world_position(&bones[index + 1]);
                let lambda = length / (child - position).norm();
                skeleton.set_world_position(&bones[index + 1], position + (child - position) * lambda);
            }

            distance = (skeleton.world_position(tip) - target).norm();
        }
    }

    reconstruct_orientations(skeleton, chain, &original);

    let distance = (skeleton.world_position(tip) - target).norm();
    SolveOutcome {
        converged: distance <= precision,
        iterations,
        distance,
    }
}

/// Rotate each joint by the delta between its original and solved segment
/// directions, then re-assert the solved joint positions.
///
/// The re-assert is a no-op for stores with independent per-bone positions;
/// for stores that carry a subtree along with an orientation write it
/// restores the positions the passes computed, leaving position and
/// orientation consistent.
fn reconstruct_orientations<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    original: &[Point3<f32>],
) {
    let bones = chain.bones();
    let solved: Vec<Point3<f32>> = bones.iter().map(|b| skeleton.world_position(b)).collect();

    let mut rotated = false;
    for index in 0..bones.len() - 1 {
        let original_direction = original[index + 1] - original[index];
        let solved_direction = solved[index + 1] - solved[index];

        if let Some(delta) = delta_rotation(&original_direction, &solved_direction) {
            let mut orientation = delta * skeleton.world_orientation(&bones[index]);
            orientation.renormalize();
            skeleton.set_world_orientation(&bones[index], orientation);
            rotated = true;
        }
    }

    if rotated {
        for (bone, position) in bones.iter().zip(&solved) {
            skeleton.set_world_position(bone, *position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marionette_test_utils::{straight_chain, TestSkeleton};
    use marionette_core::types::BoneId;

    fn segment_lengths<S: SkeletonPose>(skeleton: &S, bones: &[BoneId]) -> Vec<f32> {
        bones
            .windows(2)
            .map(|pair| {
                (skeleton.world_position(&pair[1]) - skeleton.world_position(&pair[0])).norm()
            })
            .collect()
    }

    #[test]
    fn converges_on_reachable_target() {
        let (mut skeleton, ids) = straight_chain(&["root", "a", "b", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[3], &ids[0]).unwrap();

        let target = Point3::new(1.5, 1.5, 0.0);
        let outcome = solve(&mut skeleton, &chain, target, 1e-3, 20);

        assert!(outcome.converged, "distance={}", outcome.distance);
        let tip = skeleton.world_position(&ids[3]);
        assert!((tip - target).norm() <= 1e-3);
    }

    #[test]
    fn preserves_segment_lengths() {
        let (mut skeleton, ids) = straight_chain(&["root", "a", "b", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[3], &ids[0]).unwrap();

        solve(&mut skeleton, &chain, Point3::new(1.2, 0.8, 0.7), 1e-4, 50);

        for length in segment_lengths(&skeleton, &ids) {
            assert_relative_eq!(length, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn root_stays_pinned() {
        let (mut skeleton, ids) = straight_chain(&["root", "a", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[2], &ids[0]).unwrap();

        solve(&mut skeleton, &chain, Point3::new(0.3, 1.1, 0.0), 1e-3, 20);

        let root = skeleton.world_position(&ids[0]);
        assert_relative_eq!(root.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(root.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(root.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn unreachable_target_stretches_straight() {
        // Two segments of length 5 rising along +Y; target 20 away on +X.
        let mut skeleton = TestSkeleton::new();
        let root = skeleton.add_root("root", Point3::origin());
        let mid = skeleton.add_bone("mid", &root, Point3::new(0.0, 5.0, 0.0));
        let tip = skeleton.add_bone("tip", &mid, Point3::new(0.0, 10.0, 0.0));
        let chain = BoneChain::resolve(&skeleton, &tip, &root).unwrap();

        let target = Point3::new(20.0, 0.0, 0.0);
        let initial_distance = (skeleton.world_position(&tip) - target).norm();

        let outcome = solve(&mut skeleton, &chain, target, 1.0, 10);

        // No iteration loop runs in the stretch branch.
        assert_eq!(outcome.iterations, 0);
        assert!(!outcome.converged);

        // Tip lies on the root-to-target line with lengths intact.
        let tip_position = skeleton.world_position(&tip);
        assert_relative_eq!(tip_position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(tip_position.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(tip_position.z, 0.0, epsilon = 1e-4);
        for length in segment_lengths(&skeleton, &[root, mid, tip]) {
            assert_relative_eq!(length, 5.0, epsilon = 1e-4);
        }
        assert!(outcome.distance < initial_distance);
    }

    #[test]
    fn no_mutation_when_already_within_precision() {
        let (mut skeleton, ids) = straight_chain(&["root", "a", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[2], &ids[0]).unwrap();

        let target = skeleton.world_position(&ids[2]);
        let positions: Vec<_> = ids.iter().map(|b| skeleton.world_position(b)).collect();
        let orientations: Vec<_> = ids.iter().map(|b| skeleton.world_orientation(b)).collect();

        let outcome = solve(&mut skeleton, &chain, target, 1e-3, 10);

        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 0);
        for ((bone, position), orientation) in ids.iter().zip(&positions).zip(&orientations) {
            assert_eq!(skeleton.world_position(bone), *position);
            assert_eq!(skeleton.world_orientation(bone), *orientation);
        }
    }

    #[test]
    fn reconstructs_orientations_toward_solved_directions() {
        let (mut skeleton, ids) = straight_chain(&["root", "tip", "extra"], 1.0);
        // Solve only root->tip; keep a child beyond the tip out of the chain.
        let chain = BoneChain::resolve(&skeleton, &ids[1], &ids[0]).unwrap();

        let target = Point3::new(0.0, 1.0, 0.0);
        solve(&mut skeleton, &chain, target, 1e-4, 30);

        // The root's local X should now point along the solved segment.
        let direction = (skeleton.world_position(&ids[1]) - skeleton.world_position(&ids[0]))
            .normalize();
        let axis = skeleton.local_axis(&ids[0], marionette_core::types::Axis::X);
        assert_relative_eq!(axis.dot(&direction), 1.0, epsilon = 1e-4);
    }
}
