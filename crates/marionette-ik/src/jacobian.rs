//! Jacobian-based solvers: transpose heuristic and damped pseudoinverse.
//!
//! Both methods linearize the tip position with respect to a rotation about
//! each joint's three world-space basis axes, giving a 3 x (3 * links)
//! matrix rebuilt from scratch on every call. They take a single step per
//! invocation; the host re-invokes them each frame and convergence is
//! amortized over the ticks.

use log::debug;
use nalgebra::{DMatrix, DVector, Point3, UnitQuaternion, UnitVector3, Vector3};

use marionette_core::skeleton::SkeletonPose;
use marionette_core::types::{Axis, BoneId};

use crate::chain::BoneChain;
use crate::solver::SolveOutcome;

/// One Jacobian-transpose step toward `target`.
///
/// The step scale is the line-search optimum along `Jᵀe`:
/// `alpha = dot(e, JJᵀe) / dot(JJᵀe, JJᵀe)`. A near-zero denominator means
/// no axis can move the tip, and the update is skipped.
pub fn solve_transpose<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    target: Point3<f32>,
    precision: f32,
) -> SolveOutcome {
    let tip_position = skeleton.world_position(chain.tip());
    let distance = (tip_position - target).norm();
    if distance <= precision {
        return SolveOutcome {
            converged: true,
            iterations: 0,
            distance,
        };
    }

    let jacobian = build_jacobian(skeleton, chain, tip_position);
    let error = error_vector(target, tip_position);

    let jjt = &jacobian * jacobian.transpose();
    let steered = jjt * &error;
    let alpha_bottom = steered.dot(&steered);
    if alpha_bottom <= f32::EPSILON {
        debug!("jacobian-transpose: degenerate step direction, skipping update");
        return SolveOutcome {
            converged: false,
            iterations: 0,
            distance,
        };
    }
    let alpha = error.dot(&steered) / alpha_bottom;

    let delta_theta = jacobian.transpose() * error * alpha;
    apply_axis_rotations(skeleton, chain, &delta_theta);

    finish(skeleton, chain, target, precision)
}

/// One damped-pseudoinverse step toward `target`.
///
/// Solves `(JᵀJ + damping² I)⁻¹ Jᵀ e`. The damping term keeps the normal
/// matrix invertible when the chain loses effective degrees of freedom; if
/// inversion fails regardless, the update is skipped.
pub fn solve_pseudoinverse<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    target: Point3<f32>,
    precision: f32,
    damping: f32,
) -> SolveOutcome {
    let tip_position = skeleton.world_position(chain.tip());
    let distance = (tip_position - target).norm();
    if distance <= precision {
        return SolveOutcome {
            converged: true,
            iterations: 0,
            distance,
        };
    }

    let jacobian = build_jacobian(skeleton, chain, tip_position);
    let error = error_vector(target, tip_position);

    let n = jacobian.ncols();
    let normal = jacobian.transpose() * &jacobian + DMatrix::identity(n, n) * (damping * damping);
    let Some(inverse) = normal.try_inverse() else {
        debug!("jacobian-pseudoinverse: normal matrix is singular, skipping update");
        return SolveOutcome {
            converged: false,
            iterations: 0,
            distance,
        };
    };

    let delta_theta = inverse * jacobian.transpose() * error;
    apply_axis_rotations(skeleton, chain, &delta_theta);

    finish(skeleton, chain, target, precision)
}

fn finish<S: SkeletonPose>(
    skeleton: &S,
    chain: &BoneChain,
    target: Point3<f32>,
    precision: f32,
) -> SolveOutcome {
    let distance = (skeleton.world_position(chain.tip()) - target).norm();
    SolveOutcome {
        converged: distance <= precision,
        iterations: 1,
        distance,
    }
}

fn error_vector(target: Point3<f32>, tip: Point3<f32>) -> DVector<f32> {
    let e = target - tip;
    DVector::from_column_slice(&[e.x, e.y, e.z])
}

/// Tip-velocity sensitivity to a rotation about each joint's world-space
/// basis axes: one 3-column block per joint, column = `cross(axis, tip -
/// joint)`. Degenerate axes and zero cross products leave zero columns.
fn build_jacobian<S: SkeletonPose>(
    skeleton: &S,
    chain: &BoneChain,
    tip_position: Point3<f32>,
) -> DMatrix<f32> {
    let links = chain.links();
    let mut jacobian = DMatrix::zeros(3, links * 3);

    for (index, joint) in chain.bones()[..links].iter().enumerate() {
        let joint_position = skeleton.world_position(joint);
        let to_tip = tip_position - joint_position;

        for axis in Axis::ALL {
            let Some(direction) = normalized_axis(skeleton, joint, axis) else {
                continue;
            };
            let column = direction.cross(&to_tip);
            if column.norm_squared() > 0.0 {
                let col = index * 3 + axis.index();
                for row in 0..3 {
                    jacobian[(row, col)] = column[row];
                }
            }
        }
    }

    jacobian
}

/// Apply one scalar rotation per local axis, composed X then Y then Z and
/// renormalized once after the full composition.
fn apply_axis_rotations<S: SkeletonPose>(
    skeleton: &mut S,
    chain: &BoneChain,
    delta_theta: &DVector<f32>,
) {
    let links = chain.links();

    for (index, joint) in chain.bones()[..links].iter().enumerate() {
        let mut orientation = skeleton.world_orientation(joint);

        for axis in Axis::ALL {
            let Some(direction) = normalized_axis(skeleton, joint, axis) else {
                continue;
            };
            let angle = delta_theta[index * 3 + axis.index()];
            let delta = UnitQuaternion::from_axis_angle(&UnitVector3::new_unchecked(direction), angle);
            orientation = delta * orientation;
        }

        orientation.renormalize();
        skeleton.set_world_orientation(joint, orientation);
    }
}

fn normalized_axis<S: SkeletonPose>(
    skeleton: &S,
    joint: &BoneId,
    axis: Axis,
) -> Option<Vector3<f32>> {
    let direction = skeleton.local_axis(joint, axis);
    if direction.norm_squared() <= f32::EPSILON {
        return None;
    }
    Some(direction.normalize())
}
