//! Capability contract for an externally owned bone-pose store.
//!
//! The solver core never owns skeleton storage. Hosts expose their skeletal
//! representation through [`SkeletonPose`] and the solvers read and mutate
//! world-space poses by bone identifier. All reads are fresh: a solver never
//! assumes a value it read earlier is still current after a write.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::types::{Axis, BoneId};

/// World-space read/write access to a skeletal hierarchy.
///
/// Implementations decide how writes ripple through the hierarchy. A typical
/// poseable-mesh store rotates a bone's whole subtree when its orientation
/// changes, while position writes move a single joint; the solvers are
/// written against fresh reads and work with either choice.
///
/// Bones passed to the accessors are always obtained from [`Self::parent`]
/// walks, so implementations may treat unknown identifiers as a contract
/// violation and panic.
pub trait SkeletonPose {
    /// Parent of `bone`, or `None` at the hierarchy root.
    fn parent(&self, bone: &BoneId) -> Option<BoneId>;

    /// World-space position of `bone`.
    fn world_position(&self, bone: &BoneId) -> Point3<f32>;

    /// World-space orientation of `bone`.
    fn world_orientation(&self, bone: &BoneId) -> UnitQuaternion<f32>;

    /// Set the world-space position of `bone`. Used only by FABRIK during
    /// its reposition passes.
    fn set_world_position(&mut self, bone: &BoneId, position: Point3<f32>);

    /// Set the world-space orientation of `bone`. Used by all solvers to
    /// commit joint rotations.
    fn set_world_orientation(&mut self, bone: &BoneId, orientation: UnitQuaternion<f32>);

    /// World-space direction of the bone's local basis `axis`. Used by the
    /// Jacobian-based solvers. Not required to be normalized.
    fn local_axis(&self, bone: &BoneId, axis: Axis) -> Vector3<f32> {
        let mut basis = Vector3::zeros();
        basis[axis.index()] = 1.0;
        self.world_orientation(bone) * basis
    }
}
