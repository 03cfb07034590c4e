//! Synthetic in-memory skeleton for tests and demos.

use std::collections::HashMap;

use nalgebra::{Point3, UnitQuaternion};

use marionette_core::skeleton::SkeletonPose;
use marionette_core::types::BoneId;

#[derive(Debug, Clone)]
struct BoneState {
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    position: Point3<f32>,
    orientation: UnitQuaternion<f32>,
}

/// In-memory bone-pose store with poseable-mesh write semantics.
///
/// Orientation writes rotate the bone's whole subtree rigidly about the
/// bone, the way a skinned mesh component behaves: rotating an upper arm
/// carries the hand with it. Position writes move only the addressed bone,
/// which is what FABRIK's reposition passes require.
#[derive(Debug, Clone, Default)]
pub struct TestSkeleton {
    bones: HashMap<BoneId, BoneState>,
}

impl TestSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parentless bone at `position` with identity orientation.
    ///
    /// # Panics
    ///
    /// Panics if a bone with the same name already exists.
    pub fn add_root(&mut self, name: impl Into<BoneId>, position: Point3<f32>) -> BoneId {
        self.insert(name.into(), None, position)
    }

    /// Add a child bone at `position` with identity orientation.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is unknown or the name is already taken.
    pub fn add_bone(
        &mut self,
        name: impl Into<BoneId>,
        parent: &BoneId,
        position: Point3<f32>,
    ) -> BoneId {
        assert!(self.bones.contains_key(parent), "unknown parent {parent}");
        let id = self.insert(name.into(), Some(parent.clone()), position);
        self.bones
            .get_mut(parent)
            .unwrap()
            .children
            .push(id.clone());
        id
    }

    pub fn contains(&self, bone: &BoneId) -> bool {
        self.bones.contains_key(bone)
    }

    fn insert(&mut self, id: BoneId, parent: Option<BoneId>, position: Point3<f32>) -> BoneId {
        let prev = self.bones.insert(
            id.clone(),
            BoneState {
                parent,
                children: Vec::new(),
                position,
                orientation: UnitQuaternion::identity(),
            },
        );
        assert!(prev.is_none(), "duplicate bone {id}");
        id
    }

    fn state(&self, bone: &BoneId) -> &BoneState {
        self.bones
            .get(bone)
            .unwrap_or_else(|| panic!("unknown bone {bone}"))
    }

    /// Rigidly transform every descendant of `bone` about `pivot`.
    fn rotate_subtree(&mut self, bone: &BoneId, pivot: Point3<f32>, delta: UnitQuaternion<f32>) {
        let children = self.state(bone).children.clone();
        for child in children {
            let state = self.bones.get_mut(&child).unwrap();
            state.position = pivot + delta * (state.position - pivot);
            state.orientation = delta * state.orientation;
            self.rotate_subtree(&child, pivot, delta);
        }
    }
}

impl SkeletonPose for TestSkeleton {
    fn parent(&self, bone: &BoneId) -> Option<BoneId> {
        self.state(bone).parent.clone()
    }

    fn world_position(&self, bone: &BoneId) -> Point3<f32> {
        self.state(bone).position
    }

    fn world_orientation(&self, bone: &BoneId) -> UnitQuaternion<f32> {
        self.state(bone).orientation
    }

    fn set_world_position(&mut self, bone: &BoneId, position: Point3<f32>) {
        self.bones
            .get_mut(bone)
            .unwrap_or_else(|| panic!("unknown bone {bone}"))
            .position = position;
    }

    fn set_world_orientation(&mut self, bone: &BoneId, orientation: UnitQuaternion<f32>) {
        let (pivot, delta) = {
            let state = self.state(bone);
            (state.position, orientation * state.orientation.inverse())
        };
        self.bones.get_mut(bone).unwrap().orientation = orientation;
        self.rotate_subtree(bone, pivot, delta);
    }
}

/// Build a straight chain along +X: `names[0]` is a root at the origin and
/// each following bone sits `segment` further along the X axis.
///
/// Returns the skeleton plus the bone ids in root-to-tip order.
///
/// # Panics
///
/// Panics if `names` is empty.
pub fn straight_chain(names: &[&str], segment: f32) -> (TestSkeleton, Vec<BoneId>) {
    assert!(!names.is_empty(), "chain needs at least one bone");
    let mut skeleton = TestSkeleton::new();
    let mut ids = Vec::with_capacity(names.len());
    let root = skeleton.add_root(names[0], Point3::origin());
    ids.push(root);
    for (index, name) in names.iter().enumerate().skip(1) {
        let position = Point3::new(segment * index as f32, 0.0, 0.0);
        let id = skeleton.add_bone(*name, &ids[index - 1], position);
        ids.push(id);
    }
    (skeleton, ids)
}
