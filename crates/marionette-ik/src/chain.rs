//! Bone chain resolution from a skeletal hierarchy.
//!
//! A [`BoneChain`] is an ordered list of bone identifiers from the chain
//! root to the tip (end effector). It is derived fresh from the host's
//! parent links at the start of every solve call; callers with immutable
//! topology may resolve once and re-use the chain through
//! [`IkSolver::solve_chain`](crate::solver::IkSolver::solve_chain).

use log::warn;

use marionette_core::error::ChainError;
use marionette_core::skeleton::SkeletonPose;
use marionette_core::types::BoneId;

/// An ordered bone sequence from root to tip.
///
/// Invariants, enforced at construction: consecutive entries are
/// parent→child in the hierarchy, and the chain holds at least two bones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneChain {
    bones: Vec<BoneId>,
}

impl BoneChain {
    /// Walk the hierarchy from `tip` toward the root, collecting bones until
    /// `root` is found.
    ///
    /// # Errors
    ///
    /// - [`ChainError::Degenerate`] if `tip == root` (a chain needs at least
    ///   one segment).
    /// - [`ChainError::RootNotAncestor`] if the parent walk reaches the
    ///   hierarchy root without passing through `root`. No pose has been
    ///   written at this point, so the failed solve leaves the skeleton
    ///   untouched.
    pub fn resolve<S: SkeletonPose>(
        skeleton: &S,
        tip: &BoneId,
        root: &BoneId,
    ) -> Result<Self, ChainError> {
        if tip == root {
            return Err(ChainError::Degenerate(tip.clone()));
        }

        let mut bones = vec![tip.clone()];
        let mut current = tip.clone();
        while &current != root {
            match skeleton.parent(&current) {
                Some(parent) => {
                    bones.insert(0, parent.clone());
                    current = parent;
                }
                None => {
                    warn!("root '{root}' is not an ancestor of tip '{tip}'; aborting solve");
                    return Err(ChainError::RootNotAncestor {
                        tip: tip.clone(),
                        root: root.clone(),
                    });
                }
            }
        }

        Ok(Self { bones })
    }

    /// Bones in root-to-tip order.
    pub fn bones(&self) -> &[BoneId] {
        &self.bones
    }

    /// Number of bones in the chain (>= 2).
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Number of segments (joints that can rotate): `len() - 1`.
    pub fn links(&self) -> usize {
        self.bones.len() - 1
    }

    pub fn root(&self) -> &BoneId {
        &self.bones[0]
    }

    pub fn tip(&self) -> &BoneId {
        &self.bones[self.bones.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_test_utils::straight_chain;
    use nalgebra::Point3;

    #[test]
    fn resolves_root_to_tip_order() {
        let (skeleton, ids) = straight_chain(&["root", "a", "b", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[3], &ids[0]).unwrap();
        assert_eq!(chain.bones(), ids.as_slice());
        assert_eq!(chain.root(), &ids[0]);
        assert_eq!(chain.tip(), &ids[3]);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.links(), 3);
    }

    #[test]
    fn resolves_partial_chain() {
        let (skeleton, ids) = straight_chain(&["root", "a", "b", "tip"], 1.0);
        let chain = BoneChain::resolve(&skeleton, &ids[3], &ids[1]).unwrap();
        assert_eq!(chain.bones(), &ids[1..]);
    }

    #[test]
    fn rejects_non_ancestor_root() {
        let (mut skeleton, ids) = straight_chain(&["root", "a", "tip"], 1.0);
        let offshoot = skeleton.add_bone("offshoot", &ids[0], Point3::new(0.0, 1.0, 0.0));
        let err = BoneChain::resolve(&skeleton, &ids[2], &offshoot).unwrap_err();
        assert_eq!(
            err,
            ChainError::RootNotAncestor {
                tip: ids[2].clone(),
                root: offshoot,
            }
        );
    }

    #[test]
    fn rejects_inverted_chain() {
        // Walking from an ancestor never reaches a descendant.
        let (skeleton, ids) = straight_chain(&["root", "a", "tip"], 1.0);
        assert!(matches!(
            BoneChain::resolve(&skeleton, &ids[0], &ids[2]),
            Err(ChainError::RootNotAncestor { .. })
        ));
    }

    #[test]
    fn rejects_single_bone_chain() {
        let (skeleton, ids) = straight_chain(&["root", "tip"], 1.0);
        assert_eq!(
            BoneChain::resolve(&skeleton, &ids[1], &ids[1]),
            Err(ChainError::Degenerate(ids[1].clone()))
        );
    }
}
