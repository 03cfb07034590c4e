//! Incremental rotation construction shared by the solvers.

use nalgebra::{UnitQuaternion, UnitVector3, Vector3};

/// Rotation taking the direction of `from` onto the direction of `to`.
///
/// Axis is `cross(from, to)`, angle is `acos(dot)` of the normalized
/// inputs. Returns `None` when either input has (near-)zero length or the
/// vectors are parallel/antiparallel, in which case the caller skips that
/// joint for the current step.
pub(crate) fn delta_rotation(
    from: &Vector3<f32>,
    to: &Vector3<f32>,
) -> Option<UnitQuaternion<f32>> {
    if from.norm_squared() <= f32::EPSILON || to.norm_squared() <= f32::EPSILON {
        return None;
    }
    let from = from.normalize();
    let to = to.normalize();

    let axis = from.cross(&to);
    if axis.norm_squared() <= 0.0 {
        return None;
    }

    let angle = from.dot(&to).clamp(-1.0, 1.0).acos();
    Some(UnitQuaternion::from_axis_angle(
        &UnitVector3::new_normalize(axis),
        angle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotates_from_onto_to() {
        let from = Vector3::new(2.0, 0.0, 0.0);
        let to = Vector3::new(0.0, 3.0, 0.0);
        let delta = delta_rotation(&from, &to).unwrap();
        let rotated = delta * from.normalize();
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn parallel_vectors_are_degenerate() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!(delta_rotation(&v, &(v * 2.0)).is_none());
    }

    #[test]
    fn antiparallel_vectors_are_degenerate() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!(delta_rotation(&v, &-v).is_none());
    }

    #[test]
    fn zero_vectors_are_degenerate() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!(delta_rotation(&Vector3::zeros(), &v).is_none());
        assert!(delta_rotation(&v, &Vector3::zeros()).is_none());
    }
}
