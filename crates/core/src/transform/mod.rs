use glam::DMat4;
use serde::{Deserialize, Serialize};

use crate::math::{self, Vec3};

/// A transform whose parts may be left unset. Unset position and rotation
/// read as zero, unset scale as one.
///
/// Rotations are Euler angles in degrees applied in intrinsic Y, X, Z order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        pos: None,
        rot: None,
        scale: None,
    };

    pub fn new(pos: Vec3, rot: Vec3, scale: Vec3) -> Self {
        Self {
            pos: Some(pos),
            rot: Some(rot),
            scale: Some(scale),
        }
    }

    pub fn pos(&self) -> Vec3 {
        self.pos.unwrap_or(math::ZERO)
    }

    pub fn rot(&self) -> Vec3 {
        self.rot.unwrap_or(math::ZERO)
    }

    pub fn scale(&self) -> Vec3 {
        self.scale.unwrap_or(math::ONE)
    }

    /// True when no part is set.
    pub fn is_unset(&self) -> bool {
        self.pos.is_none() && self.rot.is_none() && self.scale.is_none()
    }

    /// Translate, then rotate, then scale (`T * R * S`).
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            math::to_dvec3(self.scale()),
            math::euler_to_quat(self.rot()),
            math::to_dvec3(self.pos()),
        )
    }

    /// Decomposes an affine matrix into a fully populated transform.
    pub fn from_matrix(matrix: &DMat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self::new(
            translation.to_array(),
            math::quat_to_euler(rotation),
            scale.to_array(),
        )
    }

    /// The transform that undoes this one. Only exact for uniform scale or
    /// rotation-free transforms, as non-uniform scale under rotation shears.
    pub fn inverse(&self) -> Self {
        Self::from_matrix(&self.to_matrix().inverse())
    }
}

/// Re-expresses `target` inside the frame of `transform`, pivoting around
/// `anchor`. The result is `transform * (target - anchor)` and always has
/// every part set.
pub fn combine_transforms(target: &Transform, transform: &Transform, anchor: Vec3) -> Transform {
    let local = Transform {
        pos: Some(math::subtract(target.pos(), anchor)),
        ..*target
    };
    let combined = transform.to_matrix() * local.to_matrix();
    Transform::from_matrix(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{assert_vec3_near, ZERO};

    fn assert_transform_near(actual: &Transform, expected: &Transform) {
        assert_vec3_near(actual.pos(), expected.pos(), 1e-6);
        assert_vec3_near(actual.rot(), expected.rot(), 1e-6);
        assert_vec3_near(actual.scale(), expected.scale(), 1e-6);
    }

    fn sample() -> Transform {
        Transform::new([1.0, -2.0, 3.5], [20.0, 35.0, -15.0], [2.0, 2.0, 2.0])
    }

    #[test]
    fn identity_on_the_left_is_a_no_op() {
        let combined = combine_transforms(&Transform::IDENTITY, &sample(), ZERO);
        assert_transform_near(&combined, &sample());
    }

    #[test]
    fn identity_on_the_right_is_a_no_op() {
        let combined = combine_transforms(&sample(), &Transform::IDENTITY, ZERO);
        assert_transform_near(&combined, &sample());
    }

    #[test]
    fn composing_with_inverse_gives_identity() {
        let t = sample();
        let combined = combine_transforms(&t, &t.inverse(), ZERO);
        assert_transform_near(&combined, &Transform::new(ZERO, ZERO, [1.0, 1.0, 1.0]));
    }

    #[test]
    fn combined_result_is_fully_populated() {
        let combined = combine_transforms(&Transform::IDENTITY, &Transform::IDENTITY, ZERO);
        assert!(combined.pos.is_some() && combined.rot.is_some() && combined.scale.is_some());
    }

    #[test]
    fn outer_transform_moves_rotates_and_scales_target() {
        let target = Transform {
            pos: Some([1.0, 0.0, 0.0]),
            ..Transform::IDENTITY
        };
        let outer = Transform::new([0.0, 5.0, 0.0], [0.0, 90.0, 0.0], [2.0, 2.0, 2.0]);
        let combined = combine_transforms(&target, &outer, ZERO);

        // +X scaled to 2, yawed 90 degrees onto -Z, then lifted by 5.
        assert_vec3_near(combined.pos(), [0.0, 5.0, -2.0], 1e-9);
        assert_vec3_near(combined.rot(), [0.0, 90.0, 0.0], 1e-6);
        assert_vec3_near(combined.scale(), [2.0, 2.0, 2.0], 1e-9);
    }

    #[test]
    fn anchor_is_removed_before_composition() {
        let target = Transform {
            pos: Some([3.0, 3.0, 3.0]),
            ..Transform::IDENTITY
        };
        let combined = combine_transforms(&target, &Transform::IDENTITY, [1.0, 2.0, 3.0]);
        assert_vec3_near(combined.pos(), [2.0, 1.0, 0.0], 1e-12);
    }

    #[test]
    fn matrix_round_trip_keeps_pitch_yaw_roll() {
        let t = Transform::new(ZERO, [-30.0, 120.0, 45.0], [1.0, 3.0, 0.5]);
        assert_transform_near(&Transform::from_matrix(&t.to_matrix()), &t);
    }
}
