use serde::{Deserialize, Serialize};

use crate::{
    animation::Channel,
    keyframe::Keyframe,
    math::{self, Vec3},
    model::Color,
};

/// Size of one wall unit in world units.
const WALL_UNIT: f64 = 0.6;
/// Walls render at twice their nominal scale.
const WALL_SCALE_FACTOR: f64 = 2.0;
const VERTICAL_CORRECTION: f64 = 0.2;

/// Corrected position and scale returned by [`world_to_wall`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPlacement {
    pub pos: Vec3,
    pub scale: Vec3,
}

/// Moves a centred world-space box so that a wall, whose pivot sits on a
/// corner and whose unit is 0.6 world units, covers the same volume.
///
/// Assumes the wall's grid position is `[0, 0]`. With `animated_scale` the X
/// correction is a fixed half unit, and the wall's static scale should be
/// left at one so the scale animation can carry the size.
pub fn world_to_wall(pos: Vec3, rot: Vec3, scale: Vec3, animated_scale: bool) -> WallPlacement {
    let scale = scale.map(|x| x / WALL_UNIT * WALL_SCALE_FACTOR);
    let pos = pos.map(|x| x / WALL_UNIT);

    let offset = math::rotate_point(math::mul([0.0, -0.5, -0.5], scale), rot);
    let mut pos = math::add(pos, offset);

    pos[1] += VERTICAL_CORRECTION;
    pos[0] -= if animated_scale { 0.5 } else { scale[0] / 2.0 };

    WallPlacement { pos, scale }
}

/// Keyed animation channels of a wall.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallAnimation {
    #[serde(default)]
    pub dissolve: Vec<Keyframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definite_position: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_rotation: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Channel>,
}

impl WallAnimation {
    /// Every channel that carries keyframes, dissolve included.
    pub fn keyframe_channels_mut(&mut self) -> impl Iterator<Item = &mut [Keyframe]> {
        let dissolve = std::iter::once(self.dissolve.as_mut_slice());
        let transforms = [
            self.definite_position.as_mut(),
            self.local_rotation.as_mut(),
            self.scale.as_mut(),
        ]
        .into_iter()
        .flatten()
        .filter_map(|channel| match channel {
            Channel::Complex(keyframes) => Some(keyframes.as_mut_slice()),
            Channel::Simple(_) => None,
        });
        dissolve.chain(transforms)
    }
}

/// A finished wall ready for submission to the beatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallDescriptor {
    /// Duration in beats.
    pub life: f64,
    /// Absolute beat the wall spawns at.
    pub life_start: f64,
    /// Grid position; model walls always sit at the origin.
    pub position: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_rotation: Option<Vec3>,
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub interactable: bool,
    pub fake: bool,
    pub animation: WallAnimation,
}

impl WallDescriptor {
    /// A decorative wall alive over `[start, end)`, fully visible from spawn.
    pub fn decoration(start: f64, end: f64) -> Self {
        Self {
            life: end - start,
            life_start: start,
            position: [0.0, 0.0],
            local_rotation: None,
            scale: math::ONE,
            color: None,
            interactable: false,
            fake: true,
            animation: WallAnimation {
                dissolve: vec![Keyframe::new([0.0], 0.0), Keyframe::new([1.0], 0.0)],
                ..WallAnimation::default()
            },
        }
    }
}

/// Destination that takes ownership of finished walls.
pub trait WallSink {
    fn emit(&mut self, wall: WallDescriptor);
}

impl WallSink for Vec<WallDescriptor> {
    fn emit(&mut self, wall: WallDescriptor) {
        self.push(wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::assert_vec3_near;

    #[test]
    fn unit_box_at_origin() {
        let placement = world_to_wall(math::ZERO, math::ZERO, math::ONE, false);
        let s = 1.0 / 0.6 * 2.0;
        assert_vec3_near(placement.scale, [s, s, s], 1e-12);
        // offset [0, -s/2, -s/2], then y + 0.2 and x - s/2
        assert_vec3_near(placement.pos, [-s / 2.0, -s / 2.0 + 0.2, -s / 2.0], 1e-12);
        assert!((placement.scale[0] - 3.3333).abs() < 1e-3);
    }

    #[test]
    fn animated_scale_uses_fixed_half_unit() {
        let placement = world_to_wall(math::ZERO, math::ZERO, [3.0, 1.0, 1.0], true);
        let s = 1.0 / 0.6 * 2.0;
        assert_vec3_near(placement.pos, [-0.5, -s / 2.0 + 0.2, -s / 2.0], 1e-12);
    }

    #[test]
    fn position_is_divided_by_wall_unit_and_offset_rotated() {
        let placement = world_to_wall([0.6, 1.2, 0.0], [0.0, 90.0, 0.0], [0.3, 0.3, 0.3], false);
        // scale 1; offset [0, -0.5, -0.5] yawed 90 degrees becomes [-0.5, -0.5, 0]
        assert_vec3_near(placement.scale, [1.0, 1.0, 1.0], 1e-12);
        assert_vec3_near(placement.pos, [1.0 - 0.5 - 0.5, 2.0 - 0.5 + 0.2, 0.0], 1e-12);
    }

    #[test]
    fn decoration_walls_are_fake_and_visible() {
        let wall = WallDescriptor::decoration(4.0, 6.0);
        assert_eq!(wall.life, 2.0);
        assert_eq!(wall.life_start, 4.0);
        assert!(wall.fake && !wall.interactable);
        assert_eq!(wall.animation.dissolve.len(), 2);
    }

    #[test]
    fn serializes_with_engine_field_names() {
        let mut wall = WallDescriptor::decoration(0.0, 1.0);
        wall.animation.definite_position =
            Some(Channel::Complex(vec![Keyframe::new([1.0, 2.0, 3.0], 0.0)]));
        let json = serde_json::to_value(&wall).unwrap();
        assert_eq!(json["lifeStart"], 0.0);
        assert_eq!(json["animation"]["dissolve"], serde_json::json!([[0.0, 0.0], [1.0, 0.0]]));
        assert_eq!(
            json["animation"]["definitePosition"],
            serde_json::json!([[1.0, 2.0, 3.0, 0.0]])
        );
        assert!(json.get("localRotation").is_none());
    }

    #[test]
    fn keyframe_channels_skip_static_ones() {
        let mut wall = WallDescriptor::decoration(0.0, 1.0);
        wall.animation.local_rotation = Some(Channel::Simple(math::ZERO));
        wall.animation.scale = Some(Channel::Complex(vec![Keyframe::new(math::ONE, 0.0)]));
        assert_eq!(wall.animation.keyframe_channels_mut().count(), 2);
    }
}
