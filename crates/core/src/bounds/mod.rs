use serde::{Deserialize, Serialize};

use crate::{
    math::{self, Vec3},
    transform::Transform,
    Result, WallsmithError,
};

const CORNERS: [Vec3; 8] = [
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
];

/// Axis-aligned world-space box around one or more transformed unit cubes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub low_bound: Vec3,
    pub high_bound: Vec3,
    /// Size of the box along each axis.
    pub scale: Vec3,
    pub mid_point: Vec3,
}

impl Bounds {
    fn from_corners(low_bound: Vec3, high_bound: Vec3) -> Self {
        let mut scale = math::ZERO;
        let mut mid_point = math::ZERO;
        for i in 0..3 {
            scale[i] = (high_bound[i] - low_bound[i]).abs();
            mid_point[i] = math::lerp(low_bound[i], high_bound[i], 0.5);
        }
        Self {
            low_bound,
            high_bound,
            scale,
            mid_point,
        }
    }

    pub fn width(&self) -> f64 {
        self.scale[0]
    }

    pub fn height(&self) -> f64 {
        self.scale[1]
    }
}

/// Treats each transform as a unit cube centred on its position and folds
/// the eight rotated, scaled and translated corners of every cube into one
/// bounding box.
pub fn box_bounds<'a, I>(boxes: I) -> Result<Bounds>
where
    I: IntoIterator<Item = &'a Transform>,
{
    let mut extent: Option<(Vec3, Vec3)> = None;

    for b in boxes {
        let (pos, rot, scale) = (b.pos(), b.rot(), b.scale());
        for corner in CORNERS {
            let local = [
                corner[0] / 2.0 * scale[0],
                corner[1] / 2.0 * scale[1],
                corner[2] / 2.0 * scale[2],
            ];
            let world = math::add(math::rotate_point(local, rot), pos);

            let (low, high) = extent.get_or_insert((world, world));
            for i in 0..3 {
                low[i] = low[i].min(world[i]);
                high[i] = high[i].max(world[i]);
            }
        }
    }

    let (low, high) = extent.ok_or(WallsmithError::EmptyBounds)?;
    Ok(Bounds::from_corners(low, high))
}
