use serde::{Deserialize, Serialize};

use crate::{
    animation::Channel,
    bounds::{box_bounds, Bounds},
    math::Vec3,
    transform::Transform,
    Result,
};

/// RGB or RGBA color with channels in `[0, 1]`.
pub type Color = Vec<f64>;

/// One static box of a model. Text models tag every piece with the track of
/// the character it draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPiece {
    pub pos: Vec3,
    pub rot: Vec3,
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl ModelPiece {
    pub fn new(pos: Vec3, rot: Vec3, scale: Vec3) -> Self {
        Self {
            pos,
            rot,
            scale,
            color: None,
            track: None,
        }
    }

    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.pos, self.rot, self.scale)
    }

    pub fn set_transform(&mut self, transform: &Transform) {
        self.pos = transform.pos();
        self.rot = transform.rot();
        self.scale = transform.scale();
    }
}

/// Bounding box around every piece.
pub fn piece_bounds(pieces: &[ModelPiece]) -> Result<Bounds> {
    let transforms: Vec<Transform> = pieces.iter().map(ModelPiece::transform).collect();
    box_bounds(&transforms)
}

/// Input to the wall converter. Unlike [`ModelPiece`] each channel may be
/// animated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelObject {
    pub pos: Channel,
    pub rot: Channel,
    pub scale: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl ModelObject {
    /// True if any transform channel is keyframed.
    pub fn is_animated(&self) -> bool {
        !self.pos.is_simple() || !self.rot.is_simple() || !self.scale.is_simple()
    }
}

impl From<ModelPiece> for ModelObject {
    fn from(piece: ModelPiece) -> Self {
        Self {
            pos: piece.pos.into(),
            rot: piece.rot.into(),
            scale: piece.scale.into(),
            color: piece.color,
            track: piece.track,
        }
    }
}

/// Source of model pieces addressed by an identifier such as a file path.
pub trait ModelLoader {
    fn load(&self, identifier: &str) -> Result<Vec<ModelPiece>>;
}

impl<F> ModelLoader for F
where
    F: Fn(&str) -> Result<Vec<ModelPiece>>,
{
    fn load(&self, identifier: &str) -> Result<Vec<ModelPiece>> {
        self(identifier)
    }
}
