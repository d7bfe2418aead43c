//! Core library for Wallsmith.
//!
//! Wallsmith turns text and box models into wall objects for beatmap
//! modcharts. The central path is [`Text`], which lays out copies of a
//! letter model's pieces, and [`WallConverter`], which corrects those pieces
//! into wall space, bakes their animation and spreads their spawn times.
//! The remaining modules hold the math, easing and color helpers the
//! pipeline is built on.

pub mod animation;
pub mod bounds;
pub mod color;
pub mod config;
pub mod convert;
pub mod easing;
pub mod error;
pub mod keyframe;
pub mod math;
pub mod model;
pub mod text;
pub mod transform;
pub mod wall;

pub use animation::{bake, BakedTransform, Channel, OptimizeSettings, TransformSample};
pub use bounds::{box_bounds, Bounds};
pub use config::{AppConfig, HorizontalAnchor, TextConfig, VerticalAnchor};
pub use convert::{Stagger, WallConverter, WallOptions};
pub use easing::Easing;
pub use error::{Result, WallsmithError};
pub use keyframe::{FlagMatch, Keyframe, RawElement};
pub use math::Vec3;
pub use model::{Color, ModelLoader, ModelObject, ModelPiece};
pub use text::Text;
pub use transform::{combine_transforms, Transform};
pub use wall::{world_to_wall, WallAnimation, WallDescriptor, WallPlacement, WallSink};
