use std::collections::{hash_map::Entry, HashMap};

use crate::{
    bounds::Bounds,
    config::{HorizontalAnchor, TextConfig, VerticalAnchor},
    convert::WallConverter,
    math,
    model::{piece_bounds, ModelLoader, ModelObject, ModelPiece},
    transform::{combine_transforms, Transform},
    wall::{WallDescriptor, WallSink},
    Result, WallsmithError,
};

/// Pieces of one character and their combined bounds.
struct Letter {
    pieces: Vec<ModelPiece>,
    bounds: Bounds,
}

/// Spells strings with a letter model: a flat list of [`ModelPiece`]s where
/// every piece carries the track of the character it belongs to.
#[derive(Debug, Clone)]
pub struct Text {
    pub config: TextConfig,
    model: Vec<ModelPiece>,
    model_height: f64,
}

impl Text {
    pub fn new(model: Vec<ModelPiece>) -> Result<Self> {
        Self::from_config(model, TextConfig::default())
    }

    pub fn from_config(model: Vec<ModelPiece>, config: TextConfig) -> Result<Self> {
        let mut text = Self {
            config,
            model: Vec::new(),
            model_height: 0.0,
        };
        text.import(model)?;
        Ok(text)
    }

    /// Replaces the letter model and measures its height.
    pub fn import(&mut self, model: Vec<ModelPiece>) -> Result<()> {
        let height = piece_bounds(&model)?.height();
        if height <= 0.0 {
            return Err(WallsmithError::invalid("letter model has no height"));
        }

        tracing::debug!(pieces = model.len(), height, "imported letter model");
        self.model = model;
        self.model_height = height;
        Ok(())
    }

    pub fn import_from<L>(&mut self, loader: &L, identifier: &str) -> Result<()>
    where
        L: ModelLoader + ?Sized,
    {
        let model = loader.load(identifier)?;
        self.import(model)
    }

    pub fn model(&self) -> &[ModelPiece] {
        &self.model
    }

    /// Vertical extent of the whole letter model.
    pub fn model_height(&self) -> f64 {
        self.model_height
    }

    /// Advance of one letter cell, in model units.
    pub fn letter_width(&self) -> f64 {
        self.model_height * self.config.letter_spacing
    }

    fn letter(&self, character: char) -> Result<Option<Letter>> {
        let mut buf = [0; 4];
        let track = &*character.encode_utf8(&mut buf);
        let pieces: Vec<ModelPiece> = self
            .model
            .iter()
            .filter(|piece| piece.track.as_deref() == Some(track))
            .cloned()
            .collect();

        if pieces.is_empty() {
            return Ok(None);
        }
        let bounds = piece_bounds(&pieces)?;
        Ok(Some(Letter { pieces, bounds }))
    }

    /// Positions a copy of the model pieces for every character of `text`.
    ///
    /// Spaces advance by a word gap and emit nothing. Characters without
    /// pieces are skipped without advancing, unless strict mode is on.
    pub fn to_objects(&self, text: &str) -> Result<Vec<ModelPiece>> {
        let config = &self.config;
        let letter_width = self.letter_width();
        let mut letters: HashMap<char, Option<Letter>> = HashMap::new();
        let mut objects = Vec::new();
        let mut length = 0.0;

        for character in text.chars() {
            if character == ' ' {
                length += letter_width * config.word_spacing;
                continue;
            }

            let letter = match letters.entry(character) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(self.letter(character)?),
            };
            let Some(letter) = letter else {
                if config.strict {
                    return Err(WallsmithError::MissingGlyph(character));
                }
                tracing::debug!(%character, "no model pieces for character, skipping");
                continue;
            };

            let low = letter.bounds.low_bound;
            let shift_x = length - low[0] + (letter_width - letter.bounds.width()) / 2.0;
            for piece in &letter.pieces {
                let mut placed = piece.clone();
                placed.pos[0] += shift_x;
                placed.pos[2] -= low[2];
                objects.push(placed);
            }
            length += letter_width;
        }

        let scalar = config.height / self.model_height;
        let global = Transform {
            pos: config.position,
            rot: config.rotation,
            scale: config.scale,
        };

        for object in &mut objects {
            match config.horizontal_anchor {
                HorizontalAnchor::Left => {}
                HorizontalAnchor::Center => object.pos[0] -= length / 2.0,
                HorizontalAnchor::Right => object.pos[0] -= length,
            }

            object.pos = math::scale(object.pos, scalar);
            object.scale = math::scale(object.scale, scalar);

            if !global.is_unset() {
                let combined = combine_transforms(&object.transform(), &global, math::ZERO);
                object.set_transform(&combined);
            }

            match config.vertical_anchor {
                VerticalAnchor::Bottom => {}
                VerticalAnchor::Center => object.pos[1] -= config.height / 2.0,
                VerticalAnchor::Top => object.pos[1] -= config.height,
            }
        }

        tracing::debug!(text, objects = objects.len(), width = length * scalar, "laid out text");
        Ok(objects)
    }

    /// Lays out `text` and converts every piece into a wall alive over
    /// `[start, end)`.
    pub fn to_walls<F, S>(
        &self,
        text: &str,
        start: f64,
        end: f64,
        converter: &mut WallConverter,
        on_wall: F,
        sink: &mut S,
    ) -> Result<usize>
    where
        F: FnMut(&mut WallDescriptor),
        S: WallSink + ?Sized,
    {
        let objects: Vec<ModelObject> = self
            .to_objects(text)?
            .into_iter()
            .map(ModelObject::from)
            .collect();
        converter.convert(&objects, start, end, on_wall, sink)
    }
}
