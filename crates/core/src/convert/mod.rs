use serde::{Deserialize, Serialize};

use crate::{
    animation::{self, bake, Channel, OptimizeSettings},
    model::ModelObject,
    wall::{world_to_wall, WallDescriptor, WallSink},
    Result, WallsmithError,
};

pub const DEFAULT_ANIM_FREQ: f64 = 1.0 / 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WallOptions {
    /// Beats over which spawning is spread across the set. `None` or zero
    /// spawns every wall at `start`; negative values are rejected.
    pub distribution: Option<f64>,
    /// Sampling step for baking animated objects, in normalized time.
    pub anim_freq: f64,
    pub optimizer: OptimizeSettings,
}

impl Default for WallOptions {
    fn default() -> Self {
        Self {
            distribution: Some(1.0),
            anim_freq: DEFAULT_ANIM_FREQ,
            optimizer: OptimizeSettings::default(),
        }
    }
}

/// Timing adjustments for one wall of a distributed set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    /// How many beats earlier than `start` the wall spawns.
    pub backward_offset: f64,
    pub new_life: f64,
    /// Keyframe times are remapped to `t * anim_mul + anim_add`.
    pub anim_mul: f64,
    pub anim_add: f64,
}

impl Stagger {
    /// Stagger for wall `index` of `count`. The first wall gets the full
    /// `distribution` offset, the last one none. `None` for sets of fewer
    /// than two walls.
    pub fn new(index: usize, count: usize, distribution: f64, duration: f64) -> Option<Self> {
        if count < 2 {
            return None;
        }

        let fraction = (count - 1 - index) as f64 / (count - 1) as f64;
        let backward_offset = distribution * fraction;
        let new_life = duration + backward_offset;
        let anim_mul = duration / new_life;
        Some(Self {
            backward_offset,
            new_life,
            anim_mul,
            anim_add: 1.0 - anim_mul,
        })
    }

    /// Stretches the wall's life backwards and squeezes its keyframes into
    /// the tail so the motion still ends at the original end time.
    pub fn apply(&self, wall: &mut WallDescriptor, start: f64) {
        wall.life = self.new_life;
        wall.life_start = start - self.backward_offset;
        for keyframes in wall.animation.keyframe_channels_mut() {
            animation::retime(keyframes, self.anim_mul, self.anim_add);
        }
    }
}

/// Converts batches of model objects into walls. Each call to
/// [`WallConverter::convert`] is numbered so its log lines can be told apart.
#[derive(Debug, Default)]
pub struct WallConverter {
    options: WallOptions,
    batches: u64,
}

impl WallConverter {
    pub fn new(options: WallOptions) -> Self {
        Self {
            options,
            batches: 0,
        }
    }

    pub fn options(&self) -> &WallOptions {
        &self.options
    }

    /// Number of batches converted so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }

    /// Emits one wall per object, in input order, alive over `[start, end)`.
    /// `on_wall` sees every wall before it reaches `sink`. Returns the number
    /// of walls emitted.
    pub fn convert<F, S>(
        &mut self,
        objects: &[ModelObject],
        start: f64,
        end: f64,
        mut on_wall: F,
        sink: &mut S,
    ) -> Result<usize>
    where
        F: FnMut(&mut WallDescriptor),
        S: WallSink + ?Sized,
    {
        let duration = end - start;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(WallsmithError::invalid(format!(
                "wall lifespan must be positive, got {start}..{end}"
            )));
        }
        if let Some(distribution) = self.options.distribution {
            if !(distribution.is_finite() && distribution >= 0.0) {
                return Err(WallsmithError::invalid(format!(
                    "wall distribution must be zero or positive, got {distribution}"
                )));
            }
        }

        self.batches += 1;
        let span = tracing::debug_span!("model_to_wall", batch = self.batches);
        let _guard = span.enter();

        let walls = objects
            .iter()
            .map(|object| self.build_wall(object, start, end))
            .collect::<Result<Vec<_>>>()?;

        let count = walls.len();
        let distribution = self.options.distribution.filter(|d| *d != 0.0);
        for (index, mut wall) in walls.into_iter().enumerate() {
            if let Some(stagger) =
                distribution.and_then(|d| Stagger::new(index, count, d, duration))
            {
                stagger.apply(&mut wall, start);
            }

            on_wall(&mut wall);
            sink.emit(wall);
        }

        tracing::info!(walls = count, start, end, "converted model to walls");
        Ok(count)
    }

    fn build_wall(&self, object: &ModelObject, start: f64, end: f64) -> Result<WallDescriptor> {
        let animated = object.is_animated();
        let baked = bake(
            &object.pos,
            &object.rot,
            &object.scale,
            |sample| {
                let placement = world_to_wall(sample.pos, sample.rot, sample.scale, animated);
                sample.pos = placement.pos;
                sample.scale = placement.scale;
            },
            self.options.anim_freq,
            &self.options.optimizer,
        )?;

        let mut wall = WallDescriptor::decoration(start, end);
        wall.animation.definite_position = Some(baked.pos);
        wall.color = object.color.clone();

        match baked.rot {
            Channel::Simple(rot) => wall.local_rotation = Some(rot),
            complex => wall.animation.local_rotation = Some(complex),
        }
        match baked.scale {
            Channel::Simple(scale) => wall.scale = scale,
            complex => wall.animation.scale = Some(complex),
        }

        Ok(wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        keyframe::Keyframe,
        math::{self, assert_vec3_near},
        model::ModelPiece,
    };

    fn static_objects(count: usize) -> Vec<ModelObject> {
        (0..count)
            .map(|i| ModelPiece::new([i as f64, 0.0, 0.0], math::ZERO, math::ONE).into())
            .collect()
    }

    fn no_distribution() -> WallOptions {
        WallOptions {
            distribution: None,
            ..WallOptions::default()
        }
    }

    #[test]
    fn stagger_spreads_offsets_across_the_set() {
        let first = Stagger::new(0, 3, 1.0, 2.0).unwrap();
        assert_eq!(first.backward_offset, 1.0);
        assert_eq!(first.new_life, 3.0);

        let middle = Stagger::new(1, 3, 1.0, 2.0).unwrap();
        assert_eq!(middle.backward_offset, 0.5);
        assert_eq!(middle.new_life, 2.5);

        let last = Stagger::new(2, 3, 1.0, 2.0).unwrap();
        assert_eq!(last.backward_offset, 0.0);
        assert_eq!(last.new_life, 2.0);
        assert_eq!(last.anim_mul, 1.0);
        assert_eq!(last.anim_add, 0.0);

        assert!(Stagger::new(0, 1, 1.0, 2.0).is_none());
    }

    #[test]
    fn distributed_walls_start_earlier() {
        let mut walls: Vec<WallDescriptor> = Vec::new();
        let mut converter = WallConverter::new(WallOptions::default());
        let count = converter
            .convert(&static_objects(3), 0.0, 2.0, |_| {}, &mut walls)
            .unwrap();

        assert_eq!(count, 3);
        let starts: Vec<f64> = walls.iter().map(|w| w.life_start).collect();
        let lives: Vec<f64> = walls.iter().map(|w| w.life).collect();
        assert_eq!(starts, vec![-1.0, -0.5, 0.0]);
        assert_eq!(lives, vec![3.0, 2.5, 2.0]);
    }

    #[test]
    fn distribution_remaps_keyframe_times() {
        let mut walls: Vec<WallDescriptor> = Vec::new();
        let mut converter = WallConverter::new(WallOptions::default());
        converter
            .convert(&static_objects(3), 0.0, 2.0, |_| {}, &mut walls)
            .unwrap();

        // first wall: life 3, mul 2/3, add 1/3
        let dissolve_times: Vec<f64> = walls[0].animation.dissolve.iter().map(|k| k.time).collect();
        for time in dissolve_times {
            assert!((time - 1.0 / 3.0).abs() < 1e-12);
        }
        let position = walls[0].animation.definite_position.as_ref().unwrap();
        assert!((position.keyframes().unwrap()[0].time - 1.0 / 3.0).abs() < 1e-12);

        // last wall keeps its timing
        assert_eq!(walls[2].animation.dissolve[0].time, 0.0);
    }

    #[test]
    fn distribution_remaps_animated_rotation_and_scale() {
        let animated = ModelObject {
            pos: Channel::Simple(math::ZERO),
            rot: Channel::Simple(math::ZERO),
            scale: Channel::Complex(vec![
                Keyframe::new([1.0, 1.0, 1.0], 0.0),
                Keyframe::new([2.0, 2.0, 2.0], 1.0),
            ]),
            color: None,
            track: None,
        };
        let objects = vec![animated, static_objects(1).remove(0)];
        let mut walls: Vec<WallDescriptor> = Vec::new();
        WallConverter::new(WallOptions::default())
            .convert(&objects, 0.0, 2.0, |_| {}, &mut walls)
            .unwrap();

        // first of two walls: life 3, so t maps to t * 2/3 + 1/3
        let scale = walls[0].animation.scale.as_ref().unwrap();
        let times: Vec<f64> = scale.keyframes().unwrap().iter().map(|k| k.time).collect();
        assert_eq!(times.len(), 2);
        assert!((times[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((times[1] - 1.0).abs() < 1e-12);

        let rotation = walls[0].animation.local_rotation.as_ref().unwrap();
        for keyframe in rotation.keyframes().unwrap() {
            assert!((keyframe.time - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_negative_or_non_finite_distribution() {
        for distribution in [-2.0, f64::NAN, f64::INFINITY] {
            let mut walls: Vec<WallDescriptor> = Vec::new();
            let mut converter = WallConverter::new(WallOptions {
                distribution: Some(distribution),
                ..WallOptions::default()
            });
            let result = converter.convert(&static_objects(2), 0.0, 2.0, |_| {}, &mut walls);
            assert!(matches!(result, Err(WallsmithError::InvalidInput(_))));
            assert!(walls.is_empty());
            assert_eq!(converter.batches(), 0);
        }
    }

    #[test]
    fn single_wall_is_never_distributed() {
        let mut walls: Vec<WallDescriptor> = Vec::new();
        let mut converter = WallConverter::new(WallOptions::default());
        converter
            .convert(&static_objects(1), 4.0, 6.0, |_| {}, &mut walls)
            .unwrap();
        assert_eq!(walls[0].life_start, 4.0);
        assert_eq!(walls[0].life, 2.0);
    }

    #[test]
    fn static_objects_get_static_rotation_and_scale() {
        let object: ModelObject =
            ModelPiece::new([0.6, 0.0, 0.0], [0.0, 0.0, 10.0], [0.3, 0.3, 0.3])
                .with_color(vec![1.0, 0.5, 0.0])
                .into();
        let mut walls: Vec<WallDescriptor> = Vec::new();
        WallConverter::new(no_distribution())
            .convert(&[object], 0.0, 1.0, |_| {}, &mut walls)
            .unwrap();

        let wall = &walls[0];
        assert_eq!(wall.local_rotation, Some([0.0, 0.0, 10.0]));
        assert_vec3_near(wall.scale, [1.0, 1.0, 1.0], 1e-12);
        assert!(wall.animation.local_rotation.is_none());
        assert!(wall.animation.scale.is_none());
        assert_eq!(wall.color, Some(vec![1.0, 0.5, 0.0]));

        let expected = world_to_wall([0.6, 0.0, 0.0], [0.0, 0.0, 10.0], [0.3, 0.3, 0.3], false);
        let position = wall.animation.definite_position.as_ref().unwrap();
        assert_eq!(position.keyframes().unwrap().len(), 1);
        assert_vec3_near(position.sample(0.0).unwrap(), expected.pos, 1e-12);
    }

    #[test]
    fn animated_objects_are_baked() {
        let object = ModelObject {
            pos: Channel::Complex(vec![
                Keyframe::new([0.0, 0.0, 0.0], 0.0),
                Keyframe::new([0.0, 6.0, 0.0], 1.0),
            ]),
            rot: Channel::Simple(math::ZERO),
            scale: Channel::Simple(math::ONE),
            color: None,
            track: None,
        };
        let mut walls: Vec<WallDescriptor> = Vec::new();
        WallConverter::new(no_distribution())
            .convert(&[object], 0.0, 1.0, |_| {}, &mut walls)
            .unwrap();

        let wall = &walls[0];
        let position = wall.animation.definite_position.as_ref().unwrap();
        let end = world_to_wall([0.0, 6.0, 0.0], math::ZERO, math::ONE, true);
        assert_vec3_near(position.sample(1.0).unwrap(), end.pos, 1e-9);
        // a straight line optimizes down to its two ends
        assert_eq!(position.keyframes().unwrap().len(), 2);
        assert!(wall.animation.scale.is_some());
        assert!(wall.animation.local_rotation.is_some());
    }

    #[test]
    fn callback_sees_every_wall_before_the_sink() {
        let mut seen = 0;
        let mut walls: Vec<WallDescriptor> = Vec::new();
        WallConverter::new(no_distribution())
            .convert(
                &static_objects(4),
                0.0,
                1.0,
                |wall| {
                    seen += 1;
                    wall.color = Some(vec![0.0, 1.0, 0.0]);
                },
                &mut walls,
            )
            .unwrap();

        assert_eq!(seen, 4);
        assert!(walls.iter().all(|w| w.color == Some(vec![0.0, 1.0, 0.0])));
    }

    #[test]
    fn counts_batches_and_rejects_empty_lifespans() {
        let mut converter = WallConverter::default();
        let mut walls: Vec<WallDescriptor> = Vec::new();
        converter
            .convert(&static_objects(1), 0.0, 1.0, |_| {}, &mut walls)
            .unwrap();
        assert_eq!(converter.batches(), 1);

        let err = converter.convert(&static_objects(1), 1.0, 1.0, |_| {}, &mut walls);
        assert!(matches!(err, Err(WallsmithError::InvalidInput(_))));
        assert_eq!(converter.batches(), 1);
    }
}
