use serde::{Deserialize, Serialize};

use crate::{
    keyframe::Keyframe,
    math::{self, Vec3},
    Result, WallsmithError,
};

const CATMULL_ROM: &str = "splineCatmullRom";

/// Upper bound on the samples one bake may take per channel.
pub const MAX_BAKE_STEPS: usize = 1 << 20;

/// A transform channel: either one static vector or a time-ordered list of
/// keyframes over the normalized `[0, 1]` lifespan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    Simple(Vec3),
    Complex(Vec<Keyframe>),
}

impl Channel {
    pub fn is_simple(&self) -> bool {
        matches!(self, Channel::Simple(_))
    }

    pub fn keyframes(&self) -> Option<&[Keyframe]> {
        match self {
            Channel::Simple(_) => None,
            Channel::Complex(keyframes) => Some(keyframes.as_slice()),
        }
    }

    /// Value of the channel at normalized time `t`. `None` for an empty
    /// keyframe list.
    pub fn sample(&self, t: f64) -> Option<Vec3> {
        match self {
            Channel::Simple(value) => Some(*value),
            Channel::Complex(keyframes) => sample_keyframes(keyframes, t).map(|values| {
                let mut out = math::ZERO;
                for (slot, value) in out.iter_mut().zip(values) {
                    *slot = value;
                }
                out
            }),
        }
    }

    /// Rewrites every keyframe time `t` to `t * mul + add`. Simple channels
    /// are left untouched.
    pub fn retime(&mut self, mul: f64, add: f64) {
        if let Channel::Complex(keyframes) = self {
            retime(keyframes, mul, add);
        }
    }
}

impl From<Vec3> for Channel {
    fn from(value: Vec3) -> Self {
        Channel::Simple(value)
    }
}

pub fn retime(keyframes: &mut [Keyframe], mul: f64, add: f64) {
    for keyframe in keyframes {
        keyframe.time = keyframe.time * mul + add;
    }
}

/// Interpolated values of `keyframes` at time `t`.
///
/// Times before the first or after the last keyframe clamp to it. Between
/// keyframes the later keyframe's easing shapes the progress, and its
/// Catmull-Rom spline flag switches to a curve through the neighbours.
pub fn sample_keyframes(keyframes: &[Keyframe], t: f64) -> Option<Vec<f64>> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;
    if t <= first.time {
        return Some(first.values.clone());
    }
    if t >= last.time {
        return Some(last.values.clone());
    }

    let next = keyframes.iter().position(|k| k.time > t)?;
    let (a, b) = (&keyframes[next - 1], &keyframes[next]);
    let span = b.time - a.time;
    let mut fraction = if span > 0.0 { (t - a.time) / span } else { 1.0 };
    if let Some(easing) = b.easing_curve() {
        fraction = easing.apply(fraction);
    }

    if b.spline() == Some(CATMULL_ROM) {
        let before = if next >= 2 { &keyframes[next - 2] } else { a };
        let after = keyframes.get(next + 1).unwrap_or(b);
        return Some(catmull_rom(
            &before.values,
            &a.values,
            &b.values,
            &after.values,
            fraction,
        ));
    }

    Some(
        a.values
            .iter()
            .zip(&b.values)
            .map(|(from, to)| math::lerp(*from, *to, fraction))
            .collect(),
    )
}

fn catmull_rom(p0: &[f64], p1: &[f64], p2: &[f64], p3: &[f64], t: f64) -> Vec<f64> {
    let (t2, t3) = (t * t, t * t * t);
    (0..p1.len().min(p2.len()))
        .map(|i| {
            let v0 = p0.get(i).copied().unwrap_or(p1[i]);
            let v3 = p3.get(i).copied().unwrap_or(p2[i]);
            let (v1, v2) = (p1[i], p2[i]);
            0.5 * (2.0 * v1
                + (-v0 + v2) * t
                + (2.0 * v0 - 5.0 * v1 + 4.0 * v2 - v3) * t2
                + (-v0 + 3.0 * v1 - 3.0 * v2 + v3) * t3)
        })
        .collect()
}

/// Tolerances for dropping keyframes after baking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeSettings {
    /// Largest per-component error allowed when a keyframe is replaced by
    /// linear interpolation between its kept neighbours. Zero disables it.
    pub tolerance: f64,
    /// Drop keyframes that repeat both neighbours, and collapse channels
    /// whose values never change into a single keyframe.
    pub remove_duplicates: bool,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.03,
            remove_duplicates: true,
        }
    }
}

impl OptimizeSettings {
    /// Keeps every keyframe.
    pub fn disabled() -> Self {
        Self {
            tolerance: 0.0,
            remove_duplicates: false,
        }
    }

    pub fn optimize(&self, keyframes: Vec<Keyframe>) -> Vec<Keyframe> {
        if keyframes.len() < 2 {
            return keyframes;
        }

        if self.remove_duplicates && is_constant(&keyframes) {
            let values = keyframes[0].values.clone();
            return vec![Keyframe::new(values, 0.0)];
        }

        if keyframes.len() < 3 {
            return keyframes;
        }

        let last_index = keyframes.len() - 1;
        let mut kept: Vec<Keyframe> = Vec::with_capacity(keyframes.len());
        let mut anchor = 0;
        kept.push(keyframes[0].clone());

        for index in 1..last_index {
            let current = &keyframes[index];
            let next = &keyframes[index + 1];
            let droppable = !current.is_shaped()
                && !next.is_shaped()
                && self.covered(&keyframes[anchor], &keyframes[anchor + 1..=index], next);

            if !droppable {
                kept.push(current.clone());
                anchor = index;
            }
        }

        kept.push(keyframes[last_index].clone());
        kept
    }

    /// Whether every keyframe in `skipped` stays within tolerance of the
    /// straight line from `from` to `to`.
    fn covered(&self, from: &Keyframe, skipped: &[Keyframe], to: &Keyframe) -> bool {
        let span = to.time - from.time;
        skipped.iter().all(|keyframe| {
            if self.remove_duplicates
                && keyframe.values == from.values
                && keyframe.values == to.values
            {
                return true;
            }
            if self.tolerance <= 0.0 || span <= 0.0 {
                return false;
            }

            let fraction = (keyframe.time - from.time) / span;
            keyframe
                .values
                .iter()
                .zip(from.values.iter().zip(&to.values))
                .all(|(value, (a, b))| (math::lerp(*a, *b, fraction) - value).abs() <= self.tolerance)
        })
    }
}

fn is_constant(keyframes: &[Keyframe]) -> bool {
    let first = &keyframes[0];
    keyframes
        .iter()
        .all(|k| k.values == first.values && k.flags().is_empty())
}

/// One sampled transform handed to the per-sample correction during baking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSample {
    pub pos: Vec3,
    pub rot: Vec3,
    pub scale: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BakedTransform {
    pub pos: Channel,
    pub rot: Channel,
    pub scale: Channel,
}

/// Resamples position, rotation and scale, running `correction` on every
/// sample.
///
/// When all three channels are static the correction runs once, rotation and
/// scale stay static and position becomes a single keyframe. Otherwise every
/// channel is sampled every `step` across `[0, 1]` (1 included) and then
/// reduced with `optimizer`. Steps needing more than [`MAX_BAKE_STEPS`]
/// samples are rejected.
pub fn bake<F>(
    pos: &Channel,
    rot: &Channel,
    scale: &Channel,
    mut correction: F,
    step: f64,
    optimizer: &OptimizeSettings,
) -> Result<BakedTransform>
where
    F: FnMut(&mut TransformSample),
{
    if !(step.is_finite() && step > 0.0) {
        return Err(WallsmithError::invalid(format!(
            "animation sampling step must be positive, got {step}"
        )));
    }
    let steps = (1.0 / step).ceil();
    if steps > MAX_BAKE_STEPS as f64 {
        return Err(WallsmithError::invalid(format!(
            "animation sampling step {step} needs more than {MAX_BAKE_STEPS} samples"
        )));
    }
    let steps = steps as usize;

    let sample_at = |t: f64| -> Result<TransformSample> {
        let empty = || WallsmithError::invalid("animated channel has no keyframes");
        Ok(TransformSample {
            pos: pos.sample(t).ok_or_else(empty)?,
            rot: rot.sample(t).ok_or_else(empty)?,
            scale: scale.sample(t).ok_or_else(empty)?,
        })
    };

    if pos.is_simple() && rot.is_simple() && scale.is_simple() {
        let mut sample = sample_at(0.0)?;
        correction(&mut sample);
        return Ok(BakedTransform {
            pos: Channel::Complex(vec![Keyframe::new(sample.pos, 0.0)]),
            rot: Channel::Simple(sample.rot),
            scale: Channel::Simple(sample.scale),
        });
    }

    let mut pos_frames = Vec::with_capacity(steps + 1);
    let mut rot_frames = Vec::with_capacity(steps + 1);
    let mut scale_frames = Vec::with_capacity(steps + 1);

    for i in 0..=steps {
        let t = (i as f64 * step).min(1.0);
        let mut sample = sample_at(t)?;
        correction(&mut sample);
        pos_frames.push(Keyframe::new(sample.pos, t));
        rot_frames.push(Keyframe::new(sample.rot, t));
        scale_frames.push(Keyframe::new(sample.scale, t));
    }

    Ok(BakedTransform {
        pos: Channel::Complex(optimizer.optimize(pos_frames)),
        rot: Channel::Complex(optimizer.optimize(rot_frames)),
        scale: Channel::Complex(optimizer.optimize(scale_frames)),
    })
}
