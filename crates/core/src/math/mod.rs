use std::f64::consts::PI;

use glam::{DQuat, DVec3, EulerRot};
use rand::{seq::SliceRandom, Rng};

/// Three component vector used for position, Euler rotation (degrees) and scale.
pub type Vec3 = [f64; 3];

pub const ZERO: Vec3 = [0.0, 0.0, 0.0];
pub const ONE: Vec3 = [1.0, 1.0, 1.0];

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Elementwise `a - b`.
pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Subtracts the same value from every component.
pub fn subtract_scalar(a: Vec3, value: f64) -> Vec3 {
    a.map(|x| x - value)
}

pub fn mul(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

pub fn scale(a: Vec3, scalar: f64) -> Vec3 {
    a.map(|x| x * scalar)
}

/// A vector with every component set to `value`.
pub fn splat(value: f64) -> Vec3 {
    [value; 3]
}

/// Negates the X component.
pub fn mirror_x(v: Vec3) -> Vec3 {
    [-v[0], v[1], v[2]]
}

pub fn to_radians(v: Vec3) -> Vec3 {
    v.map(|x| x * (PI / 180.0))
}

pub fn to_degrees(v: Vec3) -> Vec3 {
    v.map(|x| x * (180.0 / PI))
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

pub fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}

pub(crate) fn to_dvec3(v: Vec3) -> DVec3 {
    DVec3::from_array(v)
}

/// Quaternion for an Euler rotation in degrees, applied in intrinsic
/// Y, X, Z order (yaw, pitch, roll).
pub(crate) fn euler_to_quat(euler_degrees: Vec3) -> DQuat {
    let [x, y, z] = to_radians(euler_degrees);
    DQuat::from_euler(EulerRot::YXZ, y, x, z)
}

/// Inverse of [`euler_to_quat`]; returns degrees as `[x, y, z]`.
pub(crate) fn quat_to_euler(q: DQuat) -> Vec3 {
    let (y, x, z) = q.to_euler(EulerRot::YXZ);
    to_degrees([x, y, z])
}

/// Rotates `point` around the origin by an Euler rotation in degrees.
pub fn rotate_point(point: Vec3, euler_degrees: Vec3) -> Vec3 {
    (euler_to_quat(euler_degrees) * to_dvec3(point)).to_array()
}

/// Linearly interpolates between two vectors.
pub fn interpolate_vec3(start: Vec3, end: Vec3, t: f64) -> Vec3 {
    add(start, scale(subtract(end, start), t))
}

/// Continues the line through `(start_time, start)` and `(end_time, end)`
/// to `desired_time`, which is expected to lie outside of the two times.
pub fn extrapolate_vec3(
    start: Vec3,
    end: Vec3,
    start_time: f64,
    end_time: f64,
    desired_time: f64,
) -> Vec3 {
    let difference = subtract(end, start);
    let span = end_time - start_time;
    if desired_time > end_time {
        add(end, scale(difference, (desired_time - end_time) / span))
    } else {
        subtract(start, scale(difference, (start_time - desired_time) / span))
    }
}

/// Numbers from `start` up to (excluding) `stop` in increments of `step`.
/// A zero step or a step pointing away from `stop` yields nothing.
pub fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    if step == 0.0 || (step > 0.0 && start >= stop) || (step < 0.0 && start <= stop) {
        return values;
    }

    let mut current = start;
    while (step > 0.0 && current < stop) || (step < 0.0 && current > stop) {
        values.push(current);
        current += step;
    }
    values
}

/// Rotation keyframes `[x, y, z, time]` performing `spins` full turns
/// around `axis` (0 = x, 1 = y, 2 = z) over the normalized `[0, 1]` range.
pub fn generate_spins(spins: u32, axis: usize, start: Vec3) -> Vec<[f64; 4]> {
    let mut frames = Vec::with_capacity(spins as usize * 3);
    let count = f64::from(spins);

    for i in 0..spins {
        for (step, angle) in [(0.0, 0.0), (0.5, 180.0), (1.0, 360.0)] {
            let mut rotation = start;
            if axis < 3 {
                rotation[axis] += angle;
            }
            let time = step / count + f64::from(i) / count;
            frames.push([rotation[0], rotation[1], rotation[2], time]);
        }
    }
    frames
}

/// Random float in `[min, max)` rounded to `decimals` places.
pub fn random_number<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, decimals: u32) -> f64 {
    round_to(min + rng.gen::<f64>() * (max - min), decimals)
}

/// Random float in `[-minmax, minmax)` rounded to `decimals` places.
pub fn random_mirror<R: Rng + ?Sized>(rng: &mut R, minmax: f64, decimals: u32) -> f64 {
    random_number(rng, -minmax, minmax, decimals)
}

/// Random integer in `[min, max]`, both ends inclusive.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.gen_range(min..=max)
}

pub fn random_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Random rotation angle in `[-180, 180)`.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    random_number(rng, -180.0, 180.0, 3)
}

#[cfg(test)]
pub(crate) fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f64) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() <= tolerance,
            "component {i}: {actual:?} != {expected:?}"
        );
    }
}
