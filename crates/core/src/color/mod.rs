use rand::Rng;

use crate::{math, Result, WallsmithError};

pub type Rgba = [f64; 4];

fn parse_hex(hex: &str) -> Result<[f64; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(WallsmithError::invalid(format!(
            "only six-digit hex colors are allowed, got `{hex}`"
        )));
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|err| WallsmithError::invalid(format!("bad hex color `{hex}`: {err}")))?;
        *channel = math::round_to(f64::from(byte) / 255.0, 4);
    }
    Ok(rgb)
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn hex_to_rgb(hex: &str) -> Result<[f64; 3]> {
    parse_hex(hex)
}

/// Parses `#rrggbb` and appends the given alpha.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<Rgba> {
    let [r, g, b] = parse_hex(hex)?;
    Ok([r, g, b, alpha])
}

/// Converts hue/saturation/value (all in `[0, 1]`) to RGB, passing alpha through.
pub fn hsva_to_rgba([h, s, v, alpha]: Rgba) -> Rgba {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [r, g, b, alpha]
}

/// Converts RGB to hue in `[0, 1)` with saturation and value in `[0, 1]`.
pub fn rgba_to_hsva([r, g, b, alpha]: Rgba) -> Rgba {
    let v = r.max(g).max(b);
    let c = v - r.min(g).min(b);
    let h = if c == 0.0 {
        0.0
    } else if v == r {
        (g - b) / c
    } else if v == g {
        2.0 + (b - r) / c
    } else {
        4.0 + (r - g) / c
    };
    let h = if h < 0.0 { h + 6.0 } else { h };
    let s = if v == 0.0 { 0.0 } else { c / v };
    [h / 6.0, s, v, alpha]
}

pub fn multiply_color([r, g, b, a]: Rgba, rgb_mult: f64, alpha_mult: f64) -> Rgba {
    [r * rgb_mult, g * rgb_mult, b * rgb_mult, a * alpha_mult]
}

/// Randomly nudges the alpha channel by up to `intensity`. A missing alpha is
/// treated as 1. With `preserve_zeroes`, fully transparent colors are left alone.
pub fn flicker<R: Rng + ?Sized>(
    rng: &mut R,
    color: &[f64],
    intensity: f64,
    preserve_zeroes: bool,
) -> Vec<f64> {
    if color.len() < 3 {
        return color.to_vec();
    }
    let alpha = color.get(3).copied();
    if preserve_zeroes && alpha == Some(0.0) {
        return color.to_vec();
    }

    let alpha = alpha.unwrap_or(1.0) + math::random_number(rng, -intensity, intensity, 3);
    vec![color[0], color[1], color[2], alpha.abs()]
}
