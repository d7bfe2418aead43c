use std::{f64::consts::PI, fmt, str::FromStr};

use crate::{Result, WallsmithError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    Back,
    Elastic,
    Bounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

/// A named easing such as `easeInOutCubic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Step,
    Curve(Direction, Curve),
}

const CURVES: [(&str, Curve); 10] = [
    ("Quad", Curve::Quad),
    ("Cubic", Curve::Cubic),
    ("Quart", Curve::Quart),
    ("Quint", Curve::Quint),
    ("Sine", Curve::Sine),
    ("Expo", Curve::Expo),
    ("Circ", Curve::Circ),
    ("Back", Curve::Back),
    ("Elastic", Curve::Elastic),
    ("Bounce", Curve::Bounce),
];

impl Easing {
    /// Maps a normalized progress value through the curve.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Step => t.floor(),
            Easing::Curve(Direction::In, curve) => ease_in(curve, t),
            Easing::Curve(Direction::Out, curve) => 1.0 - ease_in(curve, 1.0 - t),
            Easing::Curve(Direction::InOut, curve) => {
                if t < 0.5 {
                    ease_in(curve, t * 2.0) / 2.0
                } else {
                    1.0 - ease_in(curve, (1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

fn ease_in(curve: Curve, t: f64) -> f64 {
    const BACK: f64 = 1.70158;
    match curve {
        Curve::Quad => t * t,
        Curve::Cubic => t.powi(3),
        Curve::Quart => t.powi(4),
        Curve::Quint => t.powi(5),
        Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
        Curve::Expo => ease_in_expo(t),
        Curve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        Curve::Back => (BACK + 1.0) * t.powi(3) - BACK * t * t,
        Curve::Elastic => {
            if t == 0.0 || t == 1.0 {
                t
            } else {
                -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * (2.0 * PI / 3.0)).sin()
            }
        }
        Curve::Bounce => 1.0 - bounce_out(1.0 - t),
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl FromStr for Easing {
    type Err = WallsmithError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "easeLinear" => return Ok(Easing::Linear),
            "easeStep" => return Ok(Easing::Step),
            _ => {}
        }

        let unknown = || WallsmithError::invalid(format!("unknown easing `{name}`"));
        let rest = name.strip_prefix("ease").ok_or_else(unknown)?;
        let (direction, curve_name) = if let Some(curve) = rest.strip_prefix("InOut") {
            (Direction::InOut, curve)
        } else if let Some(curve) = rest.strip_prefix("In") {
            (Direction::In, curve)
        } else if let Some(curve) = rest.strip_prefix("Out") {
            (Direction::Out, curve)
        } else {
            return Err(unknown());
        };

        CURVES
            .iter()
            .find(|(label, _)| *label == curve_name)
            .map(|(_, curve)| Easing::Curve(direction, *curve))
            .ok_or_else(unknown)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("easeLinear"),
            Easing::Step => f.write_str("easeStep"),
            Easing::Curve(direction, curve) => {
                let direction = match direction {
                    Direction::In => "In",
                    Direction::Out => "Out",
                    Direction::InOut => "InOut",
                };
                let curve = CURVES
                    .iter()
                    .find(|(_, c)| c == curve)
                    .map(|(label, _)| *label)
                    .unwrap_or_default();
                write!(f, "ease{direction}{curve}")
            }
        }
    }
}

pub fn ease_out_circ(t: f64) -> f64 {
    (1.0 - (t - 1.0).powi(2)).sqrt()
}

pub fn ease_out_expo(t: f64) -> f64 {
    if t == 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t)
    }
}

pub fn ease_in_expo(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * t - 10.0)
    }
}
