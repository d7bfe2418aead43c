//! Animation keyframes.
//!
//! On disk a keyframe is a flat array such as `[x, y, z, 0.5, "easeInOutCubic"]`:
//! leading numeric values, a time, and trailing string flags. In memory it is
//! the explicit [`Keyframe`] record; the flat form only exists at the serde
//! boundary through [`RawElement`].

use serde::{Deserialize, Serialize};

use crate::{easing::Easing, WallsmithError};

/// How a flag is matched against the tokens stored in a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMatch<'a> {
    /// The token must equal the pattern.
    Exact(&'a str),
    /// The token must contain the pattern, e.g. `"ease"` finds `"easeOutQuad"`.
    Contains(&'a str),
}

impl FlagMatch<'_> {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            FlagMatch::Exact(pattern) => token == *pattern,
            FlagMatch::Contains(pattern) => token.contains(pattern),
        }
    }
}

pub const EASING_FLAG: FlagMatch<'static> = FlagMatch::Contains("ease");
pub const SPLINE_FLAG: FlagMatch<'static> = FlagMatch::Contains("spline");
pub const HSV_LERP_FLAG: FlagMatch<'static> = FlagMatch::Exact("hsvLerp");

/// One element of the flat keyframe encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawElement {
    Number(f64),
    Flag(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RawElement>", into = "Vec<RawElement>")]
pub struct Keyframe {
    pub values: Vec<f64>,
    pub time: f64,
    flags: Vec<String>,
}

impl Keyframe {
    pub fn new(values: impl Into<Vec<f64>>, time: f64) -> Self {
        Self {
            values: values.into(),
            time,
            flags: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.set_flag(flag, None);
        self
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// First flag token accepted by `matcher`.
    pub fn flag(&self, matcher: FlagMatch<'_>) -> Option<&str> {
        self.flags
            .iter()
            .map(String::as_str)
            .find(|token| matcher.matches(token))
    }

    pub fn has_flag(&self, matcher: FlagMatch<'_>) -> bool {
        self.flag(matcher).is_some()
    }

    /// Stores `value` as a flag.
    ///
    /// With `old`, every token containing `old` is removed first and `value` is
    /// appended. Without it, an identical token is overwritten in place and a
    /// new one is appended otherwise.
    pub fn set_flag(&mut self, value: impl Into<String>, old: Option<&str>) {
        let value = value.into();
        if let Some(old) = old {
            self.flags.retain(|token| !token.contains(old));
            self.flags.push(value);
            return;
        }

        match self.flags.iter_mut().find(|token| **token == value) {
            Some(token) => *token = value,
            None => self.flags.push(value),
        }
    }

    /// Removes every token accepted by `matcher`.
    pub fn remove_flag(&mut self, matcher: FlagMatch<'_>) {
        self.flags.retain(|token| !matcher.matches(token));
    }

    pub fn easing(&self) -> Option<&str> {
        self.flag(EASING_FLAG)
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.set_flag(easing.to_string(), Some("ease"));
    }

    /// The easing curve, if the easing flag names a known one.
    pub fn easing_curve(&self) -> Option<Easing> {
        let name = self.easing()?;
        match name.parse() {
            Ok(easing) => Some(easing),
            Err(_) => {
                tracing::warn!(easing = name, "unknown easing, interpolating linearly");
                None
            }
        }
    }

    pub fn spline(&self) -> Option<&str> {
        self.flag(SPLINE_FLAG)
    }

    pub fn set_spline(&mut self, spline: &str) {
        self.set_flag(spline, Some("spline"));
    }

    pub fn hsv_lerp(&self) -> bool {
        self.has_flag(HSV_LERP_FLAG)
    }

    pub fn set_hsv_lerp(&mut self, enabled: bool) {
        if enabled {
            self.set_flag("hsvLerp", None);
        } else {
            self.remove_flag(HSV_LERP_FLAG);
        }
    }

    /// True when the keyframe shapes interpolation into it.
    pub fn is_shaped(&self) -> bool {
        self.easing().is_some() || self.spline().is_some()
    }
}

impl TryFrom<Vec<RawElement>> for Keyframe {
    type Error = WallsmithError;

    fn try_from(raw: Vec<RawElement>) -> Result<Self, Self::Error> {
        let (time_index, time) = raw
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, element)| match element {
                RawElement::Number(time) => Some((index, *time)),
                RawElement::Flag(_) => None,
            })
            .ok_or_else(|| WallsmithError::MalformedKeyframe("no numeric time value".into()))?;

        let mut values = Vec::with_capacity(time_index);
        for element in &raw[..time_index] {
            match element {
                RawElement::Number(value) => values.push(*value),
                RawElement::Flag(flag) => {
                    return Err(WallsmithError::MalformedKeyframe(format!(
                        "flag `{flag}` found before the time value"
                    )))
                }
            }
        }

        let flags = raw
            .into_iter()
            .skip(time_index + 1)
            .filter_map(|element| match element {
                RawElement::Flag(flag) => Some(flag),
                RawElement::Number(_) => None,
            })
            .collect();

        Ok(Self {
            values,
            time,
            flags,
        })
    }
}

impl From<Keyframe> for Vec<RawElement> {
    fn from(keyframe: Keyframe) -> Self {
        keyframe
            .values
            .into_iter()
            .map(RawElement::Number)
            .chain(std::iter::once(RawElement::Number(keyframe.time)))
            .chain(keyframe.flags.into_iter().map(RawElement::Flag))
            .collect()
    }
}
