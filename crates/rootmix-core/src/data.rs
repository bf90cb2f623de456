//! Keyframed animation data consumed by the mixer and the extractor.
//!
//! Model:
//! - An Animation holds zero or more translation timelines, one per bone.
//! - Each TranslateTimeline has time-ordered keys (seconds, absolute offsets).
//! - evaluate(time) interpolates linearly between keys and holds both ends.

use serde::{Deserialize, Serialize};

use crate::ids::AnimId;

/// 2D vector used for bone offsets and motion deltas.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One keyframe of a translation timeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TranslateKey {
    /// Key time in seconds within the clip.
    pub time: f32,
    pub value: Vec2,
}

/// Translation keys for a single bone, ordered by ascending time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TranslateTimeline {
    /// Stable bone index within the owning skeleton.
    pub bone: usize,
    pub keys: Vec<TranslateKey>,
}

impl TranslateTimeline {
    pub fn new(bone: usize, keys: Vec<TranslateKey>) -> Self {
        Self { bone, keys }
    }

    /// Evaluate the bone offset at `time`, holding the first/last key outside
    /// the keyed range. An empty timeline evaluates to zero.
    pub fn evaluate(&self, time: f32) -> Vec2 {
        let keys = &self.keys;
        let n = keys.len();
        if n == 0 {
            return Vec2::ZERO;
        }
        if n == 1 || time <= keys[0].time {
            return keys[0].value;
        }
        if time >= keys[n - 1].time {
            return keys[n - 1].value;
        }
        for i in 0..(n - 1) {
            let k0 = &keys[i];
            let k1 = &keys[i + 1];
            if time >= k0.time && time <= k1.time {
                let denom = (k1.time - k0.time).max(f32::EPSILON);
                let t = (time - k0.time) / denom;
                return Vec2::new(
                    lerp(k0.value.x, k1.value.x, t),
                    lerp(k0.value.y, k1.value.y, t),
                );
            }
        }
        keys[n - 1].value
    }
}

/// A named clip with a fixed duration and per-bone translation timelines.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Animation {
    /// Internal id assigned when loaded into a library.
    #[serde(skip)]
    pub id: Option<AnimId>,
    pub name: String,
    /// Duration in seconds (authoritative for loop wrapping).
    pub duration: f32,
    pub timelines: Vec<TranslateTimeline>,
}

impl Animation {
    pub fn new(name: &str, duration: f32, timelines: Vec<TranslateTimeline>) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            duration,
            timelines,
        }
    }

    /// Translation timeline for a bone index, if the clip animates it.
    pub fn find_translate_timeline(&self, bone: usize) -> Option<&TranslateTimeline> {
        self.timelines.iter().find(|t| t.bone == bone)
    }

    /// Validate basic invariants (finite, non-decreasing key times, positive duration).
    pub fn validate_basic(&self) -> Result<(), String> {
        if !(self.duration > 0.0) || !self.duration.is_finite() {
            return Err(format!("animation '{}' duration must be > 0", self.name));
        }
        for timeline in &self.timelines {
            let mut last = -f32::INFINITY;
            for key in &timeline.keys {
                if !key.time.is_finite() || key.time < 0.0 {
                    return Err(format!(
                        "key times must be finite and >= 0 for bone {} in '{}'",
                        timeline.bone, self.name
                    ));
                }
                if key.time < last {
                    return Err(format!(
                        "key times must be non-decreasing for bone {} in '{}'",
                        timeline.bone, self.name
                    ));
                }
                last = key.time;
            }
        }
        Ok(())
    }
}
