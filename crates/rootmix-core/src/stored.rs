//! JSON loader for animation libraries.
//!
//! The document references bones by name; they are resolved against the
//! target skeleton into stable indices at load time, and each animation is
//! validated before it is returned.
//!
//! ```json
//! {
//!   "animations": [
//!     {
//!       "name": "walk",
//!       "duration": 1.0,
//!       "timelines": [
//!         { "bone": "root", "keys": [{ "time": 0.0, "x": 0.0, "y": 0.0 }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::data::{Animation, TranslateKey, TranslateTimeline, Vec2};
use crate::skeleton::Skeleton;

/// Errors produced while loading an animation-library document.
#[derive(Debug, Error)]
pub enum StoredError {
    #[error("animation json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid animation {name:?}: {reason}")]
    Invalid { name: String, reason: String },
    #[error("unknown bone {bone:?} in animation {name:?}")]
    UnknownBone { name: String, bone: String },
}

/// Parse a library document, resolving bone names against `skeleton`.
pub fn parse_library_json(s: &str, skeleton: &Skeleton) -> Result<Vec<Animation>, StoredError> {
    let doc: StoredLibrary = serde_json::from_str(s)?;

    let mut animations = Vec::with_capacity(doc.animations.len());
    for raw in doc.animations {
        let mut timelines = Vec::with_capacity(raw.timelines.len());
        for timeline in raw.timelines {
            let bone = skeleton.find_bone_index(&timeline.bone).ok_or_else(|| {
                StoredError::UnknownBone {
                    name: raw.name.clone(),
                    bone: timeline.bone.clone(),
                }
            })?;
            let keys = timeline
                .keys
                .iter()
                .map(|k| TranslateKey {
                    time: k.time as f32,
                    value: Vec2::new(k.x as f32, k.y as f32),
                })
                .collect();
            timelines.push(TranslateTimeline::new(bone, keys));
        }

        let animation = Animation::new(&raw.name, raw.duration as f32, timelines);
        animation
            .validate_basic()
            .map_err(|reason| StoredError::Invalid {
                name: raw.name.clone(),
                reason,
            })?;
        animations.push(animation);
    }
    Ok(animations)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredLibrary {
    animations: Vec<StoredAnimation>,
}

#[derive(Debug, Deserialize)]
struct StoredAnimation {
    name: String,
    /// Seconds.
    duration: f64,
    #[serde(default)]
    timelines: Vec<StoredTimeline>,
}

#[derive(Debug, Deserialize)]
struct StoredTimeline {
    bone: String,
    keys: Vec<StoredKey>,
}

#[derive(Debug, Deserialize)]
struct StoredKey {
    time: f64,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}
