//! Core configuration for rootmix-core.

use serde::{Deserialize, Serialize};

/// Configuration for state sizing and mixing defaults.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial track-slot capacity hint.
    pub initial_tracks: usize,
    /// Cross-fade duration (seconds) used when one animation interrupts
    /// another on the same slot. Zero switches instantly.
    pub default_mix: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_tracks: 4,
            default_mix: 0.2,
        }
    }
}
