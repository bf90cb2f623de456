//! rootmix-core: channel blending and 2D root-motion extraction
//! (engine-agnostic).
//!
//! Two per-frame components share an animation state. The channel mixer maps
//! a sparse set of logical channel requests onto dense, ordered track slots,
//! reusing entries so cross-fades survive host-driven scrubbing. The
//! root-motion extractor folds the slot-0 mixing chain into a single 2D
//! delta, hands it to observers, and neutralizes the tracked bone so the
//! motion lands on the owning object instead of the skeleton.

pub mod config;
pub mod data;
pub mod ids;
pub mod library;
pub mod mixer;
pub mod root_motion;
pub mod skeleton;
pub mod state;
pub mod stored;

// Re-exports for consumers (hosts)
pub use config::Config;
pub use data::{Animation, TranslateKey, TranslateTimeline, Vec2};
pub use ids::{AnimId, SubscriptionId};
pub use library::AnimationLibrary;
pub use mixer::{BackgroundClip, BindingArgs, ChannelMixer, ChannelRequest, ExecMode};
pub use root_motion::{RootMotion, RootMotionConfig, Transform};
pub use skeleton::{Bone, Skeleton};
pub use state::{AnimationState, TrackEntry};
pub use stored::{parse_library_json, StoredError};
