//! 2D root-motion extraction across the slot-0 mixing chain.
//!
//! Once per frame the extractor folds the delta-translation of one tracked
//! bone, across the active entry and everything it is still fading away
//! from, into a single vector, hands it to observers (and optionally the
//! owning transform), and neutralizes the bone's masked local offset so the
//! motion is expressed by the object instead of the skeleton.

use crate::data::Vec2;
use crate::ids::SubscriptionId;
use crate::library::AnimationLibrary;
use crate::skeleton::Skeleton;
use crate::state::{AnimationState, TrackEntry};
use serde::{Deserialize, Serialize};

/// Host-object stand-in the extracted delta can be applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

impl Transform {
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

/// Which bone drives motion and how the delta is consumed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RootMotionConfig {
    /// Bone whose translation is extracted. Unknown names fall back to the
    /// skeleton's root bone at bind time.
    pub source_bone: String,
    pub use_x: bool,
    pub use_y: bool,
    pub apply_to_transform: bool,
    /// Bones compensated when the source bone's offset is zeroed, preserving
    /// their position relative to it.
    pub sibling_bones: Vec<String>,
}

impl Default for RootMotionConfig {
    fn default() -> Self {
        Self {
            source_bone: "root".to_string(),
            use_x: true,
            use_y: false,
            apply_to_transform: true,
            sibling_bones: Vec::new(),
        }
    }
}

type MotionCallback = Box<dyn FnMut(Vec2)>;

#[derive(Clone, Debug)]
struct BoneBinding {
    bone: usize,
    siblings: Vec<usize>,
}

/// Per-frame root-motion extractor. Inert until bound to a skeleton.
pub struct RootMotion {
    cfg: RootMotionConfig,
    binding: Option<BoneBinding>,
    enabled: bool,
    listeners: Vec<(SubscriptionId, MotionCallback)>,
    next_listener: u32,
}

impl std::fmt::Debug for RootMotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootMotion")
            .field("cfg", &self.cfg)
            .field("binding", &self.binding)
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RootMotion {
    pub fn new(cfg: RootMotionConfig) -> Self {
        Self {
            cfg,
            binding: None,
            enabled: true,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn config(&self) -> &RootMotionConfig {
        &self.cfg
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Motion is only extracted while enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Resolve the configured bone names against a skeleton. An unknown
    /// source bone falls back to the root bone; unknown siblings are skipped.
    /// An empty skeleton leaves the extractor unbound.
    pub fn bind(&mut self, skeleton: &Skeleton) {
        if skeleton.is_empty() {
            self.binding = None;
            return;
        }
        let bone = match skeleton.find_bone_index(&self.cfg.source_bone) {
            Some(index) => index,
            None => {
                log::warn!(
                    "bone named {:?} could not be found; using the root bone",
                    self.cfg.source_bone
                );
                Skeleton::ROOT
            }
        };
        let mut siblings = Vec::with_capacity(self.cfg.sibling_bones.len());
        for name in &self.cfg.sibling_bones {
            match skeleton.find_bone_index(name) {
                Some(index) => siblings.push(index),
                None => log::debug!("sibling bone {:?} not present; skipping", name),
            }
        }
        self.binding = Some(BoneBinding { bone, siblings });
    }

    /// Re-point extraction at a different bone at runtime.
    pub fn set_source_bone(&mut self, name: &str, skeleton: &Skeleton) {
        self.cfg.source_bone = name.to_string();
        self.bind(skeleton);
    }

    /// Drop the skeleton binding; extraction becomes inert until rebound.
    /// When the skeleton is supplied it is returned to its setup pose so no
    /// half-extracted offsets linger. Idempotent.
    pub fn unbind(&mut self, skeleton: Option<&mut Skeleton>) {
        self.binding = None;
        if let Some(skeleton) = skeleton {
            skeleton.set_to_setup_pose();
        }
    }

    /// Register a motion observer. It fires every extracted frame, including
    /// frames whose delta is zero.
    pub fn on_motion(&mut self, callback: impl FnMut(Vec2) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Remove a registered observer; returns whether it was present. Nothing
    /// fires for an id after its removal.
    pub fn remove_listener(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Per-frame extraction over the chain rooted at track slot 0 (other
    /// slots never contribute motion). Call after the state has advanced and
    /// the pose has been applied.
    pub fn handle_update(
        &mut self,
        state: &AnimationState,
        library: &AnimationLibrary,
        skeleton: &mut Skeleton,
        transform: &mut Transform,
    ) -> Vec2 {
        if !self.enabled {
            return Vec2::ZERO;
        }
        let bone = match &self.binding {
            Some(binding) => binding.bone,
            None => return Vec2::ZERO,
        };

        let mut delta = Vec2::ZERO;
        let mut track = state.current(0);
        let mut next: Option<&TrackEntry> = None;
        while let Some(entry) = track {
            delta += Self::entry_delta(entry, next, bone, library);
            next = Some(entry);
            track = entry.mixing_from.as_deref();
        }

        if skeleton.flip_x {
            delta.x = -delta.x;
        }
        if skeleton.flip_y {
            delta.y = -delta.y;
        }
        if !self.cfg.use_x {
            delta.x = 0.0;
        }
        if !self.cfg.use_y {
            delta.y = 0.0;
        }

        if self.cfg.apply_to_transform {
            transform.translate(delta);
        }

        for (_, callback) in &mut self.listeners {
            callback(delta);
        }

        if !delta.is_zero() {
            if let Some(binding) = &self.binding {
                Self::rebase_bones(binding, &self.cfg, skeleton);
            }
        }
        delta
    }

    /// Raw delta for one chain link over its (previous, current) time pair,
    /// weighted by the link's mix contribution.
    fn entry_delta(
        entry: &TrackEntry,
        next: Option<&TrackEntry>,
        bone: usize,
        library: &AnimationLibrary,
    ) -> Vec2 {
        let anim = match library.get(entry.anim) {
            Some(anim) => anim,
            None => return Vec2::ZERO,
        };
        let timeline = match anim.find_translate_timeline(bone) {
            Some(timeline) => timeline,
            None => return Vec2::ZERO,
        };

        let start = entry.animation_last;
        let end = entry.animation_time(anim.duration);
        let raw = if start > end {
            // Wrapped past the end of the loop this frame: remaining distance
            // to the loop point plus the distance into the new iteration.
            (timeline.evaluate(end) - timeline.evaluate(0.0))
                + (timeline.evaluate(anim.duration) - timeline.evaluate(start))
        } else if start != end {
            timeline.evaluate(end) - timeline.evaluate(start)
        } else {
            return Vec2::ZERO;
        };

        let weight = match next {
            // An intermediate link fades out as the newer entry mixes in.
            Some(next) => entry.alpha * next.interrupt_alpha * (1.0 - next.mix_progress()),
            // The newest link fades in with its own mix.
            None => {
                if entry.mix_duration == 0.0 {
                    entry.alpha.min(1.0)
                } else {
                    (entry.alpha * (entry.mix_time / entry.mix_duration)).min(1.0)
                }
            }
        };
        raw * weight
    }

    /// Neutralize the tracked bone's masked offset, shifting each sibling by
    /// the same amount so their pose relative to the bone is preserved.
    fn rebase_bones(binding: &BoneBinding, cfg: &RootMotionConfig, skeleton: &mut Skeleton) {
        let offset = match skeleton.bone(binding.bone) {
            Some(bone) => bone.local(),
            None => return,
        };
        for &sibling in &binding.siblings {
            if let Some(bone) = skeleton.bone_mut(sibling) {
                if cfg.use_x {
                    bone.x -= offset.x;
                }
                if cfg.use_y {
                    bone.y -= offset.y;
                }
            }
        }
        if let Some(bone) = skeleton.bone_mut(binding.bone) {
            if cfg.use_x {
                bone.x = 0.0;
            }
            if cfg.use_y {
                bone.y = 0.0;
            }
        }
    }
}
