//! Track slots and the cross-fade mixing chain.
//!
//! The state owns a growable array of track slots. Each occupied slot holds
//! the currently active [`TrackEntry`]; an entry's `mixing_from` links to the
//! entry it is cross-fading away from, forming a singly-linked chain that
//! terminates at the oldest, most-faded entry.
//!
//! Per-frame contract: `update(dt)` first (records previous animation times,
//! advances playback/mix clocks), then slot writes by the mixer, then
//! `apply()` to land the blended pose on a skeleton.

use crate::config::Config;
use crate::ids::AnimId;
use crate::library::AnimationLibrary;
use crate::skeleton::Skeleton;

/// Playback state for one animation on one track slot.
#[derive(Clone, Debug)]
pub struct TrackEntry {
    pub anim: AnimId,
    pub looping: bool,
    /// Slot-local playback clock in seconds; may exceed the clip duration.
    pub track_time: f32,
    /// Animation-local time at the previous frame.
    pub animation_last: f32,
    /// Blend weight, 0..1.
    pub alpha: f32,
    /// Carry-over weight of an interrupted cross-fade (1 when none was
    /// interrupted).
    pub interrupt_alpha: f32,
    /// Elapsed cross-fade time.
    pub mix_time: f32,
    /// Total cross-fade duration; zero counts as fully mixed.
    pub mix_duration: f32,
    /// The entry this one is fading away from, oldest at the chain tail.
    pub mixing_from: Option<Box<TrackEntry>>,
}

impl TrackEntry {
    pub fn new(anim: AnimId, looping: bool) -> Self {
        Self {
            anim,
            looping,
            track_time: 0.0,
            animation_last: 0.0,
            alpha: 1.0,
            interrupt_alpha: 1.0,
            mix_time: 0.0,
            mix_duration: 0.0,
            mixing_from: None,
        }
    }

    /// Animation-local time for a clip of `duration` seconds. Looped entries
    /// wrap by the duration; non-looped entries clamp at the end.
    pub fn animation_time(&self, duration: f32) -> f32 {
        if self.looping {
            if duration <= 0.0 {
                0.0
            } else {
                self.track_time % duration
            }
        } else {
            self.track_time.min(duration)
        }
    }

    /// Mix progress in [0, 1]; a zero mix duration counts as fully mixed.
    #[inline]
    pub fn mix_progress(&self) -> f32 {
        if self.mix_duration == 0.0 {
            1.0
        } else {
            (self.mix_time / self.mix_duration).min(1.0)
        }
    }

    fn advance(&mut self, dt: f32, library: &AnimationLibrary) {
        let duration = library.get(self.anim).map_or(0.0, |a| a.duration);
        self.animation_last = self.animation_time(duration);
        self.track_time += dt;
        self.mix_time += dt;
        if let Some(from) = self.mixing_from.as_deref_mut() {
            from.advance(dt, library);
        }
        // Retire a fully faded chain tail.
        if self.mixing_from.is_some() && self.mix_time >= self.mix_duration {
            self.mixing_from = None;
        }
    }
}

/// The track-slot array plus the operations the mixer and extractor consume.
#[derive(Debug, Default)]
pub struct AnimationState {
    tracks: Vec<Option<TrackEntry>>,
    default_mix: f32,
}

impl AnimationState {
    pub fn new(cfg: &Config) -> Self {
        Self {
            tracks: Vec::with_capacity(cfg.initial_tracks),
            default_mix: cfg.default_mix,
        }
    }

    /// Grow the slot array to hold at least `count` slots. Never shrinks.
    pub fn ensure_tracks(&mut self, count: usize) {
        if self.tracks.len() < count {
            self.tracks.resize_with(count, || None);
        }
    }

    #[inline]
    pub fn tracks_len(&self) -> usize {
        self.tracks.len()
    }

    pub fn track(&self, index: usize) -> Option<&TrackEntry> {
        self.tracks.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut TrackEntry> {
        self.tracks.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Currently active entry on a slot (the head of its mixing chain).
    pub fn current(&self, index: usize) -> Option<&TrackEntry> {
        self.track(index)
    }

    /// Start `anim` on `index`, cross-fading away from whatever was playing
    /// there. Interrupting an in-progress fade carries the interrupted
    /// entry's partial weight into the new entry's `interrupt_alpha`.
    pub fn set_animation(&mut self, index: usize, anim: AnimId, looping: bool) -> &mut TrackEntry {
        self.ensure_tracks(index + 1);
        let mut entry = TrackEntry::new(anim, looping);
        if let Some(from) = self.tracks[index].take() {
            entry.mix_duration = self.default_mix;
            if from.mixing_from.is_some() && from.mix_duration > 0.0 {
                entry.interrupt_alpha *= (from.mix_time / from.mix_duration).min(1.0);
            }
            entry.mixing_from = Some(Box::new(from));
        }
        self.tracks[index].insert(entry)
    }

    /// Install a prebuilt entry on a slot, replacing any chain already there.
    pub fn put_track(&mut self, index: usize, entry: TrackEntry) {
        self.ensure_tracks(index + 1);
        self.tracks[index] = Some(entry);
    }

    /// Clear a slot, dropping its whole mixing chain.
    pub fn clear_track(&mut self, index: usize) {
        if let Some(slot) = self.tracks.get_mut(index) {
            *slot = None;
        }
    }

    pub fn clear_tracks(&mut self) {
        for slot in &mut self.tracks {
            *slot = None;
        }
    }

    /// Advance playback and mix clocks for every chain, recording each
    /// entry's previous animation time and retiring fully faded tails.
    pub fn update(&mut self, dt: f32, library: &AnimationLibrary) {
        for slot in self.tracks.iter_mut().flatten() {
            slot.advance(dt, library);
        }
    }

    /// Mix the current pose into the skeleton's bone local offsets.
    ///
    /// Chains apply oldest-first; each entry pulls the pose toward
    /// `setup + timeline value` by its effective weight, which realizes the
    /// cross-fade without explicit per-bone bookkeeping.
    pub fn apply(&self, skeleton: &mut Skeleton, library: &AnimationLibrary) {
        for slot in self.tracks.iter().flatten() {
            Self::apply_entry(slot, 1.0, skeleton, library);
        }
    }

    fn apply_entry(
        entry: &TrackEntry,
        parent_alpha: f32,
        skeleton: &mut Skeleton,
        library: &AnimationLibrary,
    ) {
        if let Some(from) = entry.mixing_from.as_deref() {
            Self::apply_entry(from, parent_alpha * entry.interrupt_alpha, skeleton, library);
        }
        let anim = match library.get(entry.anim) {
            Some(anim) => anim,
            None => return,
        };
        let alpha = parent_alpha * entry.alpha * entry.mix_progress();
        if alpha <= 0.0 {
            return;
        }
        let time = entry.animation_time(anim.duration);
        for timeline in &anim.timelines {
            let value = timeline.evaluate(time);
            if let Some(bone) = skeleton.bone_mut(timeline.bone) {
                let target = bone.setup() + value;
                bone.x += (target.x - bone.x) * alpha;
                bone.y += (target.y - bone.y) * alpha;
            }
        }
    }
}
