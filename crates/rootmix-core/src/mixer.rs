//! Channel-to-slot mapping: the per-frame mixer that drives the state.
//!
//! A sequencing host registers sparse channel requests between
//! `on_frame_prepare` and `on_frame_apply`; the mixer lays them out on dense,
//! consecutive track slots in ascending channel-id order and keeps entries
//! alive across frames when the same-named animation stays on a slot, so
//! cross-fade state survives host-driven scrubbing.

use serde::{Deserialize, Serialize};

use crate::ids::AnimId;
use crate::library::AnimationLibrary;
use crate::skeleton::Skeleton;
use crate::state::AnimationState;

/// One background clip on a channel; plays at full weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BackgroundClip {
    pub anim: AnimId,
    pub time: f32,
}

/// Caller-supplied request for one logical channel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChannelRequest {
    pub channel: i32,
    pub animation: Option<AnimId>,
    pub time: f32,
    pub weight: f32,
    pub background: Vec<BackgroundClip>,
}

impl ChannelRequest {
    fn slot_count(&self) -> usize {
        1 + self.background.len()
    }
}

/// How the host is currently driving the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecMode {
    Live,
    /// Editor scrubbing outside playback; poses are rebuilt from the setup
    /// pose every frame so nothing from a previous scrub position lingers.
    Preview,
}

/// Everything one frame needs to land on a skeleton. Hosts that have not
/// resolved a binding pass `None` and the frame is a no-op; surfacing the
/// missing binding is the host's responsibility.
pub struct BindingArgs<'a> {
    pub state: &'a mut AnimationState,
    pub skeleton: &'a mut Skeleton,
    pub library: &'a AnimationLibrary,
    pub mode: ExecMode,
}

/// Maps channel requests onto track slots once per frame.
#[derive(Debug, Default)]
pub struct ChannelMixer {
    channels: Vec<ChannelRequest>,
}

impl ChannelMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel table for this frame, ascending by channel id.
    pub fn channels(&self) -> &[ChannelRequest] {
        &self.channels
    }

    /// Frame start: forget last frame's requests.
    pub fn on_frame_prepare(&mut self) {
        self.channels.clear();
    }

    /// Upsert a channel request. Re-registering an id overwrites its data in
    /// place; the table stays sorted by ascending channel id.
    pub fn set_channel(
        &mut self,
        channel: i32,
        animation: Option<AnimId>,
        time: f32,
        weight: f32,
        background: Vec<BackgroundClip>,
    ) {
        let request = ChannelRequest {
            channel,
            animation,
            time,
            weight,
            background,
        };
        match self
            .channels
            .binary_search_by_key(&channel, |c| c.channel)
        {
            Ok(i) => self.channels[i] = request,
            Err(i) => self.channels.insert(i, request),
        }
    }

    /// Map the channel table onto consecutive track slots: primary animation
    /// first, then background clips in list order, channels ascending by id.
    /// Slots beyond the written range are cleared.
    pub fn apply(&self, state: &mut AnimationState, library: &AnimationLibrary) {
        let needed: usize = self.channels.iter().map(ChannelRequest::slot_count).sum();
        state.ensure_tracks(needed);

        let mut index = 0;
        for request in &self.channels {
            Self::play_animation(state, library, index, request.animation, request.time, request.weight);
            index += 1;
            for clip in &request.background {
                Self::play_animation(state, library, index, Some(clip.anim), clip.time, 1.0);
                index += 1;
            }
        }
        for unused in index..state.tracks_len() {
            state.clear_track(unused);
        }
    }

    /// Ensure `anim` plays on `index` at the given time and weight. An entry
    /// already playing the same-named animation is reused, not restarted;
    /// restarting would discard its cross-fade and interrupt state. The name
    /// comparison lets callers drive scrubbing by changing only time/weight.
    fn play_animation(
        state: &mut AnimationState,
        library: &AnimationLibrary,
        index: usize,
        anim: Option<AnimId>,
        time: f32,
        weight: f32,
    ) {
        let anim = match anim {
            Some(anim) => anim,
            None => {
                state.clear_track(index);
                return;
            }
        };
        let name = match library.name_of(anim) {
            Some(name) => name,
            None => {
                // Unknown id: nothing can play there.
                state.clear_track(index);
                return;
            }
        };
        let same = state
            .track(index)
            .map_or(false, |entry| library.name_of(entry.anim) == Some(name));
        if !same {
            state.clear_track(index);
            let duration = library.get(anim).map_or(0.0, |a| a.duration);
            let entry = state.set_animation(index, anim, true);
            entry.track_time = time;
            // Sync the previous-frame time so a freshly started clip does not
            // report the whole 0..time span as motion.
            entry.animation_last = entry.animation_time(duration);
            entry.alpha = weight;
        } else if let Some(entry) = state.track_mut(index) {
            entry.track_time = time;
            entry.alpha = weight;
        }
    }

    /// Frame end: apply queued channels and compute the pose. Does nothing
    /// without a binding.
    pub fn on_frame_apply(&mut self, binding: Option<BindingArgs<'_>>) {
        let binding = match binding {
            Some(binding) => binding,
            None => return,
        };
        self.apply(binding.state, binding.library);
        if binding.mode == ExecMode::Preview {
            binding.skeleton.set_to_setup_pose();
        }
        binding.state.apply(binding.skeleton, binding.library);
    }

    /// Graph teardown. In preview the skeleton returns to its setup pose so
    /// the scrubbed sequence leaves no residue.
    pub fn on_graph_stop(&mut self, binding: Option<BindingArgs<'_>>) {
        if let Some(binding) = binding {
            if binding.mode == ExecMode::Preview {
                binding.skeleton.set_to_setup_pose();
            }
        }
    }
}
