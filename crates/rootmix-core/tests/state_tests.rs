use rootmix_core::{
    Animation, AnimationLibrary, AnimationState, Config, Skeleton, TranslateKey,
    TranslateTimeline, Vec2,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_library() -> AnimationLibrary {
    let mut library = AnimationLibrary::new();
    library.load(Animation::new(
        "walk",
        1.0,
        vec![TranslateTimeline::new(
            0,
            vec![
                TranslateKey {
                    time: 0.0,
                    value: Vec2::ZERO,
                },
                TranslateKey {
                    time: 1.0,
                    value: Vec2::new(2.0, 0.0),
                },
            ],
        )],
    ));
    library.load(Animation::new("idle", 1.0, vec![]));
    library.load(Animation::new("jump", 0.5, vec![]));
    library
}

/// it should link the interrupted entry as mixing_from with the configured mix
#[test]
fn set_animation_links_the_interrupted_entry() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();
    let idle = library.find_by_name("idle").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    let entry = state.set_animation(0, idle, true);

    assert_eq!(entry.anim, idle);
    approx(entry.mix_duration, 0.2, 1e-6);
    approx(entry.interrupt_alpha, 1.0, 1e-6);
    let from = entry.mixing_from.as_deref().expect("interrupted entry kept");
    assert_eq!(from.anim, walk);
}

/// it should scale interrupt_alpha when interrupting an in-progress mix
#[test]
fn interrupting_a_mix_scales_interrupt_alpha() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();
    let idle = library.find_by_name("idle").unwrap();
    let jump = library.find_by_name("jump").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    state.set_animation(0, idle, true);
    // Halfway through idle's 0.2s fade from walk...
    state.update(0.1, &library);
    assert!(state.track(0).unwrap().mixing_from.is_some());

    // ...jump interrupts, carrying the partial weight along.
    let entry = state.set_animation(0, jump, true);
    approx(entry.interrupt_alpha, 0.5, 1e-5);
    let from = entry.mixing_from.as_deref().unwrap();
    assert_eq!(from.anim, idle);
}

/// it should record the previous animation time and wrap looped playback
#[test]
fn update_records_previous_time_and_wraps() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    state.track_mut(0).unwrap().track_time = 0.9;

    state.update(0.2, &library);
    let entry = state.track(0).unwrap();
    approx(entry.animation_last, 0.9, 1e-6);
    approx(entry.track_time, 1.1, 1e-6);
    approx(entry.animation_time(1.0), 0.1, 1e-5);
}

/// it should clamp non-looped playback at the clip end
#[test]
fn non_looped_time_clamps_at_duration() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, false);
    state.track_mut(0).unwrap().track_time = 5.0;
    approx(state.track(0).unwrap().animation_time(1.0), 1.0, 1e-6);
}

/// it should retire a chain tail once its fade has fully elapsed
#[test]
fn update_retires_fully_faded_tails() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();
    let idle = library.find_by_name("idle").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    state.set_animation(0, idle, true);

    state.update(0.1, &library);
    assert!(state.track(0).unwrap().mixing_from.is_some());

    state.update(0.2, &library);
    assert!(state.track(0).unwrap().mixing_from.is_none());
}

/// it should write setup + timeline value at full weight on apply
#[test]
fn apply_writes_setup_plus_value_at_full_weight() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();

    let mut skeleton = Skeleton::new();
    skeleton.add_bone("root", Vec2::new(1.0, 2.0));

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    state.track_mut(0).unwrap().track_time = 0.5;

    state.apply(&mut skeleton, &library);
    // evaluate(0.5) = (1.0, 0.0) on top of the setup position.
    approx(skeleton.bone(0).unwrap().x, 2.0, 1e-5);
    approx(skeleton.bone(0).unwrap().y, 2.0, 1e-5);
}

/// it should grow the slot array but never shrink it
#[test]
fn ensure_tracks_grows_only() {
    let mut state = AnimationState::new(&Config::default());
    state.ensure_tracks(4);
    assert_eq!(state.tracks_len(), 4);
    state.ensure_tracks(2);
    assert_eq!(state.tracks_len(), 4);
}

/// it should drop the whole chain when a slot is cleared
#[test]
fn clear_track_drops_the_chain() {
    let library = mk_library();
    let walk = library.find_by_name("walk").unwrap();
    let idle = library.find_by_name("idle").unwrap();

    let mut state = AnimationState::new(&Config::default());
    state.set_animation(0, walk, true);
    state.set_animation(0, idle, true);
    state.clear_track(0);
    assert!(state.track(0).is_none());
    // Clearing an out-of-range slot is harmless.
    state.clear_track(17);
}
