use rootmix_core::{parse_library_json, AnimationLibrary, Skeleton, StoredError, Vec2};

fn mk_skeleton() -> Skeleton {
    let mut skeleton = Skeleton::new();
    skeleton.add_bone("root", Vec2::ZERO);
    skeleton.add_bone("hips", Vec2::ZERO);
    skeleton
}

/// it should parse a library document and resolve bone names to indices
#[test]
fn parses_and_resolves_bones() {
    let doc = r#"{
        "animations": [
            {
                "name": "walk",
                "duration": 1.0,
                "timelines": [
                    {
                        "bone": "hips",
                        "keys": [
                            { "time": 0.0, "x": 0.0, "y": 0.0 },
                            { "time": 1.0, "x": 2.0, "y": -1.0 }
                        ]
                    }
                ]
            },
            { "name": "idle", "duration": 0.5 }
        ]
    }"#;

    let skeleton = mk_skeleton();
    let animations = parse_library_json(doc, &skeleton).expect("document parses");
    assert_eq!(animations.len(), 2);

    let walk = &animations[0];
    assert_eq!(walk.name, "walk");
    let timeline = walk.find_translate_timeline(1).expect("hips timeline");
    let mid = timeline.evaluate(0.5);
    assert!((mid.x - 1.0).abs() < 1e-6 && (mid.y + 0.5).abs() < 1e-6);

    // Loaded animations are addressable by name through the library.
    let mut library = AnimationLibrary::new();
    for animation in animations {
        library.load(animation);
    }
    assert!(library.find_by_name("idle").is_some());
}

/// it should reject timelines that reference unknown bones
#[test]
fn rejects_unknown_bones() {
    let doc = r#"{
        "animations": [
            {
                "name": "walk",
                "duration": 1.0,
                "timelines": [
                    { "bone": "tail", "keys": [{ "time": 0.0, "x": 0.0, "y": 0.0 }] }
                ]
            }
        ]
    }"#;

    let err = parse_library_json(doc, &mk_skeleton()).unwrap_err();
    assert!(matches!(err, StoredError::UnknownBone { .. }), "{err}");
}

/// it should reject non-monotonic key times and non-positive durations
#[test]
fn rejects_invalid_animations() {
    let unordered = r#"{
        "animations": [
            {
                "name": "walk",
                "duration": 1.0,
                "timelines": [
                    {
                        "bone": "root",
                        "keys": [
                            { "time": 0.5, "x": 0.0, "y": 0.0 },
                            { "time": 0.2, "x": 1.0, "y": 0.0 }
                        ]
                    }
                ]
            }
        ]
    }"#;
    let err = parse_library_json(unordered, &mk_skeleton()).unwrap_err();
    assert!(matches!(err, StoredError::Invalid { .. }), "{err}");

    let zero_duration = r#"{ "animations": [ { "name": "idle", "duration": 0.0 } ] }"#;
    let err = parse_library_json(zero_duration, &mk_skeleton()).unwrap_err();
    assert!(matches!(err, StoredError::Invalid { .. }), "{err}");
}

/// it should surface malformed JSON as a parse error
#[test]
fn rejects_malformed_json() {
    let err = parse_library_json("{ not json", &mk_skeleton()).unwrap_err();
    assert!(matches!(err, StoredError::Parse(_)), "{err}");
}
