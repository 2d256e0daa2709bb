use crate::{
    AnimationNode, DISABLED_BOUNDARY, Parameters, Scene, TIME_STEP, TIME_WRAP, Viewport,
    WRAP_FRAMES, update_frame,
};

fn scene_with_animation(params: &Parameters) -> Scene {
    let viewport = Viewport::new(1280.0, 720.0).unwrap();
    Scene::compose(
        viewport,
        [1024.0, 512.0],
        Some(AnimationNode::idle("idle", viewport)),
        params,
    )
}

fn time_scale(scene: &Scene) -> f32 {
    scene.container.animation.as_ref().unwrap().time_scale
}

#[test]
fn disabled_animation_freezes_playback_and_resumes_at_full_speed() {
    let mut params = Parameters::default();
    let mut scene = scene_with_animation(&params);

    params.animation.enabled = false;
    for _ in 0..3 {
        update_frame(&params, &mut scene);
        assert_eq!(time_scale(&scene), 0.0);
    }

    params.animation.enabled = true;
    let changes = update_frame(&params, &mut scene);
    assert!(changes.time_scale);
    assert_eq!(time_scale(&scene), 1.0);
}

#[test]
fn background_alpha_is_either_zero_or_one() {
    let mut params = Parameters::default();
    let mut scene = scene_with_animation(&params);

    params.background.visible = false;
    update_frame(&params, &mut scene);
    assert_eq!(scene.container.background.alpha, 0.0);

    params.background.visible = true;
    update_frame(&params, &mut scene);
    assert_eq!(scene.container.background.alpha, 1.0);
}

#[test]
fn disabled_filter_forces_boundary_and_stops_the_clock() {
    let mut params = Parameters::default();
    let mut scene = scene_with_animation(&params);
    update_frame(&params, &mut scene);
    let time_before = scene.container.filter.time();

    params.reflection.enabled = false;
    params.reflection.boundary = 0.3;
    params.reflection.mirror = false;
    let changes = update_frame(&params, &mut scene);

    let filter = &scene.container.filter;
    assert_eq!(filter.boundary, DISABLED_BOUNDARY);
    assert!(filter.mirror, "other coefficients are left alone");
    assert_eq!(filter.time(), time_before);
    assert!(!changes.filter_time);
}

#[test]
fn enabled_filter_copies_every_coefficient() {
    let mut params = Parameters::default();
    let mut scene = scene_with_animation(&params);

    let r = &mut params.reflection;
    r.mirror = false;
    r.boundary = 0.55;
    r.amplitude.end = 42.0;
    r.wave_length.start = 12.0;
    r.alpha.start = 0.5;
    let changes = update_frame(&params, &mut scene);

    let filter = &scene.container.filter;
    assert!(changes.filter_coefficients);
    assert!(!filter.mirror);
    assert_eq!(filter.boundary, 0.55);
    assert_eq!(filter.amplitude, [0.0, 42.0]);
    assert_eq!(filter.wave_length, [12.0, 100.0]);
    assert_eq!(filter.alpha, [0.5, 1.0]);
}

#[test]
fn reenabling_filter_restores_stored_boundary() {
    let mut params = Parameters::default();
    let mut scene = scene_with_animation(&params);

    params.reflection.enabled = false;
    update_frame(&params, &mut scene);
    assert_eq!(scene.container.filter.boundary, 1.0);

    params.reflection.enabled = true;
    update_frame(&params, &mut scene);
    assert_eq!(scene.container.filter.boundary, 0.8);
}

#[test]
fn filter_clock_advances_by_fixed_step() {
    let params = Parameters::default();
    let mut scene = scene_with_animation(&params);

    let mut previous = scene.container.filter.time();
    for _ in 0..100 {
        update_frame(&params, &mut scene);
        let now = scene.container.filter.time();
        assert!(now > previous);
        assert!((now - previous - TIME_STEP).abs() < 1.0e-3);
        previous = now;
    }
}

#[test]
fn filter_clock_wraps_on_reaching_limit() {
    let params = Parameters::default();
    let mut scene = scene_with_animation(&params);
    assert!((TIME_WRAP - 4000.0).abs() < 1.0e-3);

    let mut peak = 0.0_f32;
    for _ in 1..WRAP_FRAMES {
        update_frame(&params, &mut scene);
        peak = peak.max(scene.container.filter.time());
    }
    assert!(peak < TIME_WRAP);
    assert!((scene.container.filter.time() - (TIME_WRAP - TIME_STEP)).abs() < 1.0e-3);

    // Frame 100 000 is the one that wraps.
    update_frame(&params, &mut scene);
    assert_eq!(scene.container.filter.time(), 0.0);

    update_frame(&params, &mut scene);
    assert_eq!(scene.container.filter.time(), TIME_STEP);
}

#[test]
fn repeated_updates_do_not_rewrite_unchanged_state() {
    let mut params = Parameters::default();
    params.animation.enabled = false;
    params.background.visible = false;
    let mut scene = scene_with_animation(&params);

    let first = update_frame(&params, &mut scene);
    assert!(first.any_state());

    let snapshot = scene.clone();
    let second = update_frame(&params, &mut scene);
    assert!(!second.any_state());
    assert_eq!(scene.container.background, snapshot.container.background);
    assert_eq!(scene.container.animation, snapshot.container.animation);
    assert_eq!(scene.backdrop, snapshot.backdrop);
}

#[test]
fn scene_without_animation_still_updates_background_and_filter() {
    let mut params = Parameters::default();
    let viewport = Viewport::new(640.0, 480.0).unwrap();
    let mut scene = Scene::compose(viewport, [256.0, 256.0], None, &params);

    params.background.visible = false;
    params.reflection.boundary = 0.6;
    let changes = update_frame(&params, &mut scene);

    assert!(!changes.time_scale);
    assert_eq!(scene.container.background.alpha, 0.0);
    assert_eq!(scene.container.filter.boundary, 0.6);
}
