use crate::{Error, Viewport, cover_scale, pixel_projection};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 0.001,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

#[test]
fn landscape_viewport_scales_by_aspect_ratio() {
    let viewport = Viewport::new(1920.0, 1080.0).unwrap();
    assert_approx(viewport.aspect_ratio(), 1.7778);
    assert_approx(cover_scale(viewport.aspect_ratio()), 1.7778);
    assert_eq!(viewport.bottom_center(), [960.0, 1080.0]);
}

#[test]
fn portrait_viewport_scales_by_inverse_aspect_ratio() {
    let viewport = Viewport::new(1080.0, 1920.0).unwrap();
    assert_approx(viewport.aspect_ratio(), 0.5625);
    assert_approx(cover_scale(viewport.aspect_ratio()), 1.0 / 0.5625);
    assert_eq!(viewport.bottom_center(), [540.0, 1920.0]);
}

#[test]
fn cover_scale_is_symmetric_in_orientation() {
    for ratio in [0.25_f32, 0.8, 1.0, 1.5, 3.0] {
        assert_approx(cover_scale(ratio), cover_scale(1.0 / ratio));
        assert!(cover_scale(ratio) >= 1.0);
    }
}

#[test]
fn viewport_rejects_degenerate_sizes() {
    for (w, h) in [(0.0, 100.0), (100.0, 0.0), (-1.0, 10.0), (f32::NAN, 10.0)] {
        assert!(matches!(
            Viewport::new(w, h),
            Err(Error::InvalidViewport { .. })
        ));
    }
}

#[test]
fn pixel_projection_maps_corners_to_clip_space() {
    let m = pixel_projection(Viewport::new(800.0, 600.0).unwrap());
    let project = |x: f32, y: f32| {
        [
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        ]
    };

    let top_left = project(0.0, 0.0);
    assert_approx(top_left[0], -1.0);
    assert_approx(top_left[1], 1.0);

    let bottom_right = project(800.0, 600.0);
    assert_approx(bottom_right[0], 1.0);
    assert_approx(bottom_right[1], -1.0);

    let center = project(400.0, 300.0);
    assert_approx(center[0], 0.0);
    assert_approx(center[1], 0.0);
}
