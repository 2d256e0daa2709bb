use spine2d::DrawList;
use uyuni::{Parameters, ReflectionFilter, Scene, Viewport};

use crate::skeleton::uploaded_index_count;
use crate::{CONTAINER_SAMPLE_COUNT, PassTarget, ReflectionUniforms, srgb_to_linear};

#[test]
fn uniforms_carry_filter_coefficients() {
    let mut filter = ReflectionFilter::from_parameters(&Parameters::default().reflection);
    filter.advance();
    filter.mirror = false;

    let uniforms = ReflectionUniforms::new(&filter, Viewport::new(1280.0, 720.0).unwrap());
    assert_eq!(uniforms.boundary, 0.8);
    assert_eq!(uniforms.amplitude, [0.0, 20.0]);
    assert_eq!(uniforms.wave_length, [30.0, 100.0]);
    assert_eq!(uniforms.alpha, [0.2, 1.0]);
    assert_eq!(uniforms.dimensions, [1280.0, 720.0]);
    assert_eq!(uniforms.time, filter.time());
    assert_eq!(uniforms.mirror, 0);
}

#[test]
fn uniform_block_matches_wgsl_layout() {
    // Four vec2s, two f32s, a u32 flag and padding.
    assert_eq!(std::mem::size_of::<ReflectionUniforms>(), 48);
    assert_eq!(std::mem::size_of::<ReflectionUniforms>() % 16, 0);
}

#[test]
fn srgb_conversion_hits_known_points() {
    assert_eq!(srgb_to_linear(0.0), 0.0);
    assert!((srgb_to_linear(1.0) - 1.0).abs() < 1.0e-6);
    assert!((srgb_to_linear(0.5) - 0.2140).abs() < 1.0e-3);
    assert!((srgb_to_linear(0.02) - 0.02 / 12.92).abs() < 1.0e-6);
}

#[test]
fn skeleton_upload_without_vertices_draws_nothing() {
    let mut draw_list = DrawList::default();
    assert_eq!(uploaded_index_count(&draw_list), 0);

    draw_list.indices.extend([0, 1, 2]);
    assert_eq!(uploaded_index_count(&draw_list), 0);
}

#[test]
fn uniform_dimensions_follow_live_stage_not_scene_layout() {
    let params = Parameters::default();
    let laid_out = Viewport::new(1920.0, 1080.0).unwrap();
    let scene = Scene::compose(laid_out, [2048.0, 1024.0], None, &params);

    let live = Viewport::new(1080.0, 1920.0).unwrap();
    let uniforms = ReflectionUniforms::new(&scene.container.filter, live);
    assert_eq!(uniforms.dimensions, [1080.0, 1920.0]);
    assert_eq!(scene.viewport, laid_out);
}

#[test]
fn container_pass_is_multisampled_and_stage_is_not() {
    let container = PassTarget::Container.multisample();
    assert_eq!(container.count, CONTAINER_SAMPLE_COUNT);
    assert_eq!(container.count, 4);
    assert_eq!(container.mask, !0);
    assert!(!container.alpha_to_coverage_enabled);

    assert_eq!(PassTarget::Stage.multisample().count, 1);
}
