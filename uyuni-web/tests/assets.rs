#![cfg(target_arch = "wasm32")]

use uyuni::{Parameters, Scene, SceneConfig, Viewport};
use uyuni_web::load_optional_skeleton;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn missing_skeleton_bundle_leaves_scene_without_character() {
    let config = SceneConfig {
        asset_base: "/uyuni-missing-assets".to_string(),
        ..SceneConfig::default()
    };

    let character = load_optional_skeleton(&config.asset_paths()).await;
    assert!(character.is_none());

    let viewport = Viewport::new(1280.0, 720.0).unwrap();
    let scene = Scene::compose(viewport, [1024.0, 512.0], None, &Parameters::default());
    assert!(scene.container.animation.is_none());
    assert_eq!(scene.container.background.alpha, 1.0);
    assert_eq!(scene.container.filter.boundary, 0.8);
}
