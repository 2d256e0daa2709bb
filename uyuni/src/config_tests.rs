use crate::{
    AssetPaths, BuildMode, DEV_ASSET_BASE, Error, PROD_ASSET_BASE, RESIZE_DEBOUNCE_MS,
    SceneConfig,
};

#[test]
fn default_config_uses_build_mode_asset_base() {
    let config = SceneConfig::default();
    assert_eq!(config.asset_base, BuildMode::current().asset_base());
    assert_eq!(config.container_selector, ".pixi");
    assert_eq!(config.idle_clip, "idle");
    assert_eq!(config.resize_debounce_ms, RESIZE_DEBOUNCE_MS);
}

#[test]
fn build_modes_map_to_fixed_roots() {
    assert_eq!(BuildMode::Development.asset_base(), DEV_ASSET_BASE);
    assert_eq!(BuildMode::Production.asset_base(), PROD_ASSET_BASE);
    assert_eq!(PROD_ASSET_BASE, "/pub_web_pixijs_uyuni-lake/assets");
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = SceneConfig::from_json_str(
        r#"{
            "assetBase": "/cdn/lake/",
            "parameters": {
                "reflection": { "boundary": 0.5, "amplitude": { "start": 1, "end": 4 } },
                "background": { "visible": false }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(config.asset_base, "/cdn/lake/");
    assert_eq!(config.idle_clip, "idle");
    let r = &config.parameters.reflection;
    assert_eq!(r.boundary, 0.5);
    assert_eq!(r.amplitude.to_array(), [1.0, 4.0]);
    assert_eq!(r.wave_length.to_array(), [30.0, 100.0]);
    assert!(r.mirror);
    assert!(!config.parameters.background.visible);
    assert!(config.parameters.animation.enabled);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = SceneConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn asset_paths_are_rooted_at_base() {
    let paths = AssetPaths::new("/pub_web_pixijs_uyuni-lake/assets/");
    assert_eq!(
        paths.background,
        "/pub_web_pixijs_uyuni-lake/assets/images/sky_background.jpg"
    );
    assert_eq!(
        paths.skeleton,
        "/pub_web_pixijs_uyuni-lake/assets/spine-data/model.json"
    );
    assert_eq!(
        paths.atlas,
        "/pub_web_pixijs_uyuni-lake/assets/spine-data/model.atlas"
    );
    assert_eq!(
        paths.atlas_page("character.png"),
        "/pub_web_pixijs_uyuni-lake/assets/images/character.png"
    );
    assert_eq!(
        AssetPaths::new("/assets").atlas_page("pages/character.png"),
        "/assets/images/character.png"
    );
}
