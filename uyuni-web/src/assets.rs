use std::sync::Arc;

use spine2d::{Atlas, SkeletonData};
use uyuni::AssetPaths;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Skeleton data, its atlas and the decoded atlas pages keyed by page name.
pub struct SkeletonBundle {
    pub atlas: Atlas,
    pub data: Arc<SkeletonData>,
    pub pages: Vec<(String, DecodedImage)>,
}

pub async fn load_background(paths: &AssetPaths) -> Result<DecodedImage, JsValue> {
    let bytes = fetch_bytes(&paths.background).await?;
    decode_rgba8(&paths.background, &bytes).map_err(|e| JsValue::from_str(&e))
}

/// Loads the skeleton bundle, or logs why it could not and yields `None` so
/// the scene can start without its character.
pub async fn load_optional_skeleton(paths: &AssetPaths) -> Option<SkeletonBundle> {
    match load_skeleton_bundle(paths).await {
        Ok(bundle) => Some(bundle),
        Err(e) => {
            log::error!("failed to load skeleton bundle: {e:?}");
            None
        }
    }
}

async fn load_skeleton_bundle(paths: &AssetPaths) -> Result<SkeletonBundle, JsValue> {
    let atlas_text = fetch_text(&paths.atlas).await?;
    let json_text = fetch_text(&paths.skeleton).await?;

    let atlas = Atlas::from_str(&atlas_text)
        .map_err(|e| JsValue::from_str(&format!("parse {}: {e}", paths.atlas)))?;
    let data = SkeletonData::from_json_str(&json_text)
        .map_err(|e| JsValue::from_str(&format!("parse {}: {e}", paths.skeleton)))?;

    let mut pages = Vec::with_capacity(atlas.pages.len());
    for page in &atlas.pages {
        let url = paths.atlas_page(&page.name);
        let bytes = fetch_bytes(&url).await?;
        let image = decode_rgba8(&url, &bytes).map_err(|e| JsValue::from_str(&e))?;
        pages.push((page.name.clone(), image));
    }

    Ok(SkeletonBundle { atlas, data, pages })
}

async fn fetch_text(path: &str) -> Result<String, JsValue> {
    let bytes = fetch_bytes(path).await?;
    String::from_utf8(bytes).map_err(|e| JsValue::from_str(&format!("{path}: {e}")))
}

async fn fetch_bytes(path: &str) -> Result<Vec<u8>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let resp = JsFuture::from(window.fetch_with_str(path)).await?;
    let resp: web_sys::Response = resp.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "fetch {path}: HTTP {}",
            resp.status()
        )));
    }

    let buffer = JsFuture::from(resp.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn decode_rgba8(label: &str, bytes: &[u8]) -> Result<DecodedImage, String> {
    let image = image::load_from_memory(bytes).map_err(|e| format!("decode {label}: {e}"))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
