use serde::Deserialize;

use crate::{Error, Parameters, RESIZE_DEBOUNCE_MS};

pub const DEV_ASSET_BASE: &str = "/assets";
pub const PROD_ASSET_BASE: &str = "/pub_web_pixijs_uyuni-lake/assets";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }

    pub fn asset_base(self) -> &'static str {
        match self {
            BuildMode::Development => DEV_ASSET_BASE,
            BuildMode::Production => PROD_ASSET_BASE,
        }
    }
}

/// Startup settings, resolved once before the scene is composed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub asset_base: String,
    pub container_selector: String,
    pub idle_clip: String,
    pub resize_debounce_ms: u32,
    pub parameters: Parameters,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_base: BuildMode::current().asset_base().to_string(),
            container_selector: ".pixi".to_string(),
            idle_clip: "idle".to_string(),
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            parameters: Parameters::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
        })
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::new(&self.asset_base)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    base: String,
    pub background: String,
    pub skeleton: String,
    pub atlas: String,
}

impl AssetPaths {
    pub fn new(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            base: base.to_string(),
            background: format!("{base}/images/sky_background.jpg"),
            skeleton: format!("{base}/spine-data/model.json"),
            atlas: format!("{base}/spine-data/model.atlas"),
        }
    }

    /// Atlas pages (e.g. `character.png`) are served from the image folder.
    pub fn atlas_page(&self, page_name: &str) -> String {
        let name = page_name.rsplit('/').next().unwrap_or(page_name);
        format!("{}/images/{name}", self.base)
    }
}
