//! Display tree: a solid backdrop and a filtered container holding the
//! background sprite and the optional skeleton.

use crate::{Parameters, ReflectionFilter, Rect, Viewport, cover_scale};

pub const BACKDROP_COLOR: u32 = 0x0091e6;

#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
    pub color: u32,
    pub width: f32,
    pub height: f32,
}

impl Backdrop {
    /// Non-linear (sRGB) RGBA in `0..=1`.
    pub fn rgba(&self) -> [f32; 4] {
        let channel = |shift: u32| ((self.color >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0), 1.0]
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub texture_size: [f32; 2],
    /// Fraction of the texture size that sits on `position`.
    pub anchor: [f32; 2],
    pub position: [f32; 2],
    pub scale: f32,
    pub alpha: f32,
}

impl Sprite {
    pub fn bounds(&self) -> Rect {
        let width = self.texture_size[0] * self.scale;
        let height = self.texture_size[1] * self.scale;
        Rect {
            x: self.position[0] - self.anchor[0] * width,
            y: self.position[1] - self.anchor[1] * height,
            width,
            height,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationNode {
    pub position: [f32; 2],
    pub scale: f32,
    pub clip: String,
    pub looping: bool,
    /// Multiplier for the frame delta handed to the animation state.
    pub time_scale: f32,
}

impl AnimationNode {
    /// The idle clip, looped, standing at the bottom-center of `viewport`.
    pub fn idle(clip: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            position: viewport.bottom_center(),
            scale: 1.0,
            clip: clip.into(),
            looping: true,
            time_scale: 1.0,
        }
    }
}

/// Everything the reflection filter is applied to.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredContainer {
    pub background: Sprite,
    pub animation: Option<AnimationNode>,
    pub filter: ReflectionFilter,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub backdrop: Backdrop,
    pub container: FilteredContainer,
}

impl Scene {
    pub fn compose(
        viewport: Viewport,
        background_size: [f32; 2],
        animation: Option<AnimationNode>,
        params: &Parameters,
    ) -> Self {
        if animation.is_none() {
            log::info!("composing scene without an animation layer");
        }
        let background = Sprite {
            texture_size: background_size,
            anchor: [0.5, 1.0],
            position: viewport.bottom_center(),
            scale: cover_scale(viewport.aspect_ratio()),
            alpha: 1.0,
        };
        Self {
            viewport,
            backdrop: Backdrop {
                color: BACKDROP_COLOR,
                width: viewport.width,
                height: viewport.height,
            },
            container: FilteredContainer {
                background,
                animation,
                filter: ReflectionFilter::from_parameters(&params.reflection),
            },
        }
    }

    /// Re-anchors the background and resizes the backdrop; the skeleton keeps
    /// its startup placement.
    pub fn apply_resize(&mut self, viewport: Viewport) {
        log::debug!(
            "applying resize to {}x{}",
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        let background = &mut self.container.background;
        background.position = viewport.bottom_center();
        background.scale = cover_scale(viewport.aspect_ratio());
        self.backdrop.width = viewport.width;
        self.backdrop.height = viewport.height;
    }
}

/// Chooses the clip to loop: `preferred` when present, otherwise the first one.
pub fn pick_clip<'a, I>(available: I, preferred: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut first = None;
    for name in available {
        if name == preferred {
            return Some(name.to_string());
        }
        if first.is_none() {
            first = Some(name);
        }
    }
    let fallback = first?;
    log::warn!("clip '{preferred}' not found, looping '{fallback}' instead");
    Some(fallback.to_string())
}
