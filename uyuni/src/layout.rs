use crate::Error;

/// Logical (CSS pixel) size of the render surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, Error> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Always `width / height`, for startup and resize alike.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn bottom_center(&self) -> [f32; 2] {
        [self.width * 0.5, self.height]
    }
}

/// Scale that lets the background cover the viewport in either orientation.
pub fn cover_scale(aspect_ratio: f32) -> f32 {
    if aspect_ratio >= 1.0 {
        aspect_ratio
    } else {
        1.0 / aspect_ratio
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn max(&self) -> [f32; 2] {
        [self.x + self.width, self.y + self.height]
    }
}

/// Column-major clip-from-world matrix for y-down pixel coordinates:
/// `(0, 0)` is the top-left corner and `(width, height)` the bottom-right.
pub fn pixel_projection(viewport: Viewport) -> [[f32; 4]; 4] {
    let sx = 2.0 / viewport.width.max(1.0);
    let sy = -2.0 / viewport.height.max(1.0);
    [
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0, 1.0],
    ]
}
