use crate::ReflectionParameters;

/// Time added to the filter clock every frame.
pub const TIME_STEP: f32 = 0.04;

/// Frames after which the clock restarts from zero.
pub const WRAP_FRAMES: u32 = 100_000;

/// Clock value at which it restarts; the shader's periodic terms never see
/// anything larger.
pub const TIME_WRAP: f32 = TIME_STEP * WRAP_FRAMES as f32;

/// Boundary that pushes the reflected band off the bottom edge.
pub const DISABLED_BOUNDARY: f32 = 1.0;

/// Live coefficients of the water-reflection shader.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectionFilter {
    pub mirror: bool,
    pub boundary: f32,
    pub amplitude: [f32; 2],
    pub wave_length: [f32; 2],
    pub alpha: [f32; 2],
    /// Frames since the last wrap; the clock is derived from it.
    frame: u32,
}

impl ReflectionFilter {
    pub fn from_parameters(params: &ReflectionParameters) -> Self {
        Self {
            mirror: params.mirror,
            boundary: params.boundary,
            amplitude: params.amplitude.to_array(),
            wave_length: params.wave_length.to_array(),
            alpha: params.alpha.to_array(),
            frame: 0,
        }
    }

    pub fn time(&self) -> f32 {
        self.frame as f32 * TIME_STEP
    }

    pub fn advance(&mut self) {
        self.frame += 1;
        if self.frame >= WRAP_FRAMES {
            self.frame = 0;
        }
    }
}
