//! Per-frame application of the parameter store to the scene.

use crate::{DISABLED_BOUNDARY, Parameters, Scene};

/// Which scene properties a call to [`update_frame`] actually wrote.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameChanges {
    pub time_scale: bool,
    pub background_alpha: bool,
    pub filter_coefficients: bool,
    pub filter_time: bool,
}

impl FrameChanges {
    /// True when anything other than the filter clock changed.
    pub fn any_state(&self) -> bool {
        self.time_scale || self.background_alpha || self.filter_coefficients
    }
}

fn write<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

pub fn update_frame(params: &Parameters, scene: &mut Scene) -> FrameChanges {
    let mut changes = FrameChanges::default();
    let container = &mut scene.container;

    if let Some(animation) = container.animation.as_mut() {
        let rate = if params.animation.enabled { 1.0 } else { 0.0 };
        changes.time_scale = write(&mut animation.time_scale, rate);
    }

    let alpha = if params.background.visible { 1.0 } else { 0.0 };
    changes.background_alpha = write(&mut container.background.alpha, alpha);

    let filter = &mut container.filter;
    let r = &params.reflection;
    if !r.enabled {
        changes.filter_coefficients = write(&mut filter.boundary, DISABLED_BOUNDARY);
        return changes;
    }

    let mut coefficients = false;
    coefficients |= write(&mut filter.boundary, r.boundary);
    coefficients |= write(&mut filter.mirror, r.mirror);
    coefficients |= write(&mut filter.amplitude, r.amplitude.to_array());
    coefficients |= write(&mut filter.wave_length, r.wave_length.to_array());
    coefficients |= write(&mut filter.alpha, r.alpha.to_array());
    changes.filter_coefficients = coefficients;

    filter.advance();
    changes.filter_time = true;
    changes
}
