use serde::Deserialize;

use crate::Error;

/// Live-tunable values read by the frame updater and written by the panel.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameters {
    pub reflection: ReflectionParameters,
    pub animation: AnimationParameters,
    pub background: BackgroundParameters,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReflectionParameters {
    pub enabled: bool,
    pub mirror: bool,
    /// Vertical position (0 top, 1 bottom) where the reflection starts.
    pub boundary: f32,
    /// Horizontal wave displacement in pixels, interpolated top to bottom of the reflection.
    pub amplitude: ValueRange,
    /// Wave length in pixels, interpolated top to bottom of the reflection.
    pub wave_length: ValueRange,
    pub alpha: ValueRange,
}

impl Default for ReflectionParameters {
    fn default() -> Self {
        Self {
            enabled: true,
            mirror: true,
            boundary: 0.8,
            amplitude: ValueRange::new(0.0, 20.0),
            wave_length: ValueRange::new(30.0, 100.0),
            alpha: ValueRange::new(0.2, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationParameters {
    pub enabled: bool,
}

impl Default for AnimationParameters {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundParameters {
    pub visible: bool,
}

impl Default for BackgroundParameters {
    fn default() -> Self {
        Self { visible: true }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ValueRange {
    pub start: f32,
    pub end: f32,
}

impl ValueRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.start, self.end]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    ReflectionEnabled,
    Mirror,
    Boundary,
    AmplitudeStart,
    AmplitudeEnd,
    WaveLengthStart,
    WaveLengthEnd,
    AlphaStart,
    AlphaEnd,
    AnimationEnabled,
    BackgroundVisible,
}

impl ParamKey {
    pub const ALL: [ParamKey; 11] = [
        ParamKey::ReflectionEnabled,
        ParamKey::Mirror,
        ParamKey::Boundary,
        ParamKey::AmplitudeStart,
        ParamKey::AmplitudeEnd,
        ParamKey::WaveLengthStart,
        ParamKey::WaveLengthEnd,
        ParamKey::AlphaStart,
        ParamKey::AlphaEnd,
        ParamKey::AnimationEnabled,
        ParamKey::BackgroundVisible,
    ];

    /// Stable identifier, also used for DOM element ids.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::ReflectionEnabled => "enable",
            ParamKey::Mirror => "mirror",
            ParamKey::Boundary => "boundary",
            ParamKey::AmplitudeStart => "amplitude.start",
            ParamKey::AmplitudeEnd => "amplitude.end",
            ParamKey::WaveLengthStart => "waveLength.start",
            ParamKey::WaveLengthEnd => "waveLength.end",
            ParamKey::AlphaStart => "alpha.start",
            ParamKey::AlphaEnd => "alpha.end",
            ParamKey::AnimationEnabled => "spine.enable",
            ParamKey::BackgroundVisible => "background.visible",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            ParamKey::ReflectionEnabled
                | ParamKey::Mirror
                | ParamKey::AnimationEnabled
                | ParamKey::BackgroundVisible
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Number(f32),
}

impl Parameters {
    pub fn get(&self, key: ParamKey) -> ParamValue {
        let r = &self.reflection;
        match key {
            ParamKey::ReflectionEnabled => ParamValue::Bool(r.enabled),
            ParamKey::Mirror => ParamValue::Bool(r.mirror),
            ParamKey::Boundary => ParamValue::Number(r.boundary),
            ParamKey::AmplitudeStart => ParamValue::Number(r.amplitude.start),
            ParamKey::AmplitudeEnd => ParamValue::Number(r.amplitude.end),
            ParamKey::WaveLengthStart => ParamValue::Number(r.wave_length.start),
            ParamKey::WaveLengthEnd => ParamValue::Number(r.wave_length.end),
            ParamKey::AlphaStart => ParamValue::Number(r.alpha.start),
            ParamKey::AlphaEnd => ParamValue::Number(r.alpha.end),
            ParamKey::AnimationEnabled => ParamValue::Bool(self.animation.enabled),
            ParamKey::BackgroundVisible => ParamValue::Bool(self.background.visible),
        }
    }

    pub fn set(&mut self, key: ParamKey, value: ParamValue) -> Result<(), Error> {
        match value {
            ParamValue::Bool(v) => *self.bool_slot(key)? = v,
            ParamValue::Number(v) => *self.number_slot(key)? = v,
        }
        Ok(())
    }

    fn bool_slot(&mut self, key: ParamKey) -> Result<&mut bool, Error> {
        Ok(match key {
            ParamKey::ReflectionEnabled => &mut self.reflection.enabled,
            ParamKey::Mirror => &mut self.reflection.mirror,
            ParamKey::AnimationEnabled => &mut self.animation.enabled,
            ParamKey::BackgroundVisible => &mut self.background.visible,
            _ => {
                return Err(Error::ParameterType {
                    key: key.as_str(),
                    expected: "number",
                });
            }
        })
    }

    fn number_slot(&mut self, key: ParamKey) -> Result<&mut f32, Error> {
        let r = &mut self.reflection;
        Ok(match key {
            ParamKey::Boundary => &mut r.boundary,
            ParamKey::AmplitudeStart => &mut r.amplitude.start,
            ParamKey::AmplitudeEnd => &mut r.amplitude.end,
            ParamKey::WaveLengthStart => &mut r.wave_length.start,
            ParamKey::WaveLengthEnd => &mut r.wave_length.end,
            ParamKey::AlphaStart => &mut r.alpha.start,
            ParamKey::AlphaEnd => &mut r.alpha.end,
            _ => {
                return Err(Error::ParameterType {
                    key: key.as_str(),
                    expected: "boolean",
                });
            }
        })
    }
}
