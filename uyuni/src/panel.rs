//! Layout of the developer parameter panel.
//!
//! The panel is a flat list of folders, each holding toggles and sliders bound
//! to a [`ParamKey`]. Front ends build their widgets from [`PANEL`] and push
//! edits through [`PanelField::apply`].

use crate::{Error, ParamKey, ParamValue, Parameters};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldKind {
    Toggle,
    Slider { min: f32, max: f32, step: f32 },
}

#[derive(Copy, Clone, Debug)]
pub struct PanelField {
    pub key: ParamKey,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Copy, Clone, Debug)]
pub struct PanelGroup {
    pub title: &'static str,
    pub fields: &'static [PanelField],
}

const fn toggle(key: ParamKey, label: &'static str) -> PanelField {
    PanelField {
        key,
        label,
        kind: FieldKind::Toggle,
    }
}

const fn slider(key: ParamKey, label: &'static str, min: f32, max: f32, step: f32) -> PanelField {
    PanelField {
        key,
        label,
        kind: FieldKind::Slider { min, max, step },
    }
}

pub const PANEL: &[PanelGroup] = &[
    PanelGroup {
        title: "Reflection General",
        fields: &[toggle(ParamKey::ReflectionEnabled, "enable")],
    },
    PanelGroup {
        title: "Reflection Main Parameter",
        fields: &[
            toggle(ParamKey::Mirror, "mirror"),
            slider(ParamKey::Boundary, "boundary", 0.0, 1.0, 0.01),
            slider(ParamKey::AmplitudeStart, "amplitude.start", 0.0, 50.0, 0.1),
            slider(ParamKey::AmplitudeEnd, "amplitude.end", 0.0, 50.0, 0.1),
            slider(ParamKey::WaveLengthStart, "waveLength.start", 10.0, 200.0, 1.0),
            slider(ParamKey::WaveLengthEnd, "waveLength.end", 10.0, 200.0, 1.0),
            slider(ParamKey::AlphaStart, "alpha.start", 0.0, 1.0, 0.01),
            slider(ParamKey::AlphaEnd, "alpha.end", 0.0, 1.0, 0.01),
        ],
    },
    PanelGroup {
        title: "Spine Animation Parameter",
        fields: &[toggle(ParamKey::AnimationEnabled, "enable")],
    },
    PanelGroup {
        title: "Background",
        fields: &[toggle(ParamKey::BackgroundVisible, "visible")],
    },
];

impl PanelField {
    /// Writes a widget value into `params`, clamping slider input to the field range.
    pub fn apply(&self, params: &mut Parameters, value: ParamValue) -> Result<(), Error> {
        let value = match (self.kind, value) {
            (FieldKind::Slider { min, max, .. }, ParamValue::Number(v)) => {
                // NaN from an empty input keeps the stored value.
                if v.is_nan() {
                    return Ok(());
                }
                ParamValue::Number(v.clamp(min, max))
            }
            (_, v) => v,
        };
        params.set(self.key, value)
    }
}

pub fn panel_field(key: ParamKey) -> Option<&'static PanelField> {
    PANEL
        .iter()
        .flat_map(|g| g.fields.iter())
        .find(|f| f.key == key)
}
