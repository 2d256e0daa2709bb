//! DOM rendition of the parameter panel: one collapsible folder per group,
//! a checkbox per toggle and a range input (with its value) per slider.

use uyuni::{FieldKind, PANEL, PanelField, ParamValue, Parameters};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub const PANEL_CLASS: &str = "uyuni-panel";

const PANEL_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("right", "15px"),
    ("width", "260px"),
    ("max-height", "100%"),
    ("overflow-y", "auto"),
    ("background", "#1f1f1f"),
    ("color", "#ebebeb"),
    ("font", "11px sans-serif"),
    ("padding", "4px 8px"),
    ("z-index", "10"),
];

/// Builds the panel under `parent`, seeded from `params`. Every edit is
/// reported through `on_change`; the panel keeps no state of its own.
pub fn build_panel<F>(
    document: &web_sys::Document,
    parent: &web_sys::Element,
    params: &Parameters,
    on_change: F,
) -> Result<web_sys::HtmlElement, JsValue>
where
    F: Fn(&'static PanelField, ParamValue) + Clone + 'static,
{
    let root: web_sys::HtmlElement = document.create_element("div")?.dyn_into()?;
    root.set_class_name(PANEL_CLASS);
    let style = root.style();
    for (name, value) in PANEL_STYLE {
        style.set_property(name, value)?;
    }

    for group in PANEL {
        let folder = document.create_element("details")?;
        folder.set_attribute("open", "")?;
        let summary = document.create_element("summary")?;
        summary.set_text_content(Some(group.title));
        folder.append_child(&summary)?;

        for field in group.fields {
            let row = build_row(document, field, params, on_change.clone())?;
            folder.append_child(&row)?;
        }
        root.append_child(&folder)?;
    }

    parent.append_child(&root)?;
    Ok(root)
}

fn build_row<F>(
    document: &web_sys::Document,
    field: &'static PanelField,
    params: &Parameters,
    on_change: F,
) -> Result<web_sys::Element, JsValue>
where
    F: Fn(&'static PanelField, ParamValue) + 'static,
{
    let row = document.create_element("label")?;
    row.set_attribute("style", "display:flex;gap:6px;align-items:center;margin:2px 0")?;
    let name = document.create_element("span")?;
    name.set_attribute("style", "flex:0 0 40%")?;
    name.set_text_content(Some(field.label));
    row.append_child(&name)?;

    let input: web_sys::HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_id(&input_id(field));
    row.append_child(&input)?;

    match field.kind {
        FieldKind::Toggle => {
            input.set_type("checkbox");
            input.set_checked(matches!(params.get(field.key), ParamValue::Bool(true)));

            let input_for_cb = input.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                on_change(field, ParamValue::Bool(input_for_cb.checked()));
            }) as Box<dyn FnMut(_)>);
            input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        FieldKind::Slider { min, max, step } => {
            let current = match params.get(field.key) {
                ParamValue::Number(v) => v,
                ParamValue::Bool(_) => min,
            };
            input.set_type("range");
            input.set_min(&min.to_string());
            input.set_max(&max.to_string());
            input.set_step(&step.to_string());
            input.set_value(&current.to_string());

            let readout = document.create_element("span")?;
            readout.set_text_content(Some(&format_value(current, step)));
            row.append_child(&readout)?;

            let input_for_cb = input.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let value = input_for_cb.value_as_number() as f32;
                readout.set_text_content(Some(&format_value(value, step)));
                on_change(field, ParamValue::Number(value));
            }) as Box<dyn FnMut(_)>);
            input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    Ok(row)
}

/// DOM id of the input bound to `field`.
pub fn input_id(field: &PanelField) -> String {
    format!("uyuni-{}", field.key.as_str().replace('.', "-"))
}

fn format_value(value: f32, step: f32) -> String {
    let decimals = if step >= 1.0 {
        0
    } else if step >= 0.1 {
        1
    } else {
        2
    };
    format!("{value:.decimals$}")
}
