#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use uyuni::{PANEL, ParamKey, ParamValue, Parameters, panel_field};
use uyuni_web::{PANEL_CLASS, build_panel, input_id};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn input(key: ParamKey) -> web_sys::HtmlInputElement {
    let field = panel_field(key).unwrap();
    document()
        .get_element_by_id(&input_id(field))
        .unwrap()
        .dyn_into()
        .unwrap()
}

fn mount(params: Rc<RefCell<Parameters>>) -> web_sys::HtmlElement {
    let doc = document();
    let body = doc.body().unwrap();
    let seed = params.borrow().clone();
    build_panel(&doc, &body, &seed, move |field, value| {
        field.apply(&mut params.borrow_mut(), value).unwrap();
    })
    .unwrap()
}

#[wasm_bindgen_test]
fn panel_has_one_folder_per_group_and_one_input_per_field() {
    let root = mount(Rc::new(RefCell::new(Parameters::default())));
    assert_eq!(root.class_name(), PANEL_CLASS);
    assert_eq!(
        root.query_selector_all("details").unwrap().length() as usize,
        PANEL.len()
    );
    assert_eq!(
        root.query_selector_all("input").unwrap().length() as usize,
        ParamKey::ALL.len()
    );
    root.remove();
}

#[wasm_bindgen_test]
fn inputs_are_seeded_from_parameters() {
    let mut seed = Parameters::default();
    seed.reflection.mirror = false;
    seed.reflection.boundary = 0.4;
    let root = mount(Rc::new(RefCell::new(seed)));

    assert!(!input(ParamKey::Mirror).checked());
    assert!(input(ParamKey::ReflectionEnabled).checked());
    assert!((input(ParamKey::Boundary).value_as_number() - 0.4).abs() < 1.0e-6);
    root.remove();
}

#[wasm_bindgen_test]
fn edits_flow_into_the_parameter_store() {
    let params = Rc::new(RefCell::new(Parameters::default()));
    let root = mount(params.clone());

    let toggle = input(ParamKey::AnimationEnabled);
    toggle.set_checked(false);
    toggle
        .dispatch_event(&web_sys::Event::new("change").unwrap())
        .unwrap();
    assert_eq!(
        params.borrow().get(ParamKey::AnimationEnabled),
        ParamValue::Bool(false)
    );

    let slider = input(ParamKey::WaveLengthStart);
    slider.set_value("42");
    slider
        .dispatch_event(&web_sys::Event::new("input").unwrap())
        .unwrap();
    assert_eq!(params.borrow().reflection.wave_length.start, 42.0);
    root.remove();
}
