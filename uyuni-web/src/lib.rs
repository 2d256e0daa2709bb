#[cfg(target_arch = "wasm32")]
mod assets;
#[cfg(target_arch = "wasm32")]
mod panel;

#[cfg(target_arch = "wasm32")]
pub use assets::{SkeletonBundle, load_optional_skeleton};
#[cfg(target_arch = "wasm32")]
pub use panel::{PANEL_CLASS, build_panel, input_id};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use spine2d::{AnimationState, AnimationStateData, Atlas, DrawList, Skeleton};
    use uyuni::{
        AnimationNode, Parameters, ResizeDebouncer, Scene, SceneConfig, Scheduler, Viewport,
        pick_clip, update_frame,
    };
    use uyuni_wgpu::{
        AtlasTextures, SceneRenderer, SkeletonFrame, create_linear_sampler,
        create_sampler_for_atlas_page, create_texture_bind_group, upload_rgba8,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::assets::{SkeletonBundle, load_background, load_optional_skeleton};
    use crate::panel::build_panel;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("missing document"))?;
        let config = read_config(&window, &document)?;
        log::info!("uyuni-web starting, assets from {}", config.asset_base);

        spawn_local(async move {
            if let Err(e) = run(window, document, config).await {
                log::error!("uyuni-web init failed: {e:?}");
            }
        });

        Ok(())
    }

    async fn run(
        window: web_sys::Window,
        document: web_sys::Document,
        config: SceneConfig,
    ) -> Result<(), JsValue> {
        let container = document
            .query_selector(&config.container_selector)?
            .ok_or_else(|| {
                JsValue::from_str(&format!("missing element {}", config.container_selector))
            })?;
        let canvas: web_sys::HtmlCanvasElement =
            document.create_element("canvas")?.dyn_into()?;
        canvas.set_attribute(
            "style",
            "position:fixed;left:0;top:0;width:100%;height:100%;display:block",
        )?;
        container.append_child(&canvas)?;

        // CSS size (logical pixels) follows the window; the backing buffer is in
        // physical pixels.
        let (width, height) = physical_canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("create_surface: {e:?}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("request_adapter: {e:?}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| JsValue::from_str(&format!("request_device: {e:?}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| JsValue::from_str("surface has no formats"))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: caps.present_modes[0],
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        let renderer = SceneRenderer::new(&device, &queue, format, width, height);

        let paths = config.asset_paths();
        let image = load_background(&paths).await?;
        let background_view = upload_rgba8(
            &device,
            &queue,
            "uyuni background",
            image.width,
            image.height,
            &image.pixels,
        );
        let background = create_texture_bind_group(
            &device,
            renderer.texture_layout(),
            &background_view,
            &create_linear_sampler(&device, "uyuni background sampler"),
        );

        let character = load_optional_skeleton(&paths)
            .await
            .and_then(|bundle| {
                CharacterLayer::new(bundle, &config.idle_clip, &device, &queue, &renderer)
            });

        let viewport = window_viewport(&window)?;
        let animation = character
            .as_ref()
            .map(|layer| AnimationNode::idle(layer.clip.clone(), viewport));
        let scene = Scene::compose(
            viewport,
            [image.width as f32, image.height as f32],
            animation,
            &config.parameters,
        );

        let state = Rc::new(RefCell::new(WebState {
            canvas,
            surface,
            device,
            queue,
            surface_config,
            renderer,
            background,
            character,
            stage: viewport,
            scene,
            params: config.parameters.clone(),
            resize: ResizeDebouncer::new(config.resize_debounce_ms),
            last_ts_ms: None,
        }));

        init_panel(&document, state.clone())?;
        init_resize(&window, state.clone())?;
        start_render_loop(&window, state)?;
        Ok(())
    }

    fn read_config(
        window: &web_sys::Window,
        document: &web_sys::Document,
    ) -> Result<SceneConfig, JsValue> {
        let defaults = SceneConfig::default();
        let inline = document
            .query_selector(&defaults.container_selector)?
            .and_then(|el| el.get_attribute("data-config"));
        let mut config = match inline {
            Some(text) => SceneConfig::from_json_str(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => defaults,
        };
        if let Some(base) = query_param(window, "assets") {
            config.asset_base = base;
        }
        Ok(config)
    }

    fn query_param(window: &web_sys::Window, key: &str) -> Option<String> {
        let search = window.location().search().ok()?;
        let search = search.strip_prefix('?').unwrap_or(&search);

        for part in search.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            if k != key {
                continue;
            }
            let v = v.replace('+', " ");
            return js_sys::decode_uri_component(&v)
                .ok()
                .and_then(|d| d.as_string())
                .or(Some(v));
        }
        None
    }

    fn init_panel(
        document: &web_sys::Document,
        state: Rc<RefCell<WebState>>,
    ) -> Result<(), JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("missing body"))?;
        let params = state.borrow().params.clone();
        build_panel(document, &body, &params, move |field, value| {
            let Ok(mut st) = state.try_borrow_mut() else {
                return;
            };
            if let Err(e) = field.apply(&mut st.params, value) {
                log::warn!("panel edit rejected: {e}");
            }
        })?;
        Ok(())
    }

    /// `setTimeout`-backed timers firing a single shared callback.
    struct WindowTimers<'a> {
        window: &'a web_sys::Window,
        callback: &'a js_sys::Function,
    }

    impl Scheduler for WindowTimers<'_> {
        type Handle = i32;

        fn schedule(&mut self, delay_ms: u32) -> i32 {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    self.callback,
                    delay_ms as i32,
                )
                .unwrap_or_else(|e| {
                    log::warn!("setTimeout failed: {e:?}");
                    0
                })
        }

        fn cancel(&mut self, handle: i32) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn init_resize(window: &web_sys::Window, state: Rc<RefCell<WebState>>) -> Result<(), JsValue> {
        let timer = {
            let state = state.clone();
            Closure::wrap(Box::new(move || {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                if let Some(viewport) = st.resize.fire() {
                    st.scene.apply_resize(viewport);
                }
            }) as Box<dyn FnMut()>)
        };

        let window_for_cb = window.clone();
        let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
            let viewport = match window_viewport(&window_for_cb) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("ignoring resize: {e:?}");
                    return;
                }
            };
            let Ok(mut st) = state.try_borrow_mut() else {
                return;
            };
            let mut timers = WindowTimers {
                window: &window_for_cb,
                callback: timer.as_ref().unchecked_ref(),
            };
            st.resize.on_resize(viewport, &mut timers);
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn start_render_loop(
        window: &web_sys::Window,
        state: Rc<RefCell<WebState>>,
    ) -> Result<(), JsValue> {
        let raf = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
        let raf2 = raf.clone();
        let window_for_cb = window.clone();
        *raf2.borrow_mut() = Some(Closure::wrap(Box::new(move |ts_ms: f64| {
            if let Ok(mut st) = state.try_borrow_mut() {
                if let Err(e) = st.render(ts_ms) {
                    log::error!("render: {e:?}");
                }
            }

            if let Some(cb) = raf.borrow().as_ref() {
                if let Err(e) = window_for_cb.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    log::error!("requestAnimationFrame: {e:?}");
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = raf2.borrow().as_ref() {
            window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    /// Skeleton, animation state and GPU textures for the character.
    struct CharacterLayer {
        clip: String,
        atlas: Atlas,
        skeleton: Skeleton,
        state: AnimationState,
        textures: AtlasTextures,
        draw_list: DrawList,
    }

    impl CharacterLayer {
        fn new(
            bundle: SkeletonBundle,
            idle_clip: &str,
            device: &wgpu::Device,
            queue: &wgpu::Queue,
            renderer: &SceneRenderer,
        ) -> Option<Self> {
            let Some(clip) = pick_clip(
                bundle.data.animations.iter().map(|a| a.name.as_str()),
                idle_clip,
            ) else {
                log::error!("skeleton has no animations, skipping the character layer");
                return None;
            };

            let mut skeleton = Skeleton::new(bundle.data.clone());
            skeleton.set_to_setup_pose();
            skeleton.update_world_transform();

            let mut state = AnimationState::new(AnimationStateData::new(bundle.data.clone()));
            if let Err(e) = state.set_animation(0, &clip, true) {
                log::error!("set_animation({clip}) failed: {e}");
                return None;
            }

            let mut textures = AtlasTextures::default();
            for (name, image) in bundle.pages {
                let Some(page) = bundle.atlas.pages.iter().find(|p| p.name == name) else {
                    continue;
                };
                let view = upload_rgba8(
                    device,
                    queue,
                    "uyuni atlas page",
                    image.width,
                    image.height,
                    &image.pixels,
                );
                let sampler = create_sampler_for_atlas_page(device, page);
                let bind_group =
                    create_texture_bind_group(device, renderer.texture_layout(), &view, &sampler);
                textures.bind_groups.insert(name, bind_group);
            }
            if textures.is_empty() {
                log::warn!("skeleton atlas has no pages, the character will not be visible");
            }

            Some(Self {
                clip,
                atlas: bundle.atlas,
                skeleton,
                state,
                textures,
                draw_list: DrawList::default(),
            })
        }

        /// Advances by `dt` scaled by the node's playback rate and rebuilds the draw list.
        fn advance(&mut self, dt: f32, node: &AnimationNode) {
            let dt = dt * node.time_scale;

            // Skeleton space is y-up, the stage is y-down.
            self.skeleton.x = node.position[0];
            self.skeleton.y = node.position[1];
            self.skeleton.scale_x = node.scale;
            self.skeleton.scale_y = -node.scale;

            self.state.update(dt);
            self.skeleton.set_to_setup_pose();
            self.state.apply(&mut self.skeleton);
            self.skeleton.update(dt);
            self.skeleton.update_world_transform();

            self.draw_list.clear();
            spine2d::append_draw_list_with_atlas(&mut self.draw_list, &self.skeleton, &self.atlas);
        }
    }

    struct WebState {
        canvas: web_sys::HtmlCanvasElement,
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_config: wgpu::SurfaceConfiguration,

        renderer: SceneRenderer,
        background: wgpu::BindGroup,
        character: Option<CharacterLayer>,

        /// Live CSS size of the canvas; `scene.viewport` lags it until the
        /// debounced resize fires.
        stage: Viewport,
        scene: Scene,
        params: Parameters,
        resize: ResizeDebouncer<i32>,
        last_ts_ms: Option<f64>,
    }

    impl WebState {
        fn render(&mut self, ts_ms: f64) -> Result<(), wgpu::SurfaceError> {
            self.resize_surface_if_needed();

            let dt = match self.last_ts_ms {
                Some(prev) => ((ts_ms - prev) * 0.001).max(0.0) as f32,
                None => 0.0,
            };
            self.last_ts_ms = Some(ts_ms);

            update_frame(&self.params, &mut self.scene);

            let animation = self.scene.container.animation.as_ref();
            let skeleton = match (self.character.as_mut(), animation) {
                (Some(layer), Some(node)) => {
                    layer.advance(dt, node);
                    self.renderer
                        .upload_skeleton(&self.device, &self.queue, &layer.draw_list);
                    Some(SkeletonFrame {
                        draw_list: &layer.draw_list,
                        textures: &layer.textures,
                    })
                }
                _ => None,
            };

            let frame = match self.surface.get_current_texture() {
                Ok(f) => f,
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    self.surface.configure(&self.device, &self.surface_config);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("uyuni-web encoder"),
                });

            self.renderer.render(
                &mut encoder,
                &self.queue,
                &view,
                self.stage,
                &self.scene,
                &self.background,
                skeleton,
            );

            self.queue.submit([encoder.finish()]);
            frame.present();
            Ok(())
        }

        /// The backing buffer and the projection track the window immediately;
        /// scene layout waits for the debounced resize.
        fn resize_surface_if_needed(&mut self) {
            if let Ok(stage) = logical_canvas_size(&self.canvas) {
                self.stage = stage;
            }

            let (width, height) = physical_canvas_size(&self.canvas);
            if width == self.surface_config.width && height == self.surface_config.height {
                return;
            }

            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
            self.renderer.resize(&self.device, width, height);
        }
    }

    fn window_viewport(window: &web_sys::Window) -> Result<Viewport, JsValue> {
        let width = window.inner_width()?.as_f64().unwrap_or(1.0) as f32;
        let height = window.inner_height()?.as_f64().unwrap_or(1.0) as f32;
        Viewport::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn logical_canvas_size(canvas: &web_sys::HtmlCanvasElement) -> Result<Viewport, uyuni::Error> {
        Viewport::new(
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        )
    }

    fn physical_canvas_size(canvas: &web_sys::HtmlCanvasElement) -> (u32, u32) {
        let cw = canvas.client_width().max(1) as f64;
        let ch = canvas.client_height().max(1) as f64;
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .max(0.1);

        let w = (cw * dpr).round().max(1.0) as u32;
        let h = (ch * dpr).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod web {
    // Built with Trunk for `wasm32-unknown-unknown`; the native stub keeps
    // workspace `cargo test` green.
}
