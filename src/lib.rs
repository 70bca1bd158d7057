//! Scroll-choreographed 3D product page.
//!
//! `core` is platform-independent and host-testable: viewport and camera
//! math, the animated rig, timelines, scroll triggers, parallax, smooth
//! scrolling, asset parsing and the `Stage` that drives them per frame.
//! Everything else is the wasm front-end: DOM wiring, asset fetch and the
//! WebGPU renderer.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod assets;
#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod input;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::constants::*;
    use crate::core::{SmoothScroll, Stage, StageParams, Viewport};
    use crate::{assets, dom, events, frame, overlay};
    use instant::Instant;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("scroll-stage starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let canvas_el = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
        let canvas: web::HtmlCanvasElement = canvas_el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
        dom::sync_canvas_backing_size(&canvas);
        overlay::hide_load_error(&document);

        let (width, height) = dom::viewport_size(&window);
        let viewport = Viewport::new(width, height)?;
        let stage = Rc::new(RefCell::new(Stage::new(
            viewport,
            StageParams::default(),
            SmoothScroll::default(),
        )));
        dom::set_scroll_locked(&document, true);

        // Asset loads run in the background and are polled by the frame loop.
        let model_url = dom::data_attr_or(&canvas, MODEL_URL_ATTR, DEFAULT_MODEL_URL);
        let env_url = dom::data_attr_or(&canvas, ENV_URL_ATTR, DEFAULT_ENV_URL);
        stage
            .borrow_mut()
            .begin_loading(js_sys::Date::now() / 1000.0)?;
        let model_slot = assets::spawn_model_load(model_url);
        let env_slot = assets::spawn_environment_load(env_url);

        events::wire_window_events(events::WindowWiring {
            window: window.clone(),
            document: document.clone(),
            canvas: canvas.clone(),
            stage: stage.clone(),
        });
        events::wire_pointermove(stage.clone());

        // A missing GPU leaves the page and its DOM choreography running.
        let gpu = frame::init_gpu(&canvas).await;

        let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
            stage,
            title: dom::TitleElements::query(&document),
            window,
            document,
            canvas,
            gpu,
            model_slot,
            env_slot,
            last_instant: Instant::now(),
            scroll_locked: None,
        }));
        frame::start_loop(frame_ctx);
        Ok(())
    }
}
