use crate::constants::MAX_FRAME_DT_SEC;
use crate::core::error::{AssetLoadError, EnvironmentLoadError, StageError};
use crate::core::{EnvironmentImage, LoadSlot, ModelAsset, NodeAnimator, ScrollDriver, Stage};
use crate::dom::{self, TitleElements};
use crate::overlay;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub stage: Rc<RefCell<Stage>>,
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub title: TitleElements,

    pub gpu: Option<render::GpuState<'a>>,
    pub model_slot: LoadSlot<ModelAsset, AssetLoadError>,
    pub env_slot: LoadSlot<EnvironmentImage, EnvironmentLoadError>,

    pub last_instant: Instant,
    pub scroll_locked: Option<bool>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self, time_ms: f64) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        self.poll_model();
        self.poll_environment();

        let timed_out = self
            .stage
            .borrow_mut()
            .check_load_timeout(js_sys::Date::now() / 1000.0);
        if let Some(err) = timed_out {
            overlay::show_load_error(&self.document, &err.to_string());
        }

        let out = self.stage.borrow_mut().frame(time_ms, dt_sec);
        if let Some(y) = out.scroll_to {
            self.window.scroll_to_with_x_and_y(0.0, y);
        }

        let stage = self.stage.borrow();
        self.title.apply(stage.title());
        let locked = stage.scroll().is_stopped();
        if self.scroll_locked != Some(locked) {
            dom::set_scroll_locked(&self.document, locked);
            self.scroll_locked = Some(locked);
        }

        if let Some(g) = &mut self.gpu {
            if !g.has_model() {
                return;
            }
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            let camera = stage.camera();
            g.set_camera(camera.view_projection(), camera.eye());
            match g.render(|node| stage.model_node_world(node)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[render] surface lost, reconfiguring");
                    g.reconfigure();
                }
                Err(e) => log::error!("[render] render error: {:?}", e),
            }
        }
    }

    fn poll_model(&mut self) {
        let Some(result) = self.model_slot.take() else {
            return;
        };
        match result {
            Ok(asset) => {
                let layout = dom::measure_layout(&self.window, &self.document);
                let animator = NodeAnimator::new(&asset);
                let ready = self.stage.borrow_mut().on_model_ready(
                    &layout,
                    self.title.texts.len(),
                    Some(animator),
                );
                match ready {
                    Ok(()) => {}
                    Err(e @ StageError::Phase { .. }) => {
                        log::warn!("[stage] model arrived late: {e}");
                        return;
                    }
                    Err(e) => {
                        overlay::show_load_error(&self.document, &e.to_string());
                        return;
                    }
                }
                if let Some(g) = &mut self.gpu {
                    g.upload_model(&asset);
                }
            }
            Err(e) => {
                self.stage.borrow_mut().on_model_failed(&e);
                overlay::show_load_error(&self.document, &e.to_string());
            }
        }
    }

    fn poll_environment(&mut self) {
        if let Some(Ok(image)) = self.env_slot.take() {
            if let Some(g) = &mut self.gpu {
                g.set_environment(&image);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |time_ms: f64| {
        frame_ctx_tick.borrow_mut().frame(time_ms);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
