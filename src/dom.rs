use crate::constants::*;
use crate::core::choreography::SCROLL_SECTIONS;
use crate::core::{SectionLayout, SectionRect, TitleState};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Window inner size in CSS pixels.
pub fn viewport_size(window: &web::Window) -> (f32, f32) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w as f32, h as f32)
}

pub fn scroll_y(window: &web::Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Measure the scroll sections in document coordinates.
pub fn measure_layout(window: &web::Window, document: &web::Document) -> SectionLayout {
    let scroll = scroll_y(window) as f32;
    let (_, vh) = viewport_size(window);
    let scroll_height = document
        .query_selector(SCROLL_CONTAINER_SELECTOR)
        .ok()
        .flatten()
        .map(|el| el.client_height())
        .or_else(|| document.document_element().map(|el| el.scroll_height()))
        .unwrap_or(0) as f32;
    let mut layout = SectionLayout::new(scroll_height - vh);
    for &selector in SCROLL_SECTIONS.iter() {
        match document.query_selector(selector).ok().flatten() {
            Some(el) => {
                let rect = el.get_bounding_client_rect();
                layout.insert(
                    selector,
                    SectionRect {
                        top: rect.top() as f32 + scroll,
                        height: rect.height() as f32,
                    },
                );
            }
            None => log::warn!("[dom] section {} not found", selector),
        }
    }
    layout
}

/// The title block and its animated text lines.
pub struct TitleElements {
    pub block: Option<web::HtmlElement>,
    pub texts: Vec<web::HtmlElement>,
}

impl TitleElements {
    pub fn query(document: &web::Document) -> Self {
        let block = document
            .query_selector(TITLE_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
        let mut texts = Vec::new();
        if let Ok(list) = document.query_selector_all(TITLE_TEXT_SELECTOR) {
            for i in 0..list.length() {
                if let Some(el) = list
                    .item(i)
                    .and_then(|n| n.dyn_into::<web::HtmlElement>().ok())
                {
                    texts.push(el);
                }
            }
        }
        Self { block, texts }
    }

    /// Mirror the animated title state into inline styles.
    pub fn apply(&self, title: &TitleState) {
        if let Some(block) = &self.block {
            _ = block
                .style()
                .set_property("opacity", &format!("{:.4}", title.opacity));
        }
        for (el, offset) in self.texts.iter().zip(title.text_offsets.iter()) {
            _ = el
                .style()
                .set_property("transform", &format!("translate3d(0, {:.3}%, 0)", offset));
        }
    }
}

pub fn set_scroll_locked(document: &web::Document, locked: bool) {
    if let Some(root) = document.document_element() {
        _ = root.class_list().toggle_with_force(SCROLL_LOCK_CLASS, locked);
    }
}

/// `data-<key>` on the canvas, falling back to `default`.
pub fn data_attr_or(canvas: &web::HtmlCanvasElement, key: &str, default: &str) -> String {
    canvas
        .dataset()
        .get(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
