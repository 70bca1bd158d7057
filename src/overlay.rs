use crate::constants::LOAD_ERROR_ID;
use web_sys as web;

/// Show the load-failure notice, optionally with the error text.
pub fn show_load_error(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(LOAD_ERROR_ID) {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
        _ = el.set_attribute("data-error", message);
    }
}

#[inline]
pub fn hide_load_error(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOAD_ERROR_ID) {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}
