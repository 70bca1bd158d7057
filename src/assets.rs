use crate::core::error::{AssetLoadError, EnvironmentLoadError};
use crate::core::{decode_environment, parse_glb, EnvironmentImage, LoadSlot, ModelAsset};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

enum FetchFailure {
    Network(String),
    Status(u16),
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchFailure> {
    let window = web::window().ok_or_else(|| FetchFailure::Network("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| FetchFailure::Network(format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| FetchFailure::Network(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(FetchFailure::Status(resp.status()));
    }
    let promise = resp
        .array_buffer()
        .map_err(|e| FetchFailure::Network(format!("{:?}", e)))?;
    let buf = JsFuture::from(promise)
        .await
        .map_err(|e| FetchFailure::Network(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub async fn load_model(url: &str) -> Result<ModelAsset, AssetLoadError> {
    let bytes = fetch_bytes(url).await.map_err(|f| match f {
        FetchFailure::Network(reason) => AssetLoadError::Fetch {
            url: url.to_string(),
            reason,
        },
        FetchFailure::Status(status) => AssetLoadError::Status {
            url: url.to_string(),
            status,
        },
    })?;
    log::info!("[assets] fetched {} ({} bytes)", url, bytes.len());
    parse_glb(&bytes)
}

pub async fn load_environment(url: &str) -> Result<EnvironmentImage, EnvironmentLoadError> {
    let bytes = fetch_bytes(url).await.map_err(|f| EnvironmentLoadError::Fetch {
        url: url.to_string(),
        reason: match f {
            FetchFailure::Network(reason) => reason,
            FetchFailure::Status(status) => format!("HTTP {status}"),
        },
    })?;
    let image = decode_environment(&bytes)?;
    log::info!(
        "[assets] environment decoded: {}x{}",
        image.width,
        image.height
    );
    Ok(image)
}

/// Start the model fetch; the result lands in the returned slot.
pub fn spawn_model_load(url: String) -> LoadSlot<ModelAsset, AssetLoadError> {
    let slot = LoadSlot::new();
    let task_slot = slot.clone();
    spawn_local(async move {
        let result = load_model(&url).await;
        if let Err(e) = &result {
            log::error!("[assets] model load error: {e}");
        }
        task_slot.settle(result);
    });
    slot
}

pub fn spawn_environment_load(url: String) -> LoadSlot<EnvironmentImage, EnvironmentLoadError> {
    let slot = LoadSlot::new();
    let task_slot = slot.clone();
    spawn_local(async move {
        let result = load_environment(&url).await;
        if let Err(e) = &result {
            log::warn!("[assets] environment unavailable: {e}");
        }
        task_slot.settle(result);
    });
    slot
}
