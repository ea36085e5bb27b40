use gradviz::{DashboardConfig, Dataset, LoadError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

fn fetch_error(url: &str, detail: impl Into<String>) -> LoadError {
    LoadError::Fetch {
        url: url.to_string(),
        detail: detail.into(),
    }
}

fn js_detail(v: &JsValue) -> String {
    v.as_string()
        .unwrap_or_else(|| "request rejected".to_string())
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or_else(|| fetch_error(url, "no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(url, js_detail(&e)))?
        .dyn_into::<web_sys::Response>()
        .map_err(|_| fetch_error(url, "fetch did not yield a Response"))?;

    if !resp.ok() {
        return Err(fetch_error(url, format!("HTTP {}", resp.status())));
    }

    let body = resp
        .text()
        .map_err(|e| fetch_error(url, js_detail(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| fetch_error(url, js_detail(&e)))?
        .as_string()
        .ok_or_else(|| fetch_error(url, "body is not text"))
}

/// Institutions first, then feature importance; the second request starts
/// only after the first has completed.
pub(super) async fn load_dataset(config: &DashboardConfig) -> Result<Dataset, LoadError> {
    let institutions = fetch_text(&config.institutions_url()).await?;
    let importance = fetch_text(&config.importance_url()).await?;
    Dataset::from_json_strs(&institutions, &importance)
}
