use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Document, HtmlElement, Request, RequestInit, RequestMode, Response};

pub fn document() -> Result<Document, JsValue> {
    window()
        .and_then(|win| win.document())
        .ok_or_else(|| JsValue::from_str("Document unavailable"))
}

pub fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing #{id} element")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

pub fn log(message: &str) {
    console::log_1(&JsValue::from_str(message));
}

/// Fetches a same-origin resource as text, e.g. a markdown page.
pub async fn fetch_text(path: &str) -> Result<String, JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("Window unavailable"))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(path, &opts)?;
    let response_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response_value.dyn_into()?;

    if !response.ok() {
        let status = response.status();
        return Err(JsValue::from_str(&format!(
            "Failed to fetch {path} (status {status})"
        )));
    }

    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str(&format!("Response body for {path} is not text")))
}

/// Replaces the five HTML-significant characters with entities. Nothing
/// else is touched, so markdown markers survive for the parser.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}
