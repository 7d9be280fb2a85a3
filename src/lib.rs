mod inline;
pub mod markdown;
pub mod quiz;
mod quiz_view;
pub mod site;
pub mod utils;

pub use crate::markdown::{to_html, MarkdownConverter};
pub use crate::quiz::{AnswerRating, Question, Quiz, QuizKind};
pub use crate::site::SiteConfig;

use crate::quiz_view::QuizView;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    Ok(())
}

#[wasm_bindgen]
pub fn render_markdown(markdown: &str) -> String {
    markdown::to_html(markdown)
}

/// Renders markdown into the element with id `target_id`.
#[wasm_bindgen]
pub fn write_markdown(target_id: &str, markdown: &str) -> Result<(), JsValue> {
    let document = utils::document()?;
    let target = utils::element_by_id(&document, target_id)?;
    target.set_inner_html(&markdown::to_html(markdown));
    Ok(())
}

/// Fetches a markdown resource and renders it into `target_id`.
#[wasm_bindgen]
pub async fn load_markdown(url: String, target_id: String) -> Result<(), JsValue> {
    let markdown = match utils::fetch_text(&url).await {
        Ok(text) => text,
        Err(err) => {
            utils::log(&format!("Failed to load markdown from {url}: {err:?}"));
            return Err(err);
        }
    };
    write_markdown(&target_id, &markdown)
}

#[wasm_bindgen]
pub fn site_header(base_path: &str) -> String {
    SiteConfig::new(base_path).header()
}

#[wasm_bindgen]
pub fn site_footer(base_path: &str) -> String {
    SiteConfig::new(base_path).footer()
}

/// Starts a quiz on the current page. `kind` is `"standard"` or
/// `"good_neutral_bad"`; `questions_json` is an array of questions.
#[wasm_bindgen]
pub fn start_quiz(questions_json: &str, kind: &str) -> Result<(), JsValue> {
    let kind = parse_quiz_kind(kind)?;
    let quiz = Quiz::from_json(kind, questions_json)
        .map_err(|err| JsValue::from_str(&format!("Invalid quiz questions: {err}")))?;
    let view = QuizView::new(quiz)?;
    view.install()
}

fn parse_quiz_kind(kind: &str) -> Result<QuizKind, JsValue> {
    serde_json::from_value(serde_json::Value::String(kind.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unknown quiz kind: {kind}")))
}
