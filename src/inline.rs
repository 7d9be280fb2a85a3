use once_cell::sync::Lazy;
use regex::Regex;

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("link pattern is valid"));
static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Applies the inline passes to one already-escaped line. Links run before
/// bold; the passes are independent, so markers overlapping a link are not
/// resolved.
pub fn render_inline(line: &str) -> String {
    let linked = convert_links(line);
    convert_bold(&linked)
}

pub fn convert_links(text: &str) -> String {
    LINK_PATTERN
        .replace_all(text, r#"<a href="${2}" target="_blank">${1}</a>"#)
        .into_owned()
}

pub fn convert_bold(text: &str) -> String {
    BOLD_PATTERN.replace_all(text, "<b>${1}</b>").into_owned()
}
