use crate::inline;
use crate::utils::escape_html;

const UNORDERED_PREFIXES: [(&str, usize); 3] = [("    * ", 3), ("  * ", 2), ("* ", 1)];
const HEADING_LEVELS: [(&str, &str); 4] =
    [("####", "h4"), ("###", "h3"), ("##", "h2"), ("#", "h1")];

/// Line-oriented converter for the small markdown dialect used by the site:
/// `#`..`####` headings, `*` lists nested up to three levels, `1.` lists,
/// `[text](url)` links, `**bold**` and paragraphs.
///
/// The input is HTML-escaped once up front, so the output is safe to insert
/// into a page. State lives only for the duration of one [`convert`] call.
///
/// [`convert`]: MarkdownConverter::convert
#[derive(Debug, Default)]
pub struct MarkdownConverter {
    html: String,
    block: String,
    in_ordered_list: bool,
    unordered_list_depth: usize,
}

/// Converts a whole document with a fresh converter.
pub fn to_html(input: &str) -> String {
    MarkdownConverter::new().convert(input)
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the output buffer, paragraph buffer and list state.
    pub fn reset(&mut self) {
        self.html.clear();
        self.block.clear();
        self.in_ordered_list = false;
        self.unordered_list_depth = 0;
    }

    pub fn convert(&mut self, markdown: &str) -> String {
        self.reset();
        let escaped = escape_html(markdown);
        for line in split_lines(&escaped) {
            self.process_line(line);
        }
        // An empty line closes whatever the last real line left open.
        self.process_line("");
        std::mem::take(&mut self.html)
    }

    fn process_line(&mut self, line: &str) {
        if line.is_empty() {
            self.finish_paragraph();
            self.finish_unordered_list();
            self.finish_ordered_list();
            return;
        }

        let line = inline::render_inline(line);
        let unordered = unordered_item(&line);
        let ordered = is_ordered_item(&line);

        if unordered.is_none() {
            self.finish_unordered_list();
        }
        if !ordered {
            self.finish_ordered_list();
        }

        if let Some((tag, body)) = heading(&line) {
            self.finish_paragraph();
            push_block(&mut self.html, body, tag);
        } else if let Some((body, depth)) = unordered {
            self.finish_paragraph();
            self.continue_unordered_list(body, depth);
        } else if ordered {
            self.finish_paragraph();
            self.continue_ordered_list(&line);
        } else {
            self.block.push(' ');
            self.block.push_str(line.trim());
        }
    }

    fn finish_paragraph(&mut self) {
        if !self.block.is_empty() {
            push_block(&mut self.html, &self.block, "p");
            self.block.clear();
        }
    }

    fn finish_ordered_list(&mut self) {
        if self.in_ordered_list {
            self.html.push_str("</ol>\n");
            self.in_ordered_list = false;
        }
    }

    fn finish_unordered_list(&mut self) {
        self.close_unordered_to(0);
    }

    fn close_unordered_to(&mut self, depth: usize) {
        while self.unordered_list_depth > depth {
            self.html.push_str("</ul>\n");
            self.unordered_list_depth -= 1;
        }
    }

    fn continue_ordered_list(&mut self, line: &str) {
        if !self.in_ordered_list {
            self.html.push_str("<ol>\n");
            self.in_ordered_list = true;
        }
        let body = line.split_once('.').map(|(_, rest)| rest).unwrap_or("");
        push_block(&mut self.html, body, "li");
        self.block.clear();
    }

    fn continue_unordered_list(&mut self, body: &str, depth: usize) {
        self.close_unordered_to(depth);
        while self.unordered_list_depth < depth {
            self.html.push_str("<ul>\n");
            self.unordered_list_depth += 1;
        }
        push_block(&mut self.html, body, "li");
        self.block.clear();
    }
}

/// Splits on `\n`, dropping a `\r` directly before each break.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n').map(|line| match line.strip_suffix('\n') {
        Some(stripped) => stripped.strip_suffix('\r').unwrap_or(stripped),
        None => line,
    })
}

fn push_block(html: &mut String, content: &str, tag: &str) {
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(content);
    html.push_str("</");
    html.push_str(tag);
    html.push_str(">\n");
}

fn heading(line: &str) -> Option<(&'static str, &str)> {
    HEADING_LEVELS
        .iter()
        .find_map(|(marker, tag)| line.strip_prefix(*marker).map(|body| (*tag, body)))
}

/// Only exact 0/2/4-space indents count; anything else is paragraph text.
fn unordered_item(line: &str) -> Option<(&str, usize)> {
    UNORDERED_PREFIXES
        .iter()
        .find_map(|(prefix, depth)| line.strip_prefix(*prefix).map(|body| (body, *depth)))
}

fn is_ordered_item(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn headings_prefer_the_longest_marker() {
        assert_eq!(to_html("#### Title"), "<h4>Title</h4>\n");
        assert_eq!(to_html("### Title"), "<h3>Title</h3>\n");
        assert_eq!(to_html("## Title"), "<h2>Title</h2>\n");
        assert_eq!(to_html("# Title"), "<h1>Title</h1>\n");
    }

    #[test]
    fn heading_without_space_still_renders() {
        assert_eq!(to_html("#Title"), "<h1>Title</h1>\n");
        assert_eq!(to_html("##### Deep"), "<h4># Deep</h4>\n");
    }

    #[test]
    fn empty_heading_emits_nothing() {
        assert_eq!(to_html("##   "), "");
    }

    #[test]
    fn consecutive_lines_merge_into_one_paragraph() {
        assert_eq!(to_html("Hello\nworld"), "<p>Hello world</p>\n");
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        assert_eq!(to_html("A\n\nB"), "<p>A</p>\n<p>B</p>\n");
    }

    #[test]
    fn paragraph_lines_are_trimmed() {
        assert_eq!(to_html("  spaced  \n   out "), "<p>spaced out</p>\n");
    }

    #[test]
    fn nested_unordered_lists_open_and_close_levels() {
        let html = to_html("* a\n  * b\n* c");
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n<ul>\n<li>b</li>\n</ul>\n<li>c</li>\n</ul>\n"
        );
    }

    #[test]
    fn jumping_to_depth_three_opens_every_level() {
        let html = to_html("    * deep\n* top");
        assert_eq!(
            html,
            "<ul>\n<ul>\n<ul>\n<li>deep</li>\n</ul>\n</ul>\n<li>top</li>\n</ul>\n"
        );
    }

    #[test]
    fn odd_indentation_falls_back_to_paragraph_text() {
        assert_eq!(to_html(" * one"), "<p>* one</p>\n");
        assert_eq!(to_html("   * three"), "<p>* three</p>\n");
    }

    #[test]
    fn star_without_space_is_not_a_list() {
        assert_eq!(to_html("*nope"), "<p>*nope</p>\n");
    }

    #[test]
    fn ordered_list_is_closed_once_by_trailing_flush() {
        let html = to_html("1. first\n2. second");
        assert_eq!(html, "<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n");
    }

    #[test]
    fn ordered_item_keeps_text_after_first_dot() {
        assert_eq!(
            to_html("10. v1.2 notes"),
            "<ol>\n<li>v1.2 notes</li>\n</ol>\n"
        );
    }

    #[test]
    fn number_without_dot_is_plain_text() {
        assert_eq!(to_html("2024 was busy"), "<p>2024 was busy</p>\n");
    }

    #[test]
    fn switching_list_kinds_closes_the_previous_list() {
        let html = to_html("* bullet\n1. number\n* bullet again");
        assert_eq!(
            html,
            "<ul>\n<li>bullet</li>\n</ul>\n<ol>\n<li>number</li>\n</ol>\n<ul>\n<li>bullet again</li>\n</ul>\n"
        );
    }

    #[test]
    fn paragraph_is_closed_before_a_list() {
        let html = to_html("Intro\n* item");
        assert_eq!(html, "<p>Intro</p>\n<ul>\n<li>item</li>\n</ul>\n");
    }

    #[test]
    fn text_after_list_closes_it_and_starts_a_paragraph() {
        let html = to_html("* item\nafter");
        assert_eq!(html, "<ul>\n<li>item</li>\n</ul>\n<p>after</p>\n");
    }

    #[test]
    fn heading_closes_open_paragraph_and_list() {
        let html = to_html("text\n# Head\n1. one\n## Next");
        assert_eq!(
            html,
            "<p>text</p>\n<h1>Head</h1>\n<ol>\n<li>one</li>\n</ol>\n<h2>Next</h2>\n"
        );
    }

    #[test]
    fn blank_line_closes_lists() {
        let html = to_html("* a\n  * b\n\n1. c\n\nend");
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n<ul>\n<li>b</li>\n</ul>\n</ul>\n<ol>\n<li>c</li>\n</ol>\n<p>end</p>\n"
        );
    }

    #[test]
    fn empty_list_item_emits_no_tag_pair() {
        let html = to_html("*  \n1.");
        assert!(!html.contains("<li></li>"));
        assert_eq!(count(&html, "<ul>"), count(&html, "</ul>"));
        assert_eq!(count(&html, "<ol>"), count(&html, "</ol>"));
    }

    #[test]
    fn whitespace_only_line_does_not_split_paragraphs() {
        assert_eq!(to_html("one\n   \ntwo"), "<p>one  two</p>\n");
    }

    #[test]
    fn links_and_bold_are_rendered_inside_paragraphs() {
        let html = to_html("See [here](http://x) and **bold**.");
        assert!(html.contains(r#"<a href="http://x" target="_blank">here</a>"#));
        assert!(html.contains("<b>bold</b>"));
    }

    #[test]
    fn bold_line_is_not_mistaken_for_a_list() {
        assert_eq!(to_html("**Note** this"), "<p><b>Note</b> this</p>\n");
    }

    #[test]
    fn inline_markup_works_in_headings_and_items() {
        let html = to_html("## A **big** deal\n* see [docs](/d)");
        assert_eq!(
            html,
            "<h2>A <b>big</b> deal</h2>\n<ul>\n<li>see <a href=\"/d\" target=\"_blank\">docs</a></li>\n</ul>\n"
        );
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = to_html("<script>alert('x & \"y\"')</script>");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&#39;x &amp; &quot;y&quot;&#39;)&lt;/script&gt;</p>\n"
        );
    }

    #[test]
    fn escaped_text_stays_escaped_in_every_block() {
        let html = to_html("# <h>\n* <u>\n1. <o>\n<p>");
        let stripped = html
            .replace("<h1>", "")
            .replace("</h1>", "")
            .replace("<ul>", "")
            .replace("</ul>", "")
            .replace("<ol>", "")
            .replace("</ol>", "")
            .replace("<li>", "")
            .replace("</li>", "")
            .replace("<p>", "")
            .replace("</p>", "");
        assert!(!stripped.contains('<'), "unescaped markup in {html}");
        assert!(!stripped.contains('>'), "unescaped markup in {html}");
    }

    #[test]
    fn crlf_input_matches_lf_input() {
        let lf = "# T\n* a\n  * b\n\n1. x\ntext\nmore";
        let crlf = lf.replace('\n', "\r\n");
        assert_eq!(to_html(&crlf), to_html(lf));
    }

    #[test]
    fn lone_carriage_return_is_kept_as_text() {
        assert_eq!(to_html("a\rb"), "<p>a\rb</p>\n");
    }

    #[test]
    fn empty_and_blank_documents_produce_no_output() {
        assert_eq!(to_html(""), "");
        assert_eq!(to_html("\n\n\r\n"), "");
    }

    #[test]
    fn trailing_state_is_flushed_without_final_blank_line() {
        assert!(to_html("para").ends_with("</p>\n"));
        assert!(to_html("* a\n  * b").ends_with("</ul>\n</ul>\n"));
        assert!(to_html("1. a").ends_with("</ol>\n"));
    }

    #[test]
    fn list_tags_are_balanced_for_messy_input() {
        let docs = [
            "* a\n    * c\n  * b\n1. x\n* y\n\n    * z",
            "1. a\n2. b\n* c\n  * d\n3. e",
            "  * orphan\n\n\n    * deeper\ntext\n* **x** [y](z)",
            "* [unterminated](\n** stray\n#### \n1.\n",
        ];
        for doc in docs {
            let html = to_html(doc);
            assert_eq!(count(&html, "<ul>"), count(&html, "</ul>"), "{doc:?}");
            assert_eq!(count(&html, "<ol>"), count(&html, "</ol>"), "{doc:?}");
        }
    }

    #[test]
    fn reused_converter_matches_fresh_one() {
        let mut converter = MarkdownConverter::new();
        let first = converter.convert("* open\n  * nested");
        let second = converter.convert("plain");
        assert_eq!(first, to_html("* open\n  * nested"));
        assert_eq!(second, "<p>plain</p>\n");
    }

    #[test]
    fn reset_clears_pending_state() {
        let mut converter = MarkdownConverter::new();
        converter.process_line("* item");
        converter.process_line("dangling");
        converter.reset();
        assert_eq!(converter.convert("x"), "<p>x</p>\n");
    }
}
