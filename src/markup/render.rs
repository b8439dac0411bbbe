use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

static RE_HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=]+)==").expect("valid pattern"));

/// Markdown→HTML boundary. Sanitization of the produced HTML is the
/// embedding shell's job, not ours.
pub trait Renderer {
    fn render(&self, markdown: &str) -> String;
}

/// pulldown-cmark-backed renderer used by the preview surface
#[derive(Debug, Default)]
pub struct CmarkRenderer;

impl Renderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

/// Convert `==text==` spans to inline-styled mark elements with the active
/// highlight color. Runs before markdown rendering so the highlight syntax
/// survives into the preview.
pub fn inline_highlights(markdown: &str, color: &str) -> String {
    RE_HIGHLIGHT
        .replace_all(markdown, |caps: &regex::Captures| {
            format!(
                "<mark style=\"background-color: {};\">{}</mark>",
                color, &caps[1]
            )
        })
        .into_owned()
}

/// Full preview pipeline: highlight pre-pass, then markdown→HTML
pub fn render_preview<R: Renderer>(renderer: &R, markdown: &str, highlight_color: &str) -> String {
    renderer.render(&inline_highlights(markdown, highlight_color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_syntax_becomes_mark_with_color() {
        let html = inline_highlights("The ==quick fox== jumps", "#fff59d");
        assert_eq!(
            html,
            "The <mark style=\"background-color: #fff59d;\">quick fox</mark> jumps"
        );
    }

    #[test]
    fn highlight_pre_pass_survives_rendering() {
        let out = render_preview(&CmarkRenderer, "The ==quick fox== jumps", "#abcdef");
        assert!(out.contains("<mark style=\"background-color: #abcdef;\">quick fox</mark>"));
        assert!(!out.contains("=="));
    }

    #[test]
    fn renders_basic_structure() {
        let out = CmarkRenderer.render("# Title\n\nSome **bold** text");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>bold</strong>"));
    }

    #[test]
    fn strikethrough_enabled() {
        let out = CmarkRenderer.render("~~gone~~");
        assert!(out.contains("<del>gone</del>"));
    }

    #[test]
    fn adjacent_highlights_stay_separate() {
        let html = inline_highlights("==a== and ==b==", "#fff");
        assert_eq!(
            html,
            "<mark style=\"background-color: #fff;\">a</mark> and <mark style=\"background-color: #fff;\">b</mark>"
        );
    }
}
