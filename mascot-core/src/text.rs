use pulldown_cmark::{Event, Options, Parser, html};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

fn reasoning_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<thinking>.*?</thinking>|<think>.*?</think>|<reasoning>.*?</reasoning>")
            .expect("valid reasoning regex")
    })
}

fn json_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*\n(.*?)\n?```$").expect("valid fence regex"))
}

/// Strip `<think>`, `<thinking>` and `<reasoning>` blocks some models emit before the answer.
pub fn strip_reasoning_blocks(text: &str) -> String {
    reasoning_block_re().replace_all(text, "").trim().to_string()
}

/// Unwrap a model reply that wrapped its JSON in a Markdown code fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match json_fence_re().captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Convert lightweight Markdown into HTML that is safe to drop into the chat bubble.
///
/// Raw HTML in the input is escaped, never passed through. A reply that renders to a
/// single paragraph loses its `<p>` wrapper so plain sentences stay plain.
///
/// Total: if rendering panics for any reason the input is returned unchanged.
pub fn markdown_to_display(text: &str) -> String {
    convert_with(text, render_markdown)
}

fn convert_with(text: &str, render: impl FnOnce(&str) -> String) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| render(text))) {
        Ok(out) => out,
        Err(_) => text.to_string(),
    }
}

fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() + text.len() / 2);
    html::push_html(&mut out, events);

    unwrap_single_paragraph(out.trim_end())
}

fn unwrap_single_paragraph(rendered: &str) -> String {
    // Escaped content never contains a literal `<p>`, so counting tags is exact.
    let single = rendered.starts_with("<p>")
        && rendered.ends_with("</p>")
        && rendered.matches("<p>").count() == 1;
    if single {
        rendered["<p>".len()..rendered.len() - "</p>".len()].to_string()
    } else {
        rendered.to_string()
    }
}

/// HTML-escape text for places that must never render as markup (error reasons).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sentence_stays_plain() {
        assert_eq!(
            markdown_to_display("I went to the store yesterday."),
            "I went to the store yesterday."
        );
    }

    #[test]
    fn inline_markup_is_rendered() {
        assert_eq!(
            markdown_to_display("Changed **goes** to *went*."),
            "Changed <strong>goes</strong> to <em>went</em>."
        );
    }

    #[test]
    fn multiple_paragraphs_keep_their_wrappers() {
        let out = markdown_to_display("First.\n\nSecond.");
        assert_eq!(out, "<p>First.</p>\n<p>Second.</p>");
    }

    #[test]
    fn lists_render_as_html() {
        let out = markdown_to_display("- one\n- two");
        assert!(out.starts_with("<ul>"));
        assert!(out.contains("<li>one</li>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let out = markdown_to_display("hi <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn renderer_panic_returns_input_unchanged() {
        let input = "**Tom & Jerry** <b>\u{1F431}</b>\n\n- list";
        let out = convert_with(input, |_| panic!("renderer blew up"));
        assert_eq!(out, input);
        assert_eq!(out.as_bytes(), input.as_bytes());
    }

    #[test]
    fn malformed_markup_still_returns_text() {
        for input in ["**unclosed", "[link](", "```\nno fence end", "", "<<>>", "| a |\n|"] {
            let out = markdown_to_display(input);
            if !input.trim().is_empty() {
                assert!(!out.is_empty(), "empty output for {input:?}");
            }
        }
    }

    #[test]
    fn strips_reasoning_blocks() {
        assert_eq!(
            strip_reasoning_blocks("<think>plan</think>\nHello!"),
            "Hello!"
        );
    }

    #[test]
    fn strips_json_code_fence() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn escape_text_neutralizes_markup() {
        assert_eq!(
            escape_text(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }
}
