use std::io::{self, Write};

use emitter::{EmitError, RenderOptions, render_document, render_str};

fn render(source: &str) -> String {
    render_with(source, &RenderOptions::default())
}

fn render_with(source: &str, options: &RenderOptions) -> String {
    let (html, _) = render_str(source, options).expect("render failed");
    html
}

/// Tag names opened minus tag names closed, for the tags the renderer emits.
fn assert_balanced(html: &str) {
    for tag in [
        "html", "head", "body", "style", "p", "blockquote", "pre", "code", "ul", "ol", "li", "h1",
        "h2", "h3", "span", "a",
    ] {
        let opens = html.matches(&format!("<{}>", tag)).count()
            + html.matches(&format!("<{} ", tag)).count();
        let closes = html.matches(&format!("</{}>", tag)).count();
        assert_eq!(opens, closes, "unbalanced <{}> in\n{}", tag, html);
    }
}

#[test]
fn complete_document() {
    assert_eq!(
        render("@@ My Page\n# Hello\nworld\n"),
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "    <head>\n",
            "        <title>My Page</title>\n",
            "    </head>\n",
            "    <body>\n",
            "        <h1>\n",
            "            Hello\n",
            "        </h1>\n",
            "        <p>\n",
            "            world\n",
            "        </p>\n",
            "    </body>\n",
            "</html>\n",
        )
    );
}

#[test]
fn empty_input_still_produces_a_skeleton() {
    assert_eq!(
        render(""),
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "    <head>\n",
            "        <title>Untitled</title>\n",
            "    </head>\n",
            "    <body>\n",
            "    </body>\n",
            "</html>\n",
        )
    );
}

#[test]
fn title_line_is_escaped_and_consumed() {
    let html = render("@@ Fish & Chips\nbody text\n");
    assert!(html.contains("<title>Fish &amp; Chips</title>"));
    assert!(!html.contains("@@"));
    assert!(html.contains("            body text\n"));
}

#[test]
fn default_title_comes_from_options() {
    let options = RenderOptions {
        default_title: "Notes".into(),
        ..RenderOptions::default()
    };
    assert!(render_with("text\n", &options).contains("<title>Notes</title>"));
}

#[test]
fn stylesheets_are_linked_in_order() {
    let options = RenderOptions::default()
        .with_stylesheet("base.css")
        .with_stylesheet("theme.css");
    let html = render_with("", &options);
    let base = html
        .find(r#"        <link rel="stylesheet" href="base.css" type="text/css" />"#)
        .expect("base.css link");
    let theme = html
        .find(r#"        <link rel="stylesheet" href="theme.css" type="text/css" />"#)
        .expect("theme.css link");
    assert!(base < theme);
}

#[test]
fn stylesheets_are_embedded_in_style_blocks() {
    let mut css = tempfile::NamedTempFile::new().unwrap();
    write!(css, "body {{\n  color: red;\n}}\n").unwrap();

    let options = RenderOptions::default()
        .with_stylesheet(css.path())
        .embedded();
    let html = render_with("", &options);
    assert!(html.contains(concat!(
        "        <style>\n",
        "            body {\n",
        "              color: red;\n",
        "            }\n",
        "        </style>\n",
        "    </head>\n",
    )));
    assert!(!html.contains("<link"));
}

#[test]
fn missing_stylesheet_is_skipped_when_embedding() {
    let dir = tempfile::tempdir().unwrap();
    let options = RenderOptions::default()
        .with_stylesheet(dir.path().join("missing.css"))
        .embedded();
    let html = render_with("text\n", &options);
    assert!(!html.contains("<style>"));
    assert_balanced(&html);
}

#[test]
fn head_block_is_copied_into_head() {
    let html = render("@@ T\n@$\n<meta charset=\"utf-8\">\n<script src=\"x.js\"></script>\n$@\ntext\n");
    assert!(html.contains(concat!(
        "        <title>T</title>\n",
        "        <meta charset=\"utf-8\">\n",
        "        <script src=\"x.js\"></script>\n",
        "    </head>\n",
    )));
    assert!(!html.contains("@$"));
    assert!(!html.contains("$@"));
}

#[test]
fn unterminated_head_block_is_a_warning() {
    let (html, diagnostics) = render_str("@$\n<meta>\n", &RenderOptions::default()).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 1);
    assert!(diagnostics[0].is_warning());
    assert!(html.contains("        <meta>\n    </head>\n    <body>\n"));
    assert!(html.ends_with("</html>\n"));
}

#[test]
fn unterminated_inline_code_is_reported() {
    let (html, diagnostics) =
        render_str("@@ T\nfine\nsee `this\n", &RenderOptions::default()).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 3);
    assert!(html.contains(r#"see <code class="code-inline">this"#));
}

#[test]
fn forced_breaks_follow_the_lookahead() {
    let html = render("one\ntwo\n\nthree\n");
    assert!(html.contains("one<br />\n"));
    assert!(html.contains("two\n"));
    assert!(!html.contains("two<br />"));
    assert_eq!(html.matches("<p>").count(), 2);
}

#[test]
fn crlf_input_renders_like_lf() {
    assert_eq!(
        render("@@ T\r\n# A\r\n\r\n- b\r\n"),
        render("@@ T\n# A\n\n- b\n")
    );
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let mut output = Vec::new();
    render_document(&b"caf\xe9\n"[..], &mut output, &RenderOptions::default(), 0).unwrap();
    let html = String::from_utf8(output).unwrap();
    assert!(html.contains("caf\u{FFFD}"));
}

#[test]
fn every_tag_is_balanced() {
    let sources = [
        "# h\n> q\n- a\n    1. b\n```\nx\n",
        "**unclosed *spans ~~everywhere\n",
        "$a$[custom **bold] text\n",
        "<div>\nraw\n</div>\n\n- a\n        - deep\n- b\n",
        "text\n```\ncode <b>\n```\n## sub\n### subsub\n",
    ];
    for source in sources {
        assert_balanced(&render(source));
    }
}

#[test]
fn unclosed_raw_html_does_not_shift_the_skeleton() {
    let html = render("<div>\ntext\n");
    assert!(html.ends_with("        <div>\n            text\n    </body>\n</html>\n"));
}

#[test]
fn links_images_and_spans_in_body() {
    let html = render("See [docs](https://example.com) and ![logo](logo.png) $note$[here].\n");
    assert!(html.contains(r#"<a href="https://example.com">docs</a>"#));
    assert!(html.contains(r#"<img src="logo.png" title="logo" alt="logo" />"#));
    assert!(html.contains(r#"<span class="note">here</span>."#));
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failures_are_errors() {
    let result = render_document(&b"text\n"[..], &mut FailingWriter, &RenderOptions::default(), 0);
    assert!(matches!(result, Err(EmitError::Write(_))));
}
