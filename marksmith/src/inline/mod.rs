//! Inline markup of a single line: emphasis spans, inline code, links,
//! images and custom spans.

pub mod span;
pub mod token;

use crate::html;
use span::{OpenSpan, SpanKind, SpanStack};

const CODE_OPEN: &str = r#"<code class="code-inline">"#;
const CODE_CLOSE: &str = "</code>";
const EM_SPACE: &str = "&emsp;";

/// What the caller needs to know after a line has been rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineOutcome {
    /// Byte offset of an inline code span still open at the end of the line.
    pub unterminated_code: Option<usize>,
}

/// Render one line of content into `out`.
///
/// Spans still open at the end of the line are closed, innermost first. An
/// open inline code span is left as is and reported in the outcome, since
/// code spans never continue onto the next line.
pub fn render(content: &str, out: &mut String) -> InlineOutcome {
    let mut renderer = InlineRenderer {
        out,
        spans: SpanStack::new(),
        code_start: None,
    };
    let mut pos = 0;
    while pos < content.len() {
        pos += renderer.step(&content[pos..], pos);
    }
    renderer.finish()
}

struct InlineRenderer<'o> {
    out: &'o mut String,
    spans: SpanStack,
    code_start: Option<usize>,
}

impl InlineRenderer<'_> {
    /// Render whatever starts `rest` and return how many bytes it consumed.
    fn step(&mut self, rest: &str, pos: usize) -> usize {
        let Some(c) = rest.chars().next() else {
            return 1;
        };

        if self.code_start.is_some() {
            if c == '`' {
                self.out.push_str(CODE_CLOSE);
                self.code_start = None;
            } else {
                html::push_char(self.out, c);
            }
            return c.len_utf8();
        }

        match c {
            '\\' => match rest[1..].chars().next() {
                Some(escaped) => {
                    html::push_char(self.out, escaped);
                    1 + escaped.len_utf8()
                }
                None => {
                    self.out.push('\\');
                    1
                }
            },
            ' ' if rest.starts_with("    ") => {
                self.out.push_str(EM_SPACE);
                4
            }
            '`' => {
                self.out.push_str(CODE_OPEN);
                self.code_start = Some(pos);
                1
            }
            '_' if rest.starts_with("_**") && !self.spans.is_open(SpanKind::BoldItalic) => {
                self.spans
                    .open(self.out, OpenSpan::formatting(SpanKind::BoldItalic));
                3
            }
            '*' if rest.starts_with("**_") && self.spans.is_open(SpanKind::BoldItalic) => {
                self.spans.close(self.out, SpanKind::BoldItalic);
                3
            }
            '*' if rest.starts_with("***")
                && self.spans.is_open(SpanKind::Bold)
                && self.spans.is_open(SpanKind::Italic) =>
            {
                self.spans
                    .close_pair(self.out, SpanKind::Bold, SpanKind::Italic);
                3
            }
            '*' if rest.starts_with("**") => {
                self.spans.toggle(self.out, SpanKind::Bold);
                2
            }
            '*' => {
                self.spans.toggle(self.out, SpanKind::Italic);
                1
            }
            '~' if rest.starts_with("~~") => {
                self.spans.toggle(self.out, SpanKind::Strikethrough);
                2
            }
            ']' if self.spans.is_open(SpanKind::Custom) => {
                self.spans.close(self.out, SpanKind::Custom);
                1
            }
            '$' => match token::custom_span(rest) {
                Some(token) => {
                    self.spans.open(self.out, OpenSpan::custom(token.selector));
                    token.len
                }
                None => {
                    self.out.push('$');
                    1
                }
            },
            '!' => match token::link(&rest[1..]) {
                Some(image) => {
                    self.push_image(image.name, image.url);
                    1 + image.len
                }
                None => {
                    self.out.push('!');
                    1
                }
            },
            '[' => match token::link(rest) {
                Some(link) => {
                    self.push_link(link.name, link.url);
                    link.len
                }
                None => {
                    self.out.push('[');
                    1
                }
            },
            _ => {
                html::push_char(self.out, c);
                c.len_utf8()
            }
        }
    }

    fn push_link(&mut self, name: &str, url: &str) {
        self.out.push_str("<a href=\"");
        html::push_attribute_value(self.out, url);
        self.out.push_str("\">");
        html::push_text(self.out, name);
        self.out.push_str("</a>");
    }

    fn push_image(&mut self, name: &str, url: &str) {
        self.out.push_str("<img src=\"");
        html::push_attribute_value(self.out, url);
        self.out.push('"');
        if !name.is_empty() {
            self.out.push_str(" title=\"");
            html::push_attribute_value(self.out, name);
            self.out.push_str("\" alt=\"");
            html::push_attribute_value(self.out, name);
            self.out.push('"');
        }
        self.out.push_str(" />");
    }

    fn finish(mut self) -> InlineOutcome {
        self.spans.close_all(self.out);
        InlineOutcome {
            unterminated_code: self.code_start,
        }
    }
}
