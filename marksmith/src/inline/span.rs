use crate::html;

const BOLD_TAG: &str = r#"<span class="span-bold" style="font-weight: bold">"#;
const ITALIC_TAG: &str = r#"<span class="span-italic" style="font-style: italic">"#;
const BOLD_ITALIC_TAG: &str =
    r#"<span class="span-bold span-italic" style="font-weight: bold; font-style: italic">"#;
const STRIKETHROUGH_TAG: &str =
    r#"<span class="span-strikethrough" style="text-decoration: line-through">"#;
const CLOSE_TAG: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    /// `$class$[...]` or `$^style$[...]`. These nest, so several may be open.
    Custom,
}

/// An open inline span and the exact tag that opened it, so it can be
/// reopened after a span beneath it is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSpan {
    pub kind: SpanKind,
    open_tag: String,
}

impl OpenSpan {
    /// One of the fixed formatting spans.
    pub fn formatting(kind: SpanKind) -> Self {
        let tag = match kind {
            SpanKind::Bold => BOLD_TAG,
            SpanKind::Italic => ITALIC_TAG,
            SpanKind::BoldItalic => BOLD_ITALIC_TAG,
            SpanKind::Strikethrough => STRIKETHROUGH_TAG,
            SpanKind::Custom => "<span>",
        };
        OpenSpan {
            kind,
            open_tag: tag.to_string(),
        }
    }

    /// A custom span. A selector starting with `^` is an inline style, anything
    /// else a class name; an empty selector yields a bare `<span>`.
    pub fn custom(selector: &str) -> Self {
        let mut open_tag = String::from("<span");
        if let Some(style) = selector.strip_prefix('^') {
            open_tag.push_str(" style=\"");
            html::push_attribute_value(&mut open_tag, style);
            open_tag.push('"');
        } else if !selector.is_empty() {
            open_tag.push_str(" class=\"");
            html::push_attribute_value(&mut open_tag, selector);
            open_tag.push('"');
        }
        open_tag.push('>');
        OpenSpan {
            kind: SpanKind::Custom,
            open_tag,
        }
    }

    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }
}

/// Open spans of the line being rendered, innermost last.
#[derive(Debug, Default)]
pub struct SpanStack {
    spans: Vec<OpenSpan>,
}

impl SpanStack {
    pub fn new() -> Self {
        SpanStack { spans: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn is_open(&self, kind: SpanKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn open(&mut self, out: &mut String, span: OpenSpan) {
        out.push_str(&span.open_tag);
        self.spans.push(span);
    }

    /// Close the span if open, open it otherwise.
    pub fn toggle(&mut self, out: &mut String, kind: SpanKind) {
        if !self.close(out, kind) {
            self.open(out, OpenSpan::formatting(kind));
        }
    }

    /// Close the innermost span of `kind`. Spans opened after it are closed
    /// first and reopened afterwards, keeping the output properly nested.
    /// Returns false when no such span is open.
    pub fn close(&mut self, out: &mut String, kind: SpanKind) -> bool {
        let Some(index) = self.position(kind) else {
            return false;
        };
        let above = self.spans.split_off(index + 1);
        for _ in 0..=above.len() {
            out.push_str(CLOSE_TAG);
        }
        self.spans.pop();
        for span in above {
            self.open(out, span);
        }
        true
    }

    /// Close two spans, whichever is nested deeper first.
    pub fn close_pair(&mut self, out: &mut String, a: SpanKind, b: SpanKind) {
        let (first, second) = if self.position(a) > self.position(b) {
            (a, b)
        } else {
            (b, a)
        };
        self.close(out, first);
        self.close(out, second);
    }

    /// Close everything, innermost first.
    pub fn close_all(&mut self, out: &mut String) {
        for _ in self.spans.drain(..) {
            out.push_str(CLOSE_TAG);
        }
    }

    fn position(&self, kind: SpanKind) -> Option<usize> {
        self.spans.iter().rposition(|span| span.kind == kind)
    }
}
