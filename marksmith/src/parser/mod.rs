pub mod error;
pub mod transition;

pub use error::MarkupError;
pub use transition::{BlockTransition, RawHtml};

use crate::attributes::AttributeSet;
use crate::block::stack::BlockStack;
use crate::block::{BlockKind, ContentBlock, ListKind, TemplateBlock};
use crate::html;
use crate::inline;
use crate::source::Line;

/// Everything that persists from one line to the next.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    stack: BlockStack,
    /// Nesting level of the most recent list line, 0 outside lists.
    list_level: usize,
    /// Raw HTML tags opened and not yet closed.
    raw_offset: usize,
}

impl ParserState {
    pub fn stack(&self) -> &BlockStack {
        &self.stack
    }

    pub fn list_level(&self) -> usize {
        self.list_level
    }

    pub fn raw_offset(&self) -> usize {
        self.raw_offset
    }

    /// Indentation depth of content written at this point.
    pub fn depth(&self) -> usize {
        self.stack.len() + self.raw_offset
    }

    fn context(&self) -> transition::Context {
        transition::Context {
            in_code: self.stack.top_is(ContentBlock::Code),
            in_raw: self.raw_offset > 0,
        }
    }

    fn open(&mut self, out: &mut String, block: ContentBlock, attributes: AttributeSet) {
        self.stack.open(out, self.raw_offset, block.into(), attributes);
    }

    fn close(&mut self, out: &mut String) {
        self.stack.close(out, self.raw_offset);
    }

    fn close_to_base(&mut self, out: &mut String) {
        self.stack.close_to_base(out, self.raw_offset);
        self.list_level = 0;
    }
}

/// The block stack machine. Feed it the body of a document one line at a
/// time; it writes block tags and hands line content to the inline renderer.
pub struct Parser {
    state: ParserState,
    file_id: usize,
    diagnostics: Vec<MarkupError>,
}

impl Parser {
    pub fn new(file_id: usize) -> Self {
        Parser {
            state: ParserState::default(),
            file_id,
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub fn file_id(&self) -> usize {
        self.file_id
    }

    pub fn diagnostics(&self) -> &[MarkupError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<MarkupError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Record a diagnostic found outside the body, e.g. by the document driver.
    pub fn report(&mut self, diagnostic: MarkupError) {
        self.diagnostics.push(diagnostic);
    }

    // -----------------------------------------------------------------------
    // Document skeleton
    // -----------------------------------------------------------------------

    pub fn enter_template(&mut self, block: TemplateBlock) -> String {
        let mut out = String::new();
        self.state
            .stack
            .open(&mut out, 0, block.into(), AttributeSet::default());
        out
    }

    /// Close the innermost block, which the driver expects to be a template block.
    pub fn leave_template(&mut self) -> String {
        let mut out = String::new();
        debug_assert!(self.state.stack.top().is_some_and(BlockKind::is_template));
        self.state.close(&mut out);
        out
    }

    /// `text` on its own line at the current depth.
    pub fn indented(&self, text: &str) -> String {
        let mut out = String::new();
        html::push_indent(&mut out, self.state.depth());
        out.push_str(text);
        out.push('\n');
        out
    }

    /// Close every open block, deepest first. After this the stack is empty.
    /// Raw tags left open belong to the author, so they do not shift the
    /// closing tags.
    pub fn drain(&mut self) -> String {
        let mut out = String::new();
        self.state.raw_offset = 0;
        self.state.stack.drain(&mut out, 0);
        self.state.list_level = 0;
        out
    }

    // -----------------------------------------------------------------------
    // Body lines
    // -----------------------------------------------------------------------

    /// Decide what `line` would do in the current state, without changing it.
    pub fn classify(&self, line: &Line) -> BlockTransition {
        transition::classify(line.content(), line.is_blank(), self.state.context())
    }

    /// Process one body line. `lookahead` is the following line, if any,
    /// used to choose between a plain newline and a forced `<br />`.
    pub fn process_line(&mut self, line: &Line, lookahead: Option<&Line>) -> String {
        let mut out = String::new();
        let content = line.content();

        let start = match self.classify(line) {
            BlockTransition::CodeContent => {
                html::push_text(&mut out, content);
                out.push('\n');
                return out;
            }
            BlockTransition::RawHtml {
                kind,
                content_start,
            } => {
                self.write_raw(&mut out, kind, &content[content_start..]);
                return out;
            }
            BlockTransition::Blank => {
                self.state.close_to_base(&mut out);
                return out;
            }
            BlockTransition::CodeFence => {
                self.apply_fence(&mut out);
                return out;
            }
            BlockTransition::Blockquote(extracted) => {
                if !self.state.stack.top_is(ContentBlock::Blockquote) {
                    self.state.close_to_base(&mut out);
                    self.state
                        .open(&mut out, ContentBlock::Blockquote, extracted.attributes);
                }
                extracted.content_start
            }
            BlockTransition::Heading { level, extracted } => {
                self.state.close_to_base(&mut out);
                self.state
                    .open(&mut out, ContentBlock::heading(level), extracted.attributes);
                extracted.content_start
            }
            BlockTransition::ListItem {
                kind,
                level,
                extracted,
            } => {
                self.apply_list_item(&mut out, kind, level, extracted.attributes);
                extracted.content_start
            }
            BlockTransition::Text(extracted) => {
                self.apply_text(&mut out, extracted.attributes);
                extracted.content_start
            }
        };

        let text = &content[start..];
        if text.is_empty() {
            return out;
        }
        html::push_indent(&mut out, self.state.depth());
        let outcome = inline::render(text, &mut out);
        if let Some(code_start) = outcome.unterminated_code {
            let at = start + code_start;
            self.diagnostics.push(
                MarkupError::warning(
                    "unterminated inline code span",
                    line.number,
                    line.span(at, content.len()),
                    self.file_id,
                )
                .with_note("inline code must be closed with a backtick on the same line"),
            );
        }
        out.push_str(self.line_ending(lookahead));
        out
    }

    fn write_raw(&mut self, out: &mut String, kind: RawHtml, text: &str) {
        if self.state.raw_offset == 0 {
            self.state.close_to_base(out);
        }
        let depth = match kind {
            RawHtml::Open => {
                if self.state.raw_offset == 0 {
                    tracing::debug!("entering raw html passthrough");
                }
                self.state.raw_offset += 1;
                self.state.depth() - 1
            }
            RawHtml::Close => {
                self.state.raw_offset = self.state.raw_offset.saturating_sub(1);
                if self.state.raw_offset == 0 {
                    tracing::debug!("leaving raw html passthrough");
                }
                self.state.depth()
            }
            RawHtml::Literal => self.state.depth(),
        };
        if !text.is_empty() {
            html::push_indent(out, depth);
            out.push_str(text);
        }
        out.push('\n');
    }

    fn apply_fence(&mut self, out: &mut String) {
        if self.state.stack.top_is(ContentBlock::Code) {
            self.state.close(out);
            return;
        }
        // code blocks may nest inside a list item, nowhere else
        if !self.state.stack.top_is(ContentBlock::ListItem) {
            self.state.close_to_base(out);
        }
        self.state.stack.open_code(out, self.state.raw_offset);
    }

    fn apply_list_item(
        &mut self,
        out: &mut String,
        kind: ListKind,
        level: usize,
        attributes: AttributeSet,
    ) {
        if self.state.list_level == 0 {
            self.state.close_to_base(out);
        }

        if level > self.state.list_level {
            for _ in self.state.list_level..level {
                self.state
                    .open(out, ContentBlock::list(kind), AttributeSet::default());
            }
        } else {
            // close the current item, then one container and item per level dropped
            loop {
                match self.state.stack.top_content() {
                    Some(ContentBlock::ListItem) => self.state.close(out),
                    Some(ContentBlock::UnorderedList | ContentBlock::OrderedList)
                        if self.state.stack.list_depth() > level =>
                    {
                        self.state.close(out)
                    }
                    _ => break,
                }
            }
        }

        self.state.open(out, ContentBlock::ListItem, attributes);
        self.state.list_level = level;
    }

    fn apply_text(&mut self, out: &mut String, attributes: AttributeSet) {
        while self.state.stack.top().is_some_and(BlockKind::is_list) {
            self.state.close(out);
        }
        self.state.list_level = 0;

        let in_paragraph = self.state.stack.top_is(ContentBlock::Paragraph);
        if !self.state.stack.at_base() && (!in_paragraph || !attributes.is_empty()) {
            self.state.close_to_base(out);
        }
        if !self.state.stack.top_is(ContentBlock::Paragraph) {
            self.state.open(out, ContentBlock::Paragraph, attributes);
        }
    }

    /// The terminator for a rendered content line: a forced break when the
    /// next line continues the same paragraph or blockquote.
    fn line_ending(&self, lookahead: Option<&Line>) -> &'static str {
        let Some(next) = lookahead else {
            return "\n";
        };
        let forced = match (self.state.stack.top_content(), self.classify(next)) {
            (Some(ContentBlock::Paragraph), BlockTransition::Text(extracted)) => {
                extracted.content_start == 0
            }
            (Some(ContentBlock::Blockquote), BlockTransition::Blockquote(_)) => true,
            _ => false,
        };
        if forced { "<br />\n" } else { "\n" }
    }
}
