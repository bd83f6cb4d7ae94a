use crate::attributes::AttributeSet;
use crate::block::{BlockKind, ContentBlock, OpenBlock};
use crate::html;

/// Blocks currently open in the output, innermost last.
#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    blocks: Vec<OpenBlock>,
}

impl BlockStack {
    pub fn new() -> Self {
        BlockStack { blocks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn top(&self) -> Option<BlockKind> {
        self.blocks.last().map(|block| block.kind)
    }

    /// The innermost block if it is a content block.
    pub fn top_content(&self) -> Option<ContentBlock> {
        match self.top()? {
            BlockKind::Content(block) => Some(block),
            BlockKind::Template(_) => None,
        }
    }

    pub fn top_is(&self, block: ContentBlock) -> bool {
        self.top_content() == Some(block)
    }

    /// True when only document template blocks are open.
    pub fn at_base(&self) -> bool {
        self.top_content().is_none()
    }

    /// Number of open list containers (`ul`/`ol`).
    pub fn list_depth(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.kind.is_list_container())
            .count()
    }

    /// Write the opening tag at the current depth plus `pad`, then push.
    pub fn open(&mut self, out: &mut String, pad: usize, kind: BlockKind, attributes: AttributeSet) {
        html::push_indent(out, self.len() + pad);
        out.push('<');
        out.push_str(kind.tag_name());
        out.push_str(&attributes.to_string());
        out.push_str(">\n");
        tracing::trace!(tag = kind.tag_name(), depth = self.len(), "open block");
        self.blocks.push(OpenBlock { kind, attributes });
    }

    /// Open a `pre`/`code` pair, written on one line as `<pre><code>`.
    pub fn open_code(&mut self, out: &mut String, pad: usize) {
        html::push_indent(out, self.len() + pad);
        out.push_str("<pre><code>\n");
        tracing::trace!(depth = self.len(), "open code block");
        self.blocks.push(OpenBlock {
            kind: ContentBlock::Pre.into(),
            attributes: AttributeSet::default(),
        });
        self.blocks.push(OpenBlock {
            kind: ContentBlock::Code.into(),
            attributes: AttributeSet::default(),
        });
    }

    /// Pop the innermost block and write its closing tag. A `code` block
    /// takes its enclosing `pre` with it. Returns false on an empty stack.
    pub fn close(&mut self, out: &mut String, pad: usize) -> bool {
        let Some(block) = self.blocks.pop() else {
            return false;
        };
        let code_pair = block.kind == BlockKind::Content(ContentBlock::Code)
            && self.top_is(ContentBlock::Pre);
        if code_pair {
            self.blocks.pop();
        }

        html::push_indent(out, self.len() + pad);
        if code_pair {
            out.push_str("</code></pre>\n");
        } else {
            out.push_str("</");
            out.push_str(block.kind.tag_name());
            out.push_str(">\n");
        }
        tracing::trace!(tag = block.kind.tag_name(), depth = self.len(), "close block");
        true
    }

    /// Close content blocks until only template blocks remain.
    pub fn close_to_base(&mut self, out: &mut String, pad: usize) {
        while !self.at_base() {
            self.close(out, pad);
        }
    }

    /// Close everything, template blocks included.
    pub fn drain(&mut self, out: &mut String, pad: usize) {
        while self.close(out, pad) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TemplateBlock;

    fn with_body() -> (BlockStack, String) {
        let mut stack = BlockStack::new();
        let mut out = String::new();
        stack.open(&mut out, 0, TemplateBlock::Html.into(), AttributeSet::default());
        stack.open(&mut out, 0, TemplateBlock::Body.into(), AttributeSet::default());
        out.clear();
        (stack, out)
    }

    #[test]
    fn open_and_close_are_indented_by_depth() {
        let (mut stack, mut out) = with_body();
        stack.open(&mut out, 0, ContentBlock::Paragraph.into(), AttributeSet::default());
        stack.close(&mut out, 0);
        assert_eq!(out, "        <p>\n        </p>\n");
    }

    #[test]
    fn attributes_are_rendered_on_open() {
        let (mut stack, mut out) = with_body();
        let attributes = AttributeSet {
            id: Some("x".into()),
            ..AttributeSet::default()
        };
        stack.open(&mut out, 0, ContentBlock::heading(2).into(), attributes);
        assert_eq!(out, "        <h2 id=\"x\">\n");
    }

    #[test]
    fn code_pair_closes_together() {
        let (mut stack, mut out) = with_body();
        stack.open_code(&mut out, 0);
        assert_eq!(stack.len(), 4);
        stack.close(&mut out, 0);
        assert_eq!(stack.len(), 2);
        assert_eq!(out, "        <pre><code>\n        </code></pre>\n");
    }

    #[test]
    fn close_to_base_stops_at_template() {
        let (mut stack, mut out) = with_body();
        stack.open(&mut out, 0, ContentBlock::UnorderedList.into(), AttributeSet::default());
        stack.open(&mut out, 0, ContentBlock::ListItem.into(), AttributeSet::default());
        assert_eq!(stack.list_depth(), 1);
        stack.close_to_base(&mut out, 0);
        assert_eq!(stack.len(), 2);
        assert!(stack.at_base());
    }

    #[test]
    fn drain_empties_the_stack() {
        let (mut stack, mut out) = with_body();
        stack.open(&mut out, 0, ContentBlock::Blockquote.into(), AttributeSet::default());
        stack.drain(&mut out, 0);
        assert!(stack.is_empty());
        assert_eq!(out, "        <blockquote>\n        </blockquote>\n    </body>\n</html>\n");
        assert!(!stack.close(&mut out, 0));
    }
}
