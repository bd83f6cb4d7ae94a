pub mod stack;

use crate::attributes::AttributeSet;

/// Containers that make up the document skeleton. They sit at the base of
/// the stack and are only opened and closed by the document driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateBlock {
    Html,
    Head,
    Body,
    Style,
}

/// Containers produced by markup in the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBlock {
    Paragraph,
    Blockquote,
    Pre,
    Code,
    UnorderedList,
    OrderedList,
    ListItem,
    /// Heading level, always within 1..=6.
    Heading(u8),
}

/// Any block that can be open on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Template(TemplateBlock),
    Content(ContentBlock),
}

/// Which kind of list a list marker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ContentBlock {
    /// A heading block with its level clamped to 1..=6.
    pub fn heading(level: usize) -> Self {
        ContentBlock::Heading(level.clamp(1, 6) as u8)
    }

    pub fn list(kind: ListKind) -> Self {
        match kind {
            ListKind::Unordered => ContentBlock::UnorderedList,
            ListKind::Ordered => ContentBlock::OrderedList,
        }
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            ContentBlock::Paragraph => "p",
            ContentBlock::Blockquote => "blockquote",
            ContentBlock::Pre => "pre",
            ContentBlock::Code => "code",
            ContentBlock::UnorderedList => "ul",
            ContentBlock::OrderedList => "ol",
            ContentBlock::ListItem => "li",
            ContentBlock::Heading(1) => "h1",
            ContentBlock::Heading(2) => "h2",
            ContentBlock::Heading(3) => "h3",
            ContentBlock::Heading(4) => "h4",
            ContentBlock::Heading(5) => "h5",
            ContentBlock::Heading(_) => "h6",
        }
    }
}

impl TemplateBlock {
    pub fn tag_name(self) -> &'static str {
        match self {
            TemplateBlock::Html => "html",
            TemplateBlock::Head => "head",
            TemplateBlock::Body => "body",
            TemplateBlock::Style => "style",
        }
    }
}

impl BlockKind {
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockKind::Template(block) => block.tag_name(),
            BlockKind::Content(block) => block.tag_name(),
        }
    }

    pub fn is_template(self) -> bool {
        matches!(self, BlockKind::Template(_))
    }

    /// List containers and list items.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            BlockKind::Content(
                ContentBlock::UnorderedList | ContentBlock::OrderedList | ContentBlock::ListItem
            )
        )
    }

    pub fn is_list_container(self) -> bool {
        matches!(
            self,
            BlockKind::Content(ContentBlock::UnorderedList | ContentBlock::OrderedList)
        )
    }
}

impl From<ContentBlock> for BlockKind {
    fn from(block: ContentBlock) -> Self {
        BlockKind::Content(block)
    }
}

impl From<TemplateBlock> for BlockKind {
    fn from(block: TemplateBlock) -> Self {
        BlockKind::Template(block)
    }
}

/// An entry on the block stack. Attributes are fixed when the block opens.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenBlock {
    pub kind: BlockKind,
    pub attributes: AttributeSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels_are_clamped() {
        assert_eq!(ContentBlock::heading(0), ContentBlock::Heading(1));
        assert_eq!(ContentBlock::heading(9), ContentBlock::Heading(6));
        assert_eq!(ContentBlock::heading(3).tag_name(), "h3");
    }

    #[test]
    fn tag_names() {
        assert_eq!(BlockKind::from(TemplateBlock::Body).tag_name(), "body");
        assert_eq!(BlockKind::from(ContentBlock::OrderedList).tag_name(), "ol");
        assert!(BlockKind::from(ContentBlock::ListItem).is_list());
        assert!(!BlockKind::from(ContentBlock::ListItem).is_list_container());
        assert!(!BlockKind::from(ContentBlock::Paragraph).is_list());
    }
}
