use crate::attributes::{self, Extracted};
use crate::block::ListKind;

/// What a raw-HTML line does to the passthrough depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawHtml {
    /// An opening tag; passthrough continues until it is closed.
    Open,
    /// A closing tag.
    Close,
    /// `@` lines, comments, self-contained tags and lines inside a raw region.
    Literal,
}

/// The block-level effect a line would have, decided without touching any
/// parser state.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockTransition {
    /// A line inside a fenced code block.
    CodeContent,
    RawHtml { kind: RawHtml, content_start: usize },
    Blank,
    /// Three backticks: opens or closes a code block.
    CodeFence,
    Blockquote(Extracted),
    Heading { level: usize, extracted: Extracted },
    ListItem {
        kind: ListKind,
        level: usize,
        extracted: Extracted,
    },
    Text(Extracted),
}

/// The parts of parser state classification depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    /// The innermost block is a code block.
    pub in_code: bool,
    /// Raw HTML tags are still open.
    pub in_raw: bool,
}

const FENCE: &str = "```";

/// Classify one line (without its terminator).
pub fn classify(line: &str, blank: bool, context: Context) -> BlockTransition {
    if context.in_code && !line.starts_with(FENCE) {
        return BlockTransition::CodeContent;
    }
    if let Some(raw) = raw_html(line, context.in_raw) {
        return raw;
    }
    if blank {
        return BlockTransition::Blank;
    }
    if line.starts_with('>') {
        return BlockTransition::Blockquote(attributes::extract(line, 1));
    }
    if line.starts_with(FENCE) {
        return BlockTransition::CodeFence;
    }
    if line.starts_with('#') {
        let hashes = line.bytes().take_while(|&b| b == b'#').count().min(6);
        return BlockTransition::Heading {
            level: hashes,
            extracted: attributes::extract(line, hashes),
        };
    }
    if let Some(marker) = list_marker(line) {
        return BlockTransition::ListItem {
            kind: marker.kind,
            level: marker.level,
            extracted: attributes::extract(line, marker.end),
        };
    }
    BlockTransition::Text(attributes::extract(line, 0))
}

fn raw_html(line: &str, in_raw: bool) -> Option<BlockTransition> {
    let first = line.find(|c: char| c != ' ' && c != '\t').unwrap_or(line.len());
    let rest = &line[first..];

    let (kind, content_start) = if rest.starts_with('@') {
        (RawHtml::Literal, first + 1)
    } else if rest.starts_with("</") {
        (RawHtml::Close, first)
    } else if rest.starts_with('<') {
        let self_contained =
            rest.starts_with("<!") || rest.trim_end().ends_with("/>") || rest.contains("</");
        let kind = if self_contained {
            RawHtml::Literal
        } else {
            RawHtml::Open
        };
        (kind, first)
    } else if in_raw {
        (RawHtml::Literal, 0)
    } else {
        return None;
    };

    Some(BlockTransition::RawHtml {
        kind,
        content_start,
    })
}

struct ListMarker {
    kind: ListKind,
    level: usize,
    /// Offset just past the marker.
    end: usize,
}

/// `-` or `<digits>.` after optional indentation. Tabs advance to the next
/// multiple of four columns.
fn list_marker(line: &str) -> Option<ListMarker> {
    let mut width = 0;
    let mut indent = 0;
    for b in line.bytes() {
        match b {
            b' ' => width += 1,
            b'\t' => width = (width / 4 + 1) * 4,
            _ => break,
        }
        indent += 1;
    }

    let rest = &line[indent..];
    let level = width / 4 + 1;
    if rest.starts_with('-') {
        return Some(ListMarker {
            kind: ListKind::Unordered,
            level,
            end: indent + 1,
        });
    }

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && rest[digits..].starts_with('.') {
        return Some(ListMarker {
            kind: ListKind::Ordered,
            level,
            end: indent + digits + 1,
        });
    }
    None
}
