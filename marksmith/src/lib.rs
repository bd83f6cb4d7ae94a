//! Line-oriented renderer for a Markdown-like markup language.
//!
//! The [`parser::Parser`] keeps a stack of open HTML blocks and is fed one
//! [`source::Line`] at a time; inline markup within a line is handled by
//! [`inline::render`].

pub mod attributes;
pub mod block;
pub mod html;
pub mod inline;
pub mod parser;
pub mod source;

pub use attributes::AttributeSet;
pub use block::{BlockKind, ContentBlock, TemplateBlock};
pub use parser::{BlockTransition, MarkupError, Parser, ParserState};
pub use source::{Line, LineSource};
