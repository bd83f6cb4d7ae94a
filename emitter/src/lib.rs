pub mod document;
pub mod error;
pub mod options;

pub use document::{render_document, render_str};
pub use error::EmitError;
pub use options::{DEFAULT_TITLE, RenderOptions, StylesheetMode};
