use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Untitled";

/// How stylesheets end up in the document head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StylesheetMode {
    /// `<link rel="stylesheet">` pointing at the path as given.
    #[default]
    Link,
    /// The file's contents copied into a `<style>` block.
    Embed,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Title used when the document does not start with an `@@` line.
    pub default_title: String,
    /// Stylesheets in the order they should appear.
    pub stylesheets: Vec<PathBuf>,
    pub stylesheet_mode: StylesheetMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            default_title: DEFAULT_TITLE.to_string(),
            stylesheets: Vec::new(),
            stylesheet_mode: StylesheetMode::Link,
        }
    }
}

impl RenderOptions {
    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheets.push(path.into());
        self
    }

    pub fn embedded(mut self) -> Self {
        self.stylesheet_mode = StylesheetMode::Embed;
        self
    }
}
