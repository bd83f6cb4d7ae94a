use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "marksmith.toml";

/// Settings read from a TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stylesheets placed before the ones given on the command line.
    pub stylesheets: Vec<PathBuf>,
    pub embed_styles: bool,
    pub no_overwrite: bool,
    pub default_title: Option<String>,
    /// Output file extension, without the dot.
    pub extension: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read config '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `explicit` if given, otherwise [`CONFIG_FILE`] when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Config::default());
                }
                path
            }
        };
        tracing::debug!(path = %path.display(), "loading config");

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Config::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_key() {
        let config = Config::parse(
            r#"
stylesheets = ["base.css", "theme.css"]
embed_styles = true
no_overwrite = true
default_title = "Notes"
extension = "html"
"#,
        )
        .unwrap();
        assert_eq!(
            config.stylesheets,
            vec![PathBuf::from("base.css"), PathBuf::from("theme.css")]
        );
        assert!(config.embed_styles);
        assert!(config.no_overwrite);
        assert_eq!(config.default_title.as_deref(), Some("Notes"));
        assert_eq!(config.extension.as_deref(), Some("html"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.stylesheets.is_empty());
        assert!(!config.embed_styles);
        assert!(config.default_title.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("embed_style = true").is_err());
    }

    #[test]
    fn load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_overwrite = true").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.no_overwrite);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }
}
