use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StartupError;

/// Server tuning loaded from an optional TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Realm advertised in the `WWW-Authenticate` challenge
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Largest chunk handed to the socket when streaming a file (in bytes)
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,

    /// Refuse request paths that resolve outside the served root
    #[serde(default)]
    pub restrict_to_root: bool,

    /// HTML-escape entry names and links in directory listings
    #[serde(default)]
    pub escape_html: bool,

    /// Consult the mime_guess database for extensions missing from the table
    #[serde(default)]
    pub guess_mime_types: bool,

    /// Extra extension -> content type mappings, e.g. `md = "text/markdown"`
    #[serde(default)]
    pub mime_types: HashMap<String, String>,
}

fn default_realm() -> String {
    "Protected Area".to_string()
}

fn default_stream_chunk_size() -> usize {
    64 * 1024 // 64 KiB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            stream_chunk_size: default_stream_chunk_size(),
            restrict_to_root: false,
            escape_html: false,
            guess_mime_types: false,
            mime_types: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        let content = std::fs::read_to_string(path).map_err(|e| StartupError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        Self::from_toml(&content).map_err(|e| StartupError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        if config.stream_chunk_size == 0 {
            config.stream_chunk_size = default_stream_chunk_size();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.realm, "Protected Area");
        assert_eq!(config.stream_chunk_size, 65536);
        assert!(!config.restrict_to_root);
        assert!(!config.escape_html);
        assert!(!config.guess_mime_types);
        assert!(config.mime_types.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.realm, "Protected Area");
        assert_eq!(config.stream_chunk_size, 65536);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            realm = "Home Share"
            restrict_to_root = true

            [mime_types]
            md = "text/markdown"
            "#,
        )
        .unwrap();

        assert_eq!(config.realm, "Home Share");
        assert!(config.restrict_to_root);
        assert!(!config.escape_html);
        assert_eq!(config.mime_types.get("md").unwrap(), "text/markdown");
    }

    #[test]
    fn test_zero_chunk_size_falls_back() {
        let config = Config::from_toml("stream_chunk_size = 0").unwrap();
        assert_eq!(config.stream_chunk_size, 65536);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("realm = [").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "escape_html = true").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.escape_html);
    }

    #[test]
    fn test_from_missing_file() {
        let result = Config::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(StartupError::Config { .. })));
    }
}
