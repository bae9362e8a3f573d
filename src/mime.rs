//! Extension to content-type lookup.

use std::collections::HashMap;
use std::path::Path;

/// Sent for files whose extension is not recognised.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
    ("woff", "application/font-woff"),
    ("ttf", "application/font-ttf"),
    ("eot", "application/vnd.ms-fontobject"),
    ("otf", "application/font-otf"),
    ("svg", "image/svg+xml"),
];

/// Resolves a file's content type from its extension.
#[derive(Debug, Clone, Default)]
pub struct MimeResolver {
    overrides: HashMap<String, String>,
    guess: bool,
}

impl MimeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer extra mappings over the built-in table. Keys may be given with
    /// or without the leading dot.
    pub fn with_overrides(overrides: &HashMap<String, String>, guess: bool) -> Self {
        let overrides = overrides
            .iter()
            .map(|(ext, mime)| (normalize_ext(ext), mime.clone()))
            .collect();
        Self { overrides, guess }
    }

    pub fn resolve(&self, path: &Path) -> String {
        let Some(ext) = path.extension().map(|e| normalize_ext(&e.to_string_lossy())) else {
            return DEFAULT_CONTENT_TYPE.to_string();
        };

        if let Some(mime) = self.overrides.get(&ext) {
            return mime.clone();
        }

        if let Some((_, mime)) = BUILTIN_TYPES.iter().find(|(known, _)| *known == ext) {
            return (*mime).to_string();
        }

        if self.guess {
            return mime_guess::from_ext(&ext)
                .first_or_octet_stream()
                .to_string();
        }

        DEFAULT_CONTENT_TYPE.to_string()
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
