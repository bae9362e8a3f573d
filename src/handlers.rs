use std::path::{Path, PathBuf};

use axum::{
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tracing::debug;

use crate::AppState;
use crate::error::FileServerError;
use crate::{listing, paths, stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
    Missing,
}

/// Filesystem view of a request path, computed fresh for every request.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub absolute_path: PathBuf,
    pub kind: TargetKind,
    /// Size in bytes, known for files only
    pub len: Option<u64>,
}

impl ResolvedTarget {
    /// Stat `absolute_path`, following symlinks. Anything that is not a
    /// directory is served as a file.
    pub async fn inspect(absolute_path: PathBuf) -> Self {
        match fs::metadata(&absolute_path).await {
            Ok(metadata) if metadata.is_dir() => Self {
                absolute_path,
                kind: TargetKind::Directory,
                len: None,
            },
            Ok(metadata) => Self {
                absolute_path,
                kind: TargetKind::File,
                len: Some(metadata.len()),
            },
            Err(e) => {
                debug!("stat {} failed: {}", absolute_path.display(), e);
                Self {
                    absolute_path,
                    kind: TargetKind::Missing,
                    len: None,
                }
            }
        }
    }
}

/// Fallback handler for every method and path.
pub async fn serve_path(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, FileServerError> {
    let raw_path = uri.path();
    let path = paths::resolve(raw_path, &state.root_dir)?;

    if state.config.restrict_to_root {
        paths::ensure_within_root(&path, &state.root_dir)?;
    }

    let target = ResolvedTarget::inspect(path).await;
    debug!("{} -> {:?} {}", raw_path, target.kind, target.absolute_path.display());

    match target.kind {
        TargetKind::Missing => Err(FileServerError::NotFound(target.absolute_path)),
        TargetKind::Directory => {
            let entries = read_entries(&target.absolute_path).await;
            listing_response(raw_path, entries, state.config.escape_html)
        }
        TargetKind::File => {
            let content_type = state.mime.resolve(&target.absolute_path);
            Ok(stream::stream(
                target.absolute_path,
                &content_type,
                target.len,
                state.config.stream_chunk_size,
            ))
        }
    }
}

/// 200 listing for a successful read, 500 naming the error otherwise.
fn listing_response(
    raw_path: &str,
    entries: std::io::Result<Vec<String>>,
    escape: bool,
) -> Result<Response, FileServerError> {
    let entries = entries.map_err(FileServerError::DirectoryRead)?;
    let html = listing::render(raw_path, &entries, escape);
    Ok(([(header::CONTENT_TYPE, "text/html")], html).into_response())
}

/// Entry names in the order the filesystem reports them.
async fn read_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
