//! Incremental file delivery.

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::{StreamExt, TryStreamExt};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

/// Build a 200 response whose body streams `path` in chunks of at most
/// `chunk_size` bytes.
///
/// Headers go out before the file is opened. An open or read failure after
/// that point aborts the body, which closes this connection only.
pub fn stream(path: PathBuf, content_type: &str, len: Option<u64>, chunk_size: usize) -> Response {
    debug!("Streaming file: {}", path.display());

    let failed_path = path.clone();
    let chunks = futures::stream::once(async move { fs::File::open(&path).await })
        .map_ok(move |file| ReaderStream::with_capacity(file, chunk_size))
        .try_flatten()
        .inspect_err(move |e| warn!("Streaming {} aborted: {}", failed_path.display(), e))
        .boxed();

    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        Body::from_stream(chunks),
    )
        .into_response();

    if let Some(len) = len {
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, len.into());
    }

    response
}
