//! Local file loading (offline parsing).

use std::path::Path;

use crate::errors::{IoResultExt, Result};

use super::RawDocument;

/// Read a file verbatim. Unlike fetch failures, a read error here is a usage
/// problem and is returned to the caller.
pub async fn load_file(path: impl AsRef<Path>) -> Result<RawDocument> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_path(path.display().to_string(), "read")?;
    Ok(RawDocument::from_file(path, bytes))
}
