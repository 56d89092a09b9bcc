//! PNG decode/encode off the async runtime.
//!
//! Image codec work is CPU-bound, so both operations run in
//! `spawn_blocking` to keep the worker tasks responsive.

use image::{DynamicImage, ImageFormat};
use std::path::Path;

use crate::error::PipelineError;

/// Decode the image at `path`.
pub async fn decode(path: &Path) -> Result<DynamicImage, PipelineError> {
    let path_owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || {
        image::open(&path_owned).map_err(|e| PipelineError::Decode {
            path: path_owned.clone(),
            message: e.to_string(),
        })
    })
    .await;

    match result {
        Ok(decoded) => decoded,
        Err(e) => Err(PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        }),
    }
}

/// Encode `image` as PNG at `path`, regardless of the path's extension.
pub async fn encode(image: DynamicImage, path: &Path) -> Result<(), PipelineError> {
    let path_owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || {
        image
            .save_with_format(&path_owned, ImageFormat::Png)
            .map_err(|e| PipelineError::Encode {
                path: path_owned.clone(),
                message: e.to_string(),
            })
    })
    .await;

    match result {
        Ok(encoded) => encoded,
        Err(e) => Err(PipelineError::Encode {
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        }),
    }
}
