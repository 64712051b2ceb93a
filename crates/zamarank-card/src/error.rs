use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("failed to load card background {path}: {source}")]
    BackgroundFile {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode card background: {0}")]
    BackgroundDecode(#[source] image::ImageError),

    #[error("failed to encode card PNG: {0}")]
    Encode(#[source] image::ImageError),
}
