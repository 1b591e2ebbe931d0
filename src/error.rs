// One error type for the whole tool.
// Every variant states *where* things went wrong; nothing is retried.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Listing the source directory failed
    #[error("Cannot list {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening or decoding a source image failed
    #[error("Cannot load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Creating the mask output directory failed
    #[error("Cannot create mask directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding or writing a mask file failed
    #[error("Cannot write mask {}: {source}", path.display())]
    MaskSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
