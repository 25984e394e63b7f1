use std::path::PathBuf;

use wirebond_register::RegistrationError;
use wirebond_wires::WireCheckError;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Wires(#[from] WireCheckError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("{} has no UTF-8 file name", .0.display())]
    NoFileName(PathBuf),

    #[error("no reference image pairs with {}", .0.display())]
    NoReference(PathBuf),

    #[error("pad strip rows {rows:?}, columns {cols:?} exceed the {width}x{height} image")]
    StripOutOfBounds {
        rows: std::ops::Range<u32>,
        cols: std::ops::Range<u32>,
        width: u32,
        height: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
