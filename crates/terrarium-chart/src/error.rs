//! Error types for the terrarium-chart renderer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("chart dimensions {width}x{height} leave no room for the plot area")]
  TooSmall { width: u32, height: u32 },

  #[error("png encoding failed: {0}")]
  Encode(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
