use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel buffer length {actual} does not match {width}x{height} = {expected}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, AlignError>;
