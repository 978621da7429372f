use ndarray::Array2;

use crate::error::{AlignError, Result};

/// A single-channel intensity image.
///
/// Pixel data is stored as f32, row-major, shape = (height, width). Callers
/// hand in 8-bit, 16-bit or float pixels; the widening conversion to f32
/// happens once at construction so all downstream sampling and least-squares
/// arithmetic runs on a uniform representation.
#[derive(Clone, Debug)]
pub struct Raster {
    /// Pixel data, indexed `[[row, col]]`.
    pub data: Array2<f32>,
    /// Original bit depth before conversion (8, 16 or 32).
    pub original_bit_depth: u8,
}

impl Raster {
    /// Wrap an existing float array. Fails on zero-sized dimensions.
    pub fn from_array(data: Array2<f32>) -> Result<Self> {
        let (h, w) = data.dim();
        check_dims(w, h)?;
        Ok(Self {
            data,
            original_bit_depth: 32,
        })
    }

    /// Widen 8-bit pixels (row-major, `height * width` values) to float.
    pub fn from_u8(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        check_dims(width, height)?;
        check_len(width, height, pixels.len())?;
        let data = Array2::from_shape_fn((height, width), |(r, c)| pixels[r * width + c] as f32);
        Ok(Self {
            data,
            original_bit_depth: 8,
        })
    }

    /// Widen 16-bit pixels (row-major, `height * width` values) to float.
    pub fn from_u16(width: usize, height: usize, pixels: &[u16]) -> Result<Self> {
        check_dims(width, height)?;
        check_len(width, height, pixels.len())?;
        let data = Array2::from_shape_fn((height, width), |(r, c)| pixels[r * width + c] as f32);
        Ok(Self {
            data,
            original_bit_depth: 16,
        })
    }

    /// Take ownership of float pixels (row-major, `height * width` values).
    pub fn from_f32(width: usize, height: usize, pixels: Vec<f32>) -> Result<Self> {
        check_dims(width, height)?;
        check_len(width, height, pixels.len())?;
        let data = Array2::from_shape_vec((height, width), pixels)
            .expect("length checked above");
        Ok(Self {
            data,
            original_bit_depth: 32,
        })
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

fn check_dims(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AlignError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn check_len(width: usize, height: usize, actual: usize) -> Result<()> {
    let expected = width * height;
    if actual != expected {
        return Err(AlignError::BufferSizeMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}
