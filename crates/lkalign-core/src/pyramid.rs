//! Coarse-to-fine image pyramid.
//!
//! Level 0 is the finest (original) resolution; each subsequent level is a
//! Gaussian-smoothed half-scale copy of its predecessor. The alignment
//! engines iterate from the coarsest level towards level 0, which lets a
//! local least-squares step capture displacements far larger than the
//! single-level pull-in range.

use ndarray::Array2;

use crate::consts::{MIN_PYRAMID_DIM, PYRAMID_BLUR_SIGMA};
use crate::filters::gaussian_blur::gaussian_blur_array;

/// A multi-resolution stack of rasters. Level 0 = finest.
#[derive(Clone, Debug)]
pub struct Pyramid {
    levels: Vec<Array2<f32>>,
}

impl Pyramid {
    /// Build a pyramid with `levels` entries. Level 0 is a copy of `data`;
    /// each further level is low-pass-filtered and decimated by two.
    /// `levels` is clamped to at least 1.
    pub fn build(data: &Array2<f32>, levels: usize) -> Self {
        let levels = levels.max(1);
        let mut pyr = Vec::with_capacity(levels);
        pyr.push(data.clone());

        for k in 1..levels {
            let blurred = gaussian_blur_array(&pyr[k - 1], PYRAMID_BLUR_SIGMA);
            pyr.push(decimate_2x(&blurred));
        }

        Pyramid { levels: pyr }
    }

    /// Largest level count such that both dimensions at the coarsest level
    /// are still at least `MIN_PYRAMID_DIM` pixels.
    pub fn max_levels_for_size(width: usize, height: usize) -> usize {
        let mut levels = 0;
        let (mut w, mut h) = (width, height);
        while w >= MIN_PYRAMID_DIM && h >= MIN_PYRAMID_DIM {
            w /= 2;
            h /= 2;
            levels += 1;
        }
        levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The raster at level `k` (0 = finest).
    pub fn level(&self, k: usize) -> &Array2<f32> {
        &self.levels[k]
    }
}

/// Downsample an image by 2x by taking every other pixel.
fn decimate_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let new_h = (h + 1) / 2;
    let new_w = (w + 1) / 2;
    let mut result = Array2::<f32>::zeros((new_h, new_w));

    for r in 0..new_h {
        for c in 0..new_w {
            result[[r, c]] = data[[r * 2, c * 2]];
        }
    }

    result
}
