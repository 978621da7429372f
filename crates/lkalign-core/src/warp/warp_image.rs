use ndarray::Array2;

use crate::sample::{sample, Sampling};

use super::motion::Motion;

/// Materialize `src` under a motion into a destination raster.
///
/// Inverse mapping: for each destination pixel center p the motion reports
/// where that pixel comes from in `src`, and `src` is sampled there. The
/// destination shape is `(height, width)`.
pub fn warp_image(
    src: &Array2<f32>,
    dst_shape: (usize, usize),
    w: &Motion,
    sampling: Sampling,
) -> Array2<f32> {
    warp_image_scaled(src, dst_shape, w, sampling, 1.0, 1.0)
}

/// [`warp_image`] across pyramid levels: destination coordinates are scaled
/// up into finest-level coordinates before applying the motion, and the
/// warped location is scaled back down before sampling `src`. With both
/// factors at 1.0 this is a plain single-level warp.
pub fn warp_image_scaled(
    src: &Array2<f32>,
    dst_shape: (usize, usize),
    w: &Motion,
    sampling: Sampling,
    scale_up: f32,
    scale_down: f32,
) -> Array2<f32> {
    let (dst_h, dst_w) = dst_shape;
    let mut dst = Array2::<f32>::zeros((dst_h, dst_w));

    for row in 0..dst_h {
        for col in 0..dst_w {
            let (wx, wy) = w.apply(col as f32 * scale_up, row as f32 * scale_up);
            dst[[row, col]] = sample(src, wx * scale_down, wy * scale_down, sampling);
        }
    }

    dst
}
