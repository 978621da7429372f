use ndarray::Array2;

use crate::sample::{sample, Sampling};

/// Central-difference image gradient at a real-valued location.
///
/// Returns `[d/dx, d/dy]`. The sampling strategy is a parameter: nearest is
/// enough when the caller has already resampled onto the pixel grid, bilinear
/// is needed at genuine sub-pixel locations.
pub fn gradient(data: &Array2<f32>, x: f32, y: f32, method: Sampling) -> [f32; 2] {
    [
        (sample(data, x + 1.0, y, method) - sample(data, x - 1.0, y, method)) * 0.5,
        (sample(data, x, y + 1.0, method) - sample(data, x, y - 1.0, method)) * 0.5,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_of_ramp() {
        // f(x, y) = 3x + 7y sampled on a 5x5 grid.
        let data = Array2::from_shape_fn((5, 5), |(r, c)| 3.0 * c as f32 + 7.0 * r as f32);

        let g = gradient(&data, 2.0, 2.0, Sampling::Nearest);
        assert!((g[0] - 3.0).abs() < 1e-6, "gx={}", g[0]);
        assert!((g[1] - 7.0).abs() < 1e-6, "gy={}", g[1]);

        let g = gradient(&data, 2.5, 1.5, Sampling::Bilinear);
        assert!((g[0] - 3.0).abs() < 1e-6, "gx={}", g[0]);
        assert!((g[1] - 7.0).abs() < 1e-6, "gy={}", g[1]);
    }

    #[test]
    fn test_gradient_flat_image_is_zero() {
        let data = Array2::from_elem((4, 4), 42.0f32);
        let g = gradient(&data, 1.5, 2.5, Sampling::Bilinear);
        assert_eq!(g, [0.0, 0.0]);
    }
}
