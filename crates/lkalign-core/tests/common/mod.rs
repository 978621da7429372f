use ndarray::{s, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lkalign_core::warp::ParamVec;

/// Deterministic smoothed random texture, the standard target image for
/// the convergence scenarios. Uniform noise in [0, 255) passed through a
/// 5x5 box blur.
pub fn smoothed_noise(h: usize, w: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Array2::from_shape_fn((h, w), |_| rng.random_range(0.0..255.0f32));
    box_blur_5(&noise)
}

/// 5x5 box blur with clamped borders.
pub fn box_blur_5(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));
    for r in 0..h {
        for c in 0..w {
            let mut sum = 0.0f32;
            for dr in -2i64..=2 {
                for dc in -2i64..=2 {
                    let rr = (r as i64 + dr).clamp(0, h as i64 - 1) as usize;
                    let cc = (c as i64 + dc).clamp(0, w as i64 - 1) as usize;
                    sum += data[[rr, cc]];
                }
            }
            result[[r, c]] = sum / 25.0;
        }
    }
    result
}

/// Copy a rectangular region out of an image.
pub fn crop(data: &Array2<f32>, y0: usize, x0: usize, h: usize, w: usize) -> Array2<f32> {
    data.slice(s![y0..y0 + h, x0..x0 + w]).to_owned()
}

/// Assert that two parameter vectors agree within `tol_frac` of the
/// expected vector's L1 norm.
pub fn assert_params_near(label: &str, actual: &ParamVec, expected: &ParamVec, tol_frac: f32) {
    let diff: f32 = actual
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .map(|(a, e)| (a - e).abs())
        .sum();
    let scale: f32 = expected.as_slice().iter().map(|v| v.abs()).sum();
    assert!(
        diff < tol_frac * scale,
        "{label}: |p - expected|_1 = {diff} exceeds {} (p = {:?}, expected = {:?})",
        tol_frac * scale,
        actual.as_slice(),
        expected.as_slice(),
    );
}
