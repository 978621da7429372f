use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::sample::reflect_101;

/// Apply Gaussian blur to a raw array using separable 1D convolution.
///
/// Borders are handled with reflect-101, the same policy the samplers use.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve_rows(data, &kernel);
    convolve_cols(&row_pass, &kernel)
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                (0..w)
                    .map(|col| {
                        let mut sum = 0.0f32;
                        for (ki, &kv) in kernel.iter().enumerate() {
                            let src_col =
                                reflect_101(col as i64 + ki as i64 - radius as i64, w);
                            sum += data[[row, src_col]] * kv;
                        }
                        sum
                    })
                    .collect()
            })
            .collect();

        collect_rows(rows, h, w)
    } else {
        let mut result = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_col = reflect_101(col as i64 + ki as i64 - radius as i64, w);
                    sum += data[[row, src_col]] * kv;
                }
                result[[row, col]] = sum;
            }
        }
        result
    }
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                (0..w)
                    .map(|col| {
                        let mut sum = 0.0f32;
                        for (ki, &kv) in kernel.iter().enumerate() {
                            let src_row =
                                reflect_101(row as i64 + ki as i64 - radius as i64, h);
                            sum += data[[src_row, col]] * kv;
                        }
                        sum
                    })
                    .collect()
            })
            .collect();

        collect_rows(rows, h, w)
    } else {
        let mut result = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_row = reflect_101(row as i64 + ki as i64 - radius as i64, h);
                    sum += data[[src_row, col]] * kv;
                }
                result[[row, col]] = sum;
            }
        }
        result
    }
}

fn collect_rows(rows: Vec<Vec<f32>>, h: usize, w: usize) -> Array2<f32> {
    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = make_gaussian_kernel(0.65);
        assert_eq!(kernel.len(), 5);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum={sum}");
    }

    #[test]
    fn test_blur_preserves_constant_image() {
        let data = Array2::from_elem((16, 16), 3.5f32);
        let blurred = gaussian_blur_array(&data, 1.0);
        for &v in blurred.iter() {
            assert!((v - 3.5).abs() < 1e-5, "v={v}");
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut data = Array2::<f32>::zeros((9, 9));
        data[[4, 4]] = 1.0;
        let blurred = gaussian_blur_array(&data, 0.65);
        assert!(blurred[[4, 4]] < 1.0);
        assert!(blurred[[4, 5]] > 0.0);
        assert!(blurred[[3, 4]] > 0.0);
        // Mass is conserved.
        let sum: f32 = blurred.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum={sum}");
    }
}
