use ndarray::Array2;

use lkalign_core::sample::{reflect_101, sample, Sampling};

/// The 2x2 fixture raster {{0, 64}, {128, 192}}, indexed (row, col).
fn fixture_2x2() -> Array2<f32> {
    Array2::from_shape_vec((2, 2), vec![0.0, 64.0, 128.0, 192.0]).unwrap()
}

// ---------------------------------------------------------------------------
// Pixel centers
// ---------------------------------------------------------------------------

#[test]
fn test_bilinear_exact_at_pixel_centers() {
    let img = fixture_2x2();
    assert_eq!(sample(&img, 0.0, 0.0, Sampling::Bilinear), 0.0);
    assert_eq!(sample(&img, 1.0, 0.0, Sampling::Bilinear), 64.0);
    assert_eq!(sample(&img, 0.0, 1.0, Sampling::Bilinear), 128.0);
    assert_eq!(sample(&img, 1.0, 1.0, Sampling::Bilinear), 192.0);
}

#[test]
fn test_nearest_exact_at_pixel_centers() {
    let img = fixture_2x2();
    assert_eq!(sample(&img, 0.0, 0.0, Sampling::Nearest), 0.0);
    assert_eq!(sample(&img, 1.0, 0.0, Sampling::Nearest), 64.0);
    assert_eq!(sample(&img, 0.0, 1.0, Sampling::Nearest), 128.0);
    assert_eq!(sample(&img, 1.0, 1.0, Sampling::Nearest), 192.0);
}

#[test]
fn test_bilinear_midway_between_rows() {
    let img = fixture_2x2();
    // Midway down column 0: midpoint of 0 and 128.
    let v = sample(&img, 0.0, 0.5, Sampling::Bilinear);
    assert!((v - 64.0).abs() < 1e-6, "v={v}");
}

#[test]
fn test_bilinear_center_of_four_pixels() {
    let img = fixture_2x2();
    // Average of all four corners.
    let v = sample(&img, 0.5, 0.5, Sampling::Bilinear);
    assert!((v - 96.0).abs() < 1e-6, "v={v}");
}

#[test]
fn test_nearest_floors_to_containing_pixel() {
    let img = fixture_2x2();
    assert_eq!(sample(&img, 0.7, 0.0, Sampling::Nearest), 0.0);
    assert_eq!(sample(&img, 0.0, 0.9, Sampling::Nearest), 128.0);
}

// ---------------------------------------------------------------------------
// Reflect-101 border
// ---------------------------------------------------------------------------

#[test]
fn test_sampling_past_the_edge_mirrors() {
    // Single row [0, 10, 20].
    let img = Array2::from_shape_vec((1, 3), vec![0.0, 10.0, 20.0]).unwrap();
    // x = -1 mirrors onto x = 1; the edge pixel is not repeated.
    assert_eq!(sample(&img, -1.0, 0.0, Sampling::Nearest), 10.0);
    assert_eq!(sample(&img, 3.0, 0.0, Sampling::Nearest), 10.0);
    assert_eq!(sample(&img, 4.0, 0.0, Sampling::Nearest), 0.0);
}

#[test]
fn test_bilinear_across_the_border_is_continuous() {
    let img = Array2::from_shape_vec((1, 3), vec![0.0, 10.0, 20.0]).unwrap();
    // Between x = 2 (value 20) and its mirror x = 3 (value 10).
    let v = sample(&img, 2.5, 0.0, Sampling::Bilinear);
    assert!((v - 15.0).abs() < 1e-6, "v={v}");
    // Approaching the edge from outside matches the edge value.
    let v = sample(&img, -1e-4, 0.0, Sampling::Bilinear);
    assert!((v - 0.0).abs() < 1e-2, "v={v}");
}

#[test]
fn test_reflect_101_index_mapping() {
    assert_eq!(reflect_101(-1, 5), 1);
    assert_eq!(reflect_101(5, 5), 3);
    assert_eq!(reflect_101(0, 5), 0);
    assert_eq!(reflect_101(4, 5), 4);
}
