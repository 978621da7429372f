use ndarray::Array2;

use lkalign_core::error::AlignError;
use lkalign_core::raster::Raster;

#[test]
fn test_from_u8_widens_to_float() {
    let raster = Raster::from_u8(3, 2, &[0, 64, 128, 192, 255, 1]).unwrap();
    assert_eq!(raster.width(), 3);
    assert_eq!(raster.height(), 2);
    assert_eq!(raster.original_bit_depth, 8);
    assert_eq!(raster.data[[0, 0]], 0.0);
    assert_eq!(raster.data[[0, 2]], 128.0);
    assert_eq!(raster.data[[1, 2]], 1.0);
}

#[test]
fn test_from_u16_widens_to_float() {
    let raster = Raster::from_u16(2, 2, &[0, 1000, 40000, 65535]).unwrap();
    assert_eq!(raster.original_bit_depth, 16);
    assert_eq!(raster.data[[1, 0]], 40000.0);
    assert_eq!(raster.data[[1, 1]], 65535.0);
}

#[test]
fn test_from_f32_takes_ownership() {
    let raster = Raster::from_f32(2, 3, vec![0.5; 6]).unwrap();
    assert_eq!(raster.width(), 2);
    assert_eq!(raster.height(), 3);
    assert_eq!(raster.original_bit_depth, 32);
    assert_eq!(raster.data[[2, 1]], 0.5);
}

#[test]
fn test_zero_dimension_is_rejected() {
    let err = Raster::from_u8(0, 4, &[]).unwrap_err();
    assert!(matches!(err, AlignError::InvalidDimensions { width: 0, height: 4 }));

    let err = Raster::from_array(Array2::<f32>::zeros((0, 5))).unwrap_err();
    assert!(matches!(err, AlignError::InvalidDimensions { .. }));
}

#[test]
fn test_buffer_length_mismatch_is_rejected() {
    let err = Raster::from_u8(4, 4, &[0; 15]).unwrap_err();
    match err {
        AlignError::BufferSizeMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, 16);
            assert_eq!(actual, 15);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
