//! Sub-pixel sampling of a single-channel float raster.
//!
//! Pixel centers sit at integer coordinates: sampling at (x, y) = (2.0, 3.0)
//! returns exactly `data[[3, 2]]`. Out-of-range coordinates are mapped back
//! into the raster with a reflect-101 border (mirror that does not repeat
//! the edge pixel), so both strategies are total over finite coordinates.

use ndarray::Array2;

use serde::{Deserialize, Serialize};

/// Sub-pixel sampling strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampling {
    /// Floor to the containing pixel.
    Nearest,
    /// Blend the four surrounding pixels.
    Bilinear,
}

/// Map an index onto `[0, len)` with reflect-101 mirroring.
///
/// For len = 4 the extension reads `... 2 1 | 0 1 2 3 | 2 1 ...`; the edge
/// pixel is the mirror axis and is not duplicated.
pub fn reflect_101(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = index % period;
    if i < 0 {
        i += period;
    }
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// Sample the raster at a real-valued location (x = column, y = row).
pub fn sample(data: &Array2<f32>, x: f32, y: f32, method: Sampling) -> f32 {
    match method {
        Sampling::Nearest => sample_nearest(data, x, y),
        Sampling::Bilinear => sample_bilinear(data, x, y),
    }
}

fn sample_nearest(data: &Array2<f32>, x: f32, y: f32) -> f32 {
    let (h, w) = data.dim();
    let ix = x.floor() as i64;
    let iy = y.floor() as i64;
    data[[reflect_101(iy, h), reflect_101(ix, w)]]
}

fn sample_bilinear(data: &Array2<f32>, x: f32, y: f32) -> f32 {
    let (h, w) = data.dim();

    let ix = x.floor() as i64;
    let iy = y.floor() as i64;
    let a = x - ix as f32;
    let b = y - iy as f32;

    let x0 = reflect_101(ix, w);
    let x1 = reflect_101(ix + 1, w);
    let y0 = reflect_101(iy, h);
    let y1 = reflect_101(iy + 1, h);

    let f00 = data[[y0, x0]];
    let f01 = data[[y0, x1]];
    let f10 = data[[y1, x0]];
    let f11 = data[[y1, x1]];

    (f00 * (1.0 - a) + f01 * a) * (1.0 - b) + (f10 * (1.0 - a) + f11 * a) * b
}
