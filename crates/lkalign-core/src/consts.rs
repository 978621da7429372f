/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Sigma of the Gaussian low-pass applied before each pyramid decimation.
/// Yields a 5-tap separable kernel.
pub const PYRAMID_BLUR_SIGMA: f32 = 0.65;

/// Smallest dimension a pyramid level may have. Levels below this carry too
/// little texture to constrain the normal equations.
pub const MIN_PYRAMID_DIM: usize = 10;

/// Pivot threshold below which a linear system is treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-10;
