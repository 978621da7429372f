use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::raster::Raster;
use crate::warp::Motion;

use super::{Aligner, ForwardAdditive, ForwardCompositional, InverseCompositional};

/// Which alignment algorithm to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlignMethod {
    ForwardAdditive,
    ForwardCompositional,
    #[default]
    InverseCompositional,
}

impl fmt::Display for AlignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignMethod::ForwardAdditive => write!(f, "Forward Additive"),
            AlignMethod::ForwardCompositional => write!(f, "Forward Compositional"),
            AlignMethod::InverseCompositional => write!(f, "Inverse Compositional"),
        }
    }
}

/// Configuration for a complete coarse-to-fine alignment run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignConfig {
    #[serde(default)]
    pub method: AlignMethod,
    /// Desired pyramid depth; clamped to what the image sizes admit.
    pub levels: usize,
    /// Iteration budget per pyramid level.
    pub max_iterations: usize,
    /// Stop a level early once the increment norm falls below this.
    pub eps: f32,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            method: AlignMethod::default(),
            levels: 3,
            max_iterations: 50,
            eps: 1e-3,
        }
    }
}

/// Outcome of [`align_configured`].
#[derive(Clone, Copy, Debug)]
pub struct AlignReport {
    /// Mean squared error of the last iteration at the finest level.
    pub error: f32,
    /// Total iterations across all levels.
    pub iterations: usize,
}

/// Prepare the configured engine and drive it coarsest to finest,
/// refining `warp` in place.
pub fn align_configured(
    template: &Raster,
    target: &Raster,
    warp: &mut Motion,
    config: &AlignConfig,
) -> Result<AlignReport> {
    match config.method {
        AlignMethod::ForwardAdditive => {
            let mut engine = ForwardAdditive::prepare(template, target, warp, config.levels)?;
            Ok(run(&mut engine, warp, config))
        }
        AlignMethod::ForwardCompositional => {
            let mut engine = ForwardCompositional::prepare(template, target, warp, config.levels)?;
            Ok(run(&mut engine, warp, config))
        }
        AlignMethod::InverseCompositional => {
            let mut engine = InverseCompositional::prepare(template, target, warp, config.levels)?;
            Ok(run(&mut engine, warp, config))
        }
    }
}

fn run<A: Aligner>(engine: &mut A, warp: &mut Motion, config: &AlignConfig) -> AlignReport {
    let budgets = vec![config.max_iterations; engine.num_levels()];
    engine.align_levels(warp, &budgets, config.eps);

    info!(
        method = %config.method,
        levels = engine.num_levels(),
        iterations = engine.iteration(),
        error = engine.last_error(),
        "alignment finished"
    );

    AlignReport {
        error: engine.last_error(),
        iterations: engine.iteration(),
    }
}
