use ndarray::Array2;

use crate::error::Result;
use crate::pyramid::Pyramid;
use crate::raster::Raster;
use crate::warp::{Motion, MotionKind, ParamVec};

/// State shared by the three alignment engines: the two pyramids, the
/// currently selected level, and the per-iteration bookkeeping.
///
/// The motion value always operates in finest-level coordinates. At a coarse
/// level, template pixel coordinates are scaled up by `scale_up()` before
/// the warp is applied and the warped location is scaled back down by
/// `scale_down()` before sampling the coarse target. That keeps one set of
/// warp parameters consistent across all levels.
pub(crate) struct AlignContext {
    tpl_pyr: Pyramid,
    tgt_pyr: Pyramid,
    kind: MotionKind,
    level: usize,
    iter: usize,
    last_error: f32,
    last_inc: ParamVec,
}

impl AlignContext {
    /// Build both pyramids and select the coarsest level.
    ///
    /// `levels` is clamped to `[1, min(max_levels(template), max_levels(target))]`.
    pub(crate) fn prepare(
        template: &Raster,
        target: &Raster,
        initial: &Motion,
        levels: usize,
    ) -> Result<Self> {
        let max_levels = Pyramid::max_levels_for_size(template.width(), template.height())
            .min(Pyramid::max_levels_for_size(target.width(), target.height()))
            .max(1);
        let levels = levels.clamp(1, max_levels);

        let tpl_pyr = Pyramid::build(&template.data, levels);
        let tgt_pyr = Pyramid::build(&target.data, levels);
        let kind = initial.kind();

        Ok(Self {
            tpl_pyr,
            tgt_pyr,
            kind,
            level: levels - 1,
            iter: 0,
            last_error: f32::INFINITY,
            last_inc: ParamVec::zeros(kind.num_params()),
        })
    }

    /// Select a pyramid level (clamped). Errors from different levels are
    /// not comparable, so the last error resets to +inf and the last
    /// increment to zero.
    pub(crate) fn set_level(&mut self, level: usize) {
        self.level = level.min(self.num_levels() - 1);
        self.last_error = f32::INFINITY;
        self.last_inc = ParamVec::zeros(self.kind.num_params());
    }

    pub(crate) fn kind(&self) -> MotionKind {
        self.kind
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn num_levels(&self) -> usize {
        self.tpl_pyr.len()
    }

    /// Factor from the current level up to finest-level coordinates.
    pub(crate) fn scale_up(&self) -> f32 {
        (1u32 << (self.num_levels() - 1 - self.level)) as f32
    }

    /// Factor from finest-level coordinates down to the current level.
    pub(crate) fn scale_down(&self) -> f32 {
        1.0 / self.scale_up()
    }

    /// Template raster at the current level.
    pub(crate) fn tpl(&self) -> &Array2<f32> {
        self.tpl_pyr.level(self.level)
    }

    /// Target raster at the current level.
    pub(crate) fn tgt(&self) -> &Array2<f32> {
        self.tgt_pyr.level(self.level)
    }

    /// Template raster at level `k`.
    pub(crate) fn tpl_at(&self, k: usize) -> &Array2<f32> {
        self.tpl_pyr.level(k)
    }

    /// Scale-up factor for an arbitrary level `k`.
    pub(crate) fn scale_up_at(&self, k: usize) -> f32 {
        (1u32 << (self.num_levels() - 1 - k)) as f32
    }

    pub(crate) fn iteration(&self) -> usize {
        self.iter
    }

    pub(crate) fn last_error(&self) -> f32 {
        self.last_error
    }

    pub(crate) fn last_increment(&self) -> ParamVec {
        self.last_inc
    }

    pub(crate) fn bump_iteration(&mut self) {
        self.iter += 1;
    }

    /// Record the outcome of one iteration.
    pub(crate) fn record(&mut self, error: f32, inc: ParamVec) {
        self.last_error = error;
        self.last_inc = inc;
    }

    /// Record a zero increment while leaving the last error untouched
    /// (singular normal equations).
    pub(crate) fn record_increment_only(&mut self, inc: ParamVec) {
        self.last_inc = inc;
    }
}
