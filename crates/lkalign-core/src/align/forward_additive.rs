use tracing::debug;

use crate::error::Result;
use crate::gradient::gradient;
use crate::raster::Raster;
use crate::sample::{sample, Sampling};
use crate::warp::{Hessian, Motion, ParamVec};

use super::context::AlignContext;
use super::Aligner;

/// Forward-additive alignment: the classic Lucas-Kanade algorithm.
///
/// The objective is linearized in the target's frame at the current
/// parameters, so the target gradient must be evaluated at each warped
/// location on every iteration and nothing can be precomputed. The solved
/// increment is added to the parameter vector.
pub struct ForwardAdditive {
    ctx: AlignContext,
}

impl ForwardAdditive {
    /// Build pyramids for the template and target and select the coarsest
    /// level. `initial` supplies the motion variant; its parameter values
    /// are not read.
    pub fn prepare(
        template: &Raster,
        target: &Raster,
        initial: &Motion,
        levels: usize,
    ) -> Result<Self> {
        let ctx = AlignContext::prepare(template, target, initial, levels)?;
        debug!(
            levels = ctx.num_levels(),
            kind = ?ctx.kind(),
            "forward-additive engine prepared"
        );
        Ok(Self { ctx })
    }
}

impl Aligner for ForwardAdditive {
    fn align(&mut self, w: &mut Motion) {
        assert_eq!(
            w.kind(),
            self.ctx.kind(),
            "motion variant does not match the prepared engine"
        );

        let n = self.ctx.kind().num_params();
        let (error, delta) = {
            let tpl = self.ctx.tpl();
            let tgt = self.ctx.tgt();
            let s_up = self.ctx.scale_up();
            let s_down = self.ctx.scale_down();
            let (h, wd) = tpl.dim();

            let mut hessian = Hessian::zeros(n);
            let mut b = ParamVec::zeros(n);
            let mut sum_errors = 0.0f64;

            for y in 0..h {
                for x in 0..wd {
                    // Template pixel in finest-level coordinates.
                    let px = x as f32 * s_up;
                    let py = y as f32 * s_up;

                    let (wx, wy) = w.apply(px, py);
                    let qx = wx * s_down;
                    let qy = wy * s_down;

                    let err = tpl[[y, x]] - sample(tgt, qx, qy, Sampling::Bilinear);
                    sum_errors += (err * err) as f64;

                    let g = gradient(tgt, qx, qy, Sampling::Bilinear);
                    let sd = w.jacobian_at(px, py).steepest_descent(g[0], g[1]);

                    b.add_scaled(&sd, err);
                    hessian.rank_one_update(&sd);
                }
            }

            let error = (sum_errors / (h * wd) as f64) as f32;
            (error, hessian.solve(&b))
        };

        self.ctx.bump_iteration();
        match delta {
            Some(delta) => {
                w.update_forward_additive(&delta);
                self.ctx.record(error, delta);
            }
            None => self.ctx.record_increment_only(ParamVec::zeros(n)),
        }
    }

    fn set_level(&mut self, level: usize) {
        self.ctx.set_level(level);
    }

    fn last_error(&self) -> f32 {
        self.ctx.last_error()
    }

    fn last_increment(&self) -> ParamVec {
        self.ctx.last_increment()
    }

    fn iteration(&self) -> usize {
        self.ctx.iteration()
    }

    fn level(&self) -> usize {
        self.ctx.level()
    }

    fn num_levels(&self) -> usize {
        self.ctx.num_levels()
    }
}
