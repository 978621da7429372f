use tracing::debug;

use crate::error::Result;
use crate::gradient::gradient;
use crate::raster::Raster;
use crate::sample::Sampling;
use crate::warp::{warp_image_scaled, Hessian, Jacobian, Motion, ParamVec};

use super::context::AlignContext;
use super::Aligner;

/// Forward-compositional alignment.
///
/// The increment is solved for a small warp composed onto the current one
/// (W <- W * W_delta), so the Jacobian is always evaluated at the identity
/// and can be tabulated per level at preparation time. Each iteration first
/// warps the whole target level back onto the template grid; gradients are
/// then plain nearest-neighbor reads on the warped raster.
pub struct ForwardCompositional {
    ctx: AlignContext,
    /// Per level: identity Jacobian for every template pixel, evaluated at
    /// finest-level coordinates, row-major.
    jacobians: Vec<Vec<Jacobian>>,
}

impl ForwardCompositional {
    /// Build pyramids and tabulate the identity Jacobians for every level.
    /// `initial` supplies the motion variant; its parameter values are not
    /// read.
    pub fn prepare(
        template: &Raster,
        target: &Raster,
        initial: &Motion,
        levels: usize,
    ) -> Result<Self> {
        let ctx = AlignContext::prepare(template, target, initial, levels)?;
        let w_id = Motion::identity(ctx.kind());

        let mut jacobians = Vec::with_capacity(ctx.num_levels());
        for k in 0..ctx.num_levels() {
            let tpl = ctx.tpl_at(k);
            let s_up = ctx.scale_up_at(k);
            let (h, wd) = tpl.dim();

            let mut table = Vec::with_capacity(h * wd);
            for y in 0..h {
                for x in 0..wd {
                    table.push(w_id.jacobian_at(x as f32 * s_up, y as f32 * s_up));
                }
            }
            jacobians.push(table);
        }

        debug!(
            levels = ctx.num_levels(),
            kind = ?ctx.kind(),
            "forward-compositional engine prepared"
        );
        Ok(Self { ctx, jacobians })
    }
}

impl Aligner for ForwardCompositional {
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
            let (h, wd) = tpl.dim();

            // Evaluating the gradient costs four sub-pixel lookups per
            // pixel, so warping the entire target level once is cheaper.
            let warped = warp_image_scaled(
                tgt,
                (h, wd),
                w,
                Sampling::Bilinear,
                self.ctx.scale_up(),
                self.ctx.scale_down(),
            );

            let jacobians = &self.jacobians[self.ctx.level()];
            let mut hessian = Hessian::zeros(n);
            let mut b = ParamVec::zeros(n);
            let mut sum_errors = 0.0f64;

            let mut idx = 0;
            for y in 0..h {
                for x in 0..wd {
                    let err = tpl[[y, x]] - warped[[y, x]];
                    sum_errors += (err * err) as f64;

                    // The warp already did the sub-pixel work.
                    let g = gradient(&warped, x as f32, y as f32, Sampling::Nearest);
                    let sd = jacobians[idx].steepest_descent(g[0], g[1]);

                    b.add_scaled(&sd, err);
                    hessian.rank_one_update(&sd);
                    idx += 1;
                }
            }

            let error = (sum_errors / (h * wd) as f64) as f32;
            (error, hessian.solve(&b))
        };

        self.ctx.bump_iteration();
        match delta {
            Some(delta) => {
                w.update_forward_compositional(&delta);
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
