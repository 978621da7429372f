use tracing::debug;

use crate::error::Result;
use crate::gradient::gradient;
use crate::raster::Raster;
use crate::sample::{sample, Sampling};
use crate::warp::{Hessian, Motion, ParamVec};

use super::context::AlignContext;
use super::Aligner;

/// Inverse-compositional alignment, the fastest of the three variants.
///
/// The increment is solved in the template's frame, which moves the
/// gradient, the steepest-descent rows and the Hessian entirely into
/// preparation: per iteration only the error image and one small
/// matrix-vector product remain. The solved warp is inverted back into the
/// target's frame by composing W with W_delta^-1, which is also why the
/// error sign is reversed relative to the forward variants.
pub struct InverseCompositional {
    ctx: AlignContext,
    /// Per level: steepest-descent row for every template pixel, row-major.
    sdi: Vec<Vec<ParamVec>>,
    /// Per level: inverse Gauss-Newton Hessian; `None` when the template
    /// level carries no gradient to constrain the system.
    inv_hessians: Vec<Option<Hessian>>,
}

impl InverseCompositional {
    /// Build pyramids and precompute per-level steepest-descent tables and
    /// inverse Hessians from the template. `initial` supplies the motion
    /// variant; its parameter values are not read.
    pub fn prepare(
        template: &Raster,
        target: &Raster,
        initial: &Motion,
        levels: usize,
    ) -> Result<Self> {
        let ctx = AlignContext::prepare(template, target, initial, levels)?;
        let n = ctx.kind().num_params();
        let w_id = Motion::identity(ctx.kind());

        let mut sdi = Vec::with_capacity(ctx.num_levels());
        let mut inv_hessians = Vec::with_capacity(ctx.num_levels());

        for k in 0..ctx.num_levels() {
            let tpl = ctx.tpl_at(k);
            let s_up = ctx.scale_up_at(k);
            let (h, wd) = tpl.dim();

            let mut table = Vec::with_capacity(h * wd);
            let mut hessian = Hessian::zeros(n);

            for y in 0..h {
                for x in 0..wd {
                    let g = gradient(tpl, x as f32, y as f32, Sampling::Nearest);
                    // Jacobians are evaluated at finest-level coordinates.
                    let j = w_id.jacobian_at(x as f32 * s_up, y as f32 * s_up);
                    let sd = j.steepest_descent(g[0], g[1]);

                    hessian.rank_one_update(&sd);
                    table.push(sd);
                }
            }

            sdi.push(table);
            inv_hessians.push(hessian.inverse());
        }

        debug!(
            levels = ctx.num_levels(),
            kind = ?ctx.kind(),
            "inverse-compositional engine prepared"
        );
        Ok(Self {
            ctx,
            sdi,
            inv_hessians,
        })
    }
}

impl Aligner for InverseCompositional {
    fn align(&mut self, w: &mut Motion) {
        assert_eq!(
            w.kind(),
            self.ctx.kind(),
            "motion variant does not match the prepared engine"
        );

        let n = self.ctx.kind().num_params();
        let (error, valid, b) = {
            let tpl = self.ctx.tpl();
            let tgt = self.ctx.tgt();
            let s_up = self.ctx.scale_up();
            let s_down = self.ctx.scale_down();
            let (h, wd) = tpl.dim();
            let (tgt_h, tgt_w) = tgt.dim();
            let sdi = &self.sdi[self.ctx.level()];

            let mut b = ParamVec::zeros(n);
            let mut sum_errors = 0.0f64;
            let mut valid = 0usize;

            let mut idx = 0;
            for y in 0..h {
                for x in 0..wd {
                    let (wx, wy) = w.apply(x as f32 * s_up, y as f32 * s_up);
                    let qx = wx * s_down;
                    let qy = wy * s_down;

                    // Samples landing outside the target by more than one
                    // pixel would read mirrored content; drop them instead.
                    if qx < -1.0 || qx > tgt_w as f32 || qy < -1.0 || qy > tgt_h as f32 {
                        idx += 1;
                        continue;
                    }
                    valid += 1;

                    // Roles reverse compared to the forward variants.
                    let err = sample(tgt, qx, qy, Sampling::Bilinear) - tpl[[y, x]];
                    sum_errors += (err * err) as f64;

                    b.add_scaled(&sdi[idx], err);
                    idx += 1;
                }
            }

            let error = if valid > 0 {
                (sum_errors / valid as f64) as f32
            } else {
                f32::INFINITY
            };
            (error, valid, b)
        };

        self.ctx.bump_iteration();
        if valid == 0 {
            self.ctx.record(f32::INFINITY, ParamVec::zeros(n));
            return;
        }
        match &self.inv_hessians[self.ctx.level()] {
            Some(inv) => {
                let delta = inv.mul_vec(&b);
                w.update_inverse_compositional(&delta);
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
