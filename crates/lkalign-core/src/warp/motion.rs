//! Parametric 2D motion models.
//!
//! Every variant is backed by a 3x3 homogeneous matrix with last row
//! [0, 0, 1]; the parameter vector is derived from and written into the
//! matrix. Three update rules cover the three alignment linearizations:
//! additive (p += delta), forward-compositional (W <- W * W_delta) and
//! inverse-compositional (W <- W * W_delta^-1).

use serde::{Deserialize, Serialize};

use super::params::{Jacobian, ParamVec};

/// The supported motion variants and their parametrizations.
///
/// | Kind        | N | Parameters                                           |
/// |-------------|---|------------------------------------------------------|
/// | Translation | 2 | (tx, ty)                                             |
/// | Euclidean   | 3 | (tx, ty, theta): rotate by theta, then translate     |
/// | Similarity  | 4 | (tx, ty, a, b) with a = s*cos(theta) - 1, b = s*sin(theta) |
///
/// The similarity variant additionally exposes the human-friendly canonical
/// form (tx, ty, theta, s); the native (a, b) form keeps the Jacobian linear
/// in the parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Translation,
    Euclidean,
    Similarity,
}

impl MotionKind {
    /// Number of warp parameters for this variant.
    pub fn num_params(self) -> usize {
        match self {
            MotionKind::Translation => 2,
            MotionKind::Euclidean => 3,
            MotionKind::Similarity => 4,
        }
    }
}

/// A planar motion value: variant tag plus homogeneous 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    kind: MotionKind,
    m: [[f32; 3]; 3],
}

impl Motion {
    /// The identity element of the variant: maps every point to itself.
    pub fn identity(kind: MotionKind) -> Self {
        Self {
            kind,
            m: IDENTITY,
        }
    }

    /// Build a motion of `kind` from a parameter vector.
    pub fn from_params(kind: MotionKind, params: &ParamVec) -> Self {
        let mut w = Self::identity(kind);
        w.set_params(params);
        w
    }

    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    pub fn num_params(&self) -> usize {
        self.kind.num_params()
    }

    /// The homogeneous matrix (last row always [0, 0, 1]).
    pub fn matrix(&self) -> [[f32; 3]; 3] {
        self.m
    }

    /// Current parameters in the variant's native form.
    pub fn params(&self) -> ParamVec {
        match self.kind {
            MotionKind::Translation => ParamVec::from_slice(&[self.m[0][2], self.m[1][2]]),
            MotionKind::Euclidean => {
                let theta = self.m[1][0].atan2(self.m[0][0]);
                ParamVec::from_slice(&[self.m[0][2], self.m[1][2], theta])
            }
            MotionKind::Similarity => ParamVec::from_slice(&[
                self.m[0][2],
                self.m[1][2],
                self.m[0][0] - 1.0,
                self.m[1][0],
            ]),
        }
    }

    /// Set parameters in the variant's native form.
    ///
    /// # Panics
    /// Panics if the vector length does not match the variant.
    pub fn set_params(&mut self, params: &ParamVec) {
        assert_eq!(
            params.len(),
            self.kind.num_params(),
            "parameter count mismatch for {:?}",
            self.kind
        );
        self.m = IDENTITY;
        match self.kind {
            MotionKind::Translation => {
                self.m[0][2] = params[0];
                self.m[1][2] = params[1];
            }
            MotionKind::Euclidean => {
                let (sin, cos) = params[2].sin_cos();
                self.m[0][0] = cos;
                self.m[0][1] = -sin;
                self.m[1][0] = sin;
                self.m[1][1] = cos;
                self.m[0][2] = params[0];
                self.m[1][2] = params[1];
            }
            MotionKind::Similarity => {
                let a = params[2];
                let b = params[3];
                self.m[0][0] = 1.0 + a;
                self.m[0][1] = -b;
                self.m[1][0] = b;
                self.m[1][1] = 1.0 + a;
                self.m[0][2] = params[0];
                self.m[1][2] = params[1];
            }
        }
    }

    /// Similarity parameters in canonical (tx, ty, theta, s) form.
    ///
    /// # Panics
    /// Panics on non-similarity variants.
    pub fn canonical_params(&self) -> ParamVec {
        assert_eq!(
            self.kind,
            MotionKind::Similarity,
            "canonical form is defined for the similarity variant only"
        );
        let sc = self.m[0][0]; // s*cos(theta)
        let ss = self.m[1][0]; // s*sin(theta)
        ParamVec::from_slice(&[
            self.m[0][2],
            self.m[1][2],
            ss.atan2(sc),
            (sc * sc + ss * ss).sqrt(),
        ])
    }

    /// Set similarity parameters from canonical (tx, ty, theta, s) form.
    ///
    /// # Panics
    /// Panics on non-similarity variants.
    pub fn set_canonical_params(&mut self, canonical: &ParamVec) {
        assert_eq!(
            self.kind,
            MotionKind::Similarity,
            "canonical form is defined for the similarity variant only"
        );
        assert_eq!(canonical.len(), 4, "canonical similarity takes 4 parameters");
        let (sin, cos) = canonical[2].sin_cos();
        let s = canonical[3];
        let native = ParamVec::from_slice(&[
            canonical[0],
            canonical[1],
            s * cos - 1.0,
            s * sin,
        ]);
        self.set_params(&native);
    }

    /// Warp a point: x' = W(x; p).
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.m[0][2],
            self.m[1][0] * x + self.m[1][1] * y + self.m[1][2],
        )
    }

    /// The 2xN Jacobian dW/dp at a point, evaluated at the current
    /// parameters.
    ///
    /// Translation: constant [[1 0], [0 1]]. Euclidean adds a theta column
    /// that rotates with the current angle. Similarity's (a, b) columns are
    /// linear in the point and independent of the current parameters.
    pub fn jacobian_at(&self, x: f32, y: f32) -> Jacobian {
        let n = self.kind.num_params();
        let mut j = Jacobian::zeros(n);
        j.set(0, 0, 1.0);
        j.set(1, 1, 1.0);
        match self.kind {
            MotionKind::Translation => {}
            MotionKind::Euclidean => {
                let cos = self.m[0][0];
                let sin = self.m[1][0];
                j.set(0, 2, -sin * x - cos * y);
                j.set(1, 2, cos * x - sin * y);
            }
            MotionKind::Similarity => {
                j.set(0, 2, x);
                j.set(0, 3, -y);
                j.set(1, 2, y);
                j.set(1, 3, x);
            }
        }
        j
    }

    /// Forward-additive update: p <- p + delta.
    pub fn update_forward_additive(&mut self, delta: &ParamVec) {
        let p = self.params() + *delta;
        self.set_params(&p);
    }

    /// Forward-compositional update: W <- W * W_delta.
    pub fn update_forward_compositional(&mut self, delta: &ParamVec) {
        let w_delta = Motion::from_params(self.kind, delta);
        self.m = mat_mul(&self.m, &w_delta.m);
    }

    /// Inverse-compositional update: W <- W * W_delta^-1.
    ///
    /// The inverse is the closed-form affine inverse (2x2 block inverse plus
    /// the negated back-rotated translation), not a general 3x3 inverse. A
    /// degenerate delta (2x2 determinant near zero) leaves W unchanged.
    pub fn update_inverse_compositional(&mut self, delta: &ParamVec) {
        let w_delta = Motion::from_params(self.kind, delta);
        if let Some(inv) = invert_affine(&w_delta.m) {
            self.m = mat_mul(&self.m, &inv);
        }
    }
}

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn mat_mul(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut out = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            out[r][c] = a[r][0] * b[0][c] + a[r][1] * b[1][c] + a[r][2] * b[2][c];
        }
    }
    out
}

/// Closed-form inverse of an affine matrix with last row [0, 0, 1].
fn invert_affine(m: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;
    let a00 = m[1][1] * inv_det;
    let a01 = -m[0][1] * inv_det;
    let a10 = -m[1][0] * inv_det;
    let a11 = m[0][0] * inv_det;
    Some([
        [a00, a01, -(a00 * m[0][2] + a01 * m[1][2])],
        [a10, a11, -(a10 * m[0][2] + a11 * m[1][2])],
        [0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_affine_roundtrip() {
        let mut w = Motion::identity(MotionKind::Similarity);
        w.set_params(&ParamVec::from_slice(&[3.0, -2.0, 0.1, 0.2]));
        let inv = invert_affine(&w.m).unwrap();
        let prod = mat_mul(&w.m, &inv);
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert!(
                    (prod[r][c] - expected).abs() < 1e-5,
                    "prod[{r}][{c}] = {}",
                    prod[r][c]
                );
            }
        }
    }

    #[test]
    fn test_invert_affine_degenerate() {
        let zero_scale = [[0.0, 0.0, 1.0], [0.0, 0.0, 2.0], [0.0, 0.0, 1.0]];
        assert!(invert_affine(&zero_scale).is_none());
    }
}
