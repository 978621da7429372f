pub mod motion;
pub mod params;
pub mod warp_image;

pub use motion::{Motion, MotionKind};
pub use params::{Hessian, Jacobian, ParamVec, MAX_PARAMS};
pub use warp_image::{warp_image, warp_image_scaled};
