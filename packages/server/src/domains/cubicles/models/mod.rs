mod cubicle;

pub use cubicle::{Cubicle, CubicleDetail, CubicleSummary};
