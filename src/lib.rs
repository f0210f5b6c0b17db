mod core;
pub mod analysis;
pub mod protocols;

pub use crate::core::{
    ChannelParameters, DistanceGrid, PhotonRateCurve, QberCurve, binary_entropy,
    binary_entropy_curve, errors, qber, qber_curve, qber_over_grid, utils,
};
