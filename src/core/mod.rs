pub mod channels;
pub mod entropy;
pub mod errors;
pub mod qber;
pub mod utils;

pub use channels::{ChannelParameters, DistanceGrid, PhotonRateCurve};
pub use entropy::{binary_entropy, binary_entropy_curve};
pub use qber::{QberCurve, qber, qber_curve, qber_over_grid};
