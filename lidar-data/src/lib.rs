pub mod distance;

pub use distance::{distance_to_point, point_to_distance};
pub use distance::{NO_RETURN_MAX, SPOT_POSITION_BITS, SPOT_POSITION_MASK};
