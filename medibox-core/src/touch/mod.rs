//! Touch input: calibration, hit regions, and per-screen routing

pub mod calibration;
pub mod layout;
pub mod router;

pub use calibration::Point;
pub use layout::Rect;
pub use router::{route, RouteContext, TouchAction};
