pub mod controller;
pub mod params;
pub mod tack;
pub mod guidance;
pub mod rudder;
pub mod sail;
pub mod line_follow;

pub use controller::Controller;
pub use params::ControllerParams;
pub use tack::Tack;
pub use guidance::{in_no_go_zone, nominal_heading, target_heading, HeadingTarget};
pub use rudder::rudder_angle;
pub use sail::max_sail_angle;
pub use line_follow::{control, ControlOutput, LineFollowController};
