pub mod autopilot;
pub mod controller;
pub mod pid;
pub mod stick;

pub use autopilot::DescentAutopilot;
pub use controller::{Controller, HoverHold};
pub use pid::Pid;
pub use stick::StickInput;
