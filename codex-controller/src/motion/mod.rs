//! Motion over a relative-jog stage
//!
//! - `driver`: absolute requests, homing, settle waits
//! - `descent`: stepwise lowering until the contact sensor closes

pub mod descent;
pub mod driver;

pub use descent::{ContactDescent, DescentReport};
pub use driver::MotionDriver;
