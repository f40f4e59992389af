//! Collaborator traits
//!
//! These traits define the interface between the sorting logic and the
//! motion controller, GPIO lines and camera it drives.

pub mod sensor;
pub mod stage;
pub mod suction;
pub mod vision;

pub use sensor::ContactSensor;
pub use stage::{StageClient, StageError};
pub use suction::SuctionActuator;
pub use vision::{Label, VisionClassifier};
