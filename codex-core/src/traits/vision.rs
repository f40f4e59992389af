//! Vision trait
//!
//! Capture and recognition are separate so a failed read can be retried
//! with a fresh frame.

use heapless::String;

use crate::config::MAX_LABEL_LEN;

/// Recognized card name
pub type Label = String<MAX_LABEL_LEN>;

/// Camera plus recognition pipeline
pub trait VisionClassifier {
    /// Captured image type
    type Frame;

    /// Grab one focused frame, or `None` if the camera failed
    fn capture(&mut self) -> Option<Self::Frame>;

    /// Recognize the card in a frame, or `None` if nothing matched
    fn classify(&mut self, frame: &Self::Frame) -> Option<Label>;
}
