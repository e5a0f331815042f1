//! Feature detection.
//!
//! # Available Detectors
//!
//! - **Harris**: corner detection from the smoothed structure tensor, with
//!   non-maximum and spacing suppression.

mod harris;
pub use harris::*;
