#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// utilities to draw on pixel arrays.
pub mod draw;

/// feature detection module.
pub mod features;

/// mathematical morphology module.
pub mod morphology;

/// module containing parallelization utilities.
pub mod parallel;
