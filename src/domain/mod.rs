//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input samples (`RawSample`) and card-space geometry (`Point`, `FittedLine`)
//! - diagnosis labels (`CardShape`) and loop sides (`Side`)
//! - run configuration and exported records

pub mod types;

pub use types::*;
