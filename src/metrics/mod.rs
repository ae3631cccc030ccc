//! Shape metrics computed on a classified cycle.

pub mod quad;
pub mod shape;

pub use quad::*;
pub use shape::*;
