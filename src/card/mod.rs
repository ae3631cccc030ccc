//! The card pipeline: cycle extraction, loop splitting, segment fitting and
//! the diagnosis rules.
//!
//! Everything here is pure and synchronous; file handling and reporting live
//! in `io`, `report` and `plot`.

pub mod classify;
pub mod cycle;
pub mod segment;
pub mod select;
pub mod split;

pub use classify::DynaCard;
pub use cycle::{extract_cycle, extract_cycle_by_displacement};
pub use segment::{BoundarySegment, SegmentBuilder};
pub use select::{CardGeometry, Diagnosis, diagnose, peak_load, select_shape};
pub use split::{Corners, SplitLoop, split_loop};
