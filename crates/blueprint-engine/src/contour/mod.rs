//! Region outline extraction
//!
//! [`trace_region`] walks the outer boundary of a region pixel by pixel;
//! [`simplify`] thins the walk down to the corners that matter.

mod simplify;
mod trace;

pub use simplify::{simplify, DEFAULT_EPSILON};
pub use trace::{trace_region, Contour, Point};
