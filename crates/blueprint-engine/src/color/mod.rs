//! Color types and conversion utilities
//!
//! Colors enter the engine as 8-bit sRGB and are compared in CIE L*a*b*.
//! Every hop of the chain is its own type so a value in one space cannot be
//! handed to code expecting another:
//!
//! ```text
//! Srgb (u8) <-> LinearRgb <-> Xyz (D65) <-> Lab
//! ```
//!
//! # Example
//!
//! ```
//! use blueprint_engine::{Lab, Srgb};
//!
//! let red = Srgb::new(227, 29, 66);
//! let lab = Lab::from(red);
//! assert_eq!(lab.to_srgb(), red);
//! ```

mod lab;
mod linear_rgb;
mod srgb;
mod xyz;

pub use lab::Lab;
pub use linear_rgb::{linear_to_srgb, srgb_to_linear, LinearRgb};
pub use srgb::{ParseColorError, Srgb};
pub use xyz::Xyz;
