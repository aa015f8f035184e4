//! Thread color matching
//!
//! A [`ThreadCatalog`] holds the physical thread colors a blueprint can be
//! stitched with, with their LAB values computed once up front. Matching is
//! a linear scan by CIE76 delta E, which is plenty for catalogs of a few
//! hundred entries.

mod catalog;
mod matcher;

pub use catalog::{DmcThread, ThreadCatalog};
pub use matcher::{match_thread, ColorQuery, ThreadCandidate, ThreadMatch, MAX_ALTERNATIVES};
