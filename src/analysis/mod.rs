//! Pure decisions over a [`PageExtract`](crate::types::PageExtract): site
//! type, sufficiency and chart advice. No I/O.

pub mod chart;
pub mod classifier;
pub mod sufficiency;
