// Candidate view models and everything derived from raw matching results:
// normalization, embedded PDFs, match percentages, sorting, display labels.

pub mod display;
pub mod handlers;
pub mod model;
pub mod normalize;
pub mod pdf;
pub mod percentage;
pub mod sort;
