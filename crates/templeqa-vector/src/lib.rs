//! In-memory exact nearest-neighbour index over embedded document chunks.

pub mod distance;
pub mod search;

pub use search::FlatIndex;
