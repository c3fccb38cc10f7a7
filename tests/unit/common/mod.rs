//! Unit tests for hit records and directional indexes

pub mod hits;
pub mod index;
