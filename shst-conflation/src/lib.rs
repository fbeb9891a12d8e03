//! Conflation of independently surveyed road maps onto SharedStreets reference linework.
//!
//! Each target map's matched segments are projected onto the reference lines they
//! were aligned with, expressed as distance intervals, de-overlapped per source and
//! finally used to partition every reference line into sub-segments that carry the
//! identifiers of every covering source.
pub mod algorithm;
pub mod app;
pub mod config;
pub mod model;
pub mod stream;
pub mod util;
