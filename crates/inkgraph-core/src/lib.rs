//! Core types shared by the inkgraph crates.
//!
//! # Overview
//!
//! - [`geometry`] - Pixel-space bounding boxes and points
//! - [`identifier`] - Interned node identifiers and label slugs
//! - [`region`] - Detector regions, OCR lines and consolidated regions
//! - [`graph`] - Per-diagram graphs and the canonical page graph
//! - [`knowledge`] - Typed knowledge graph and text chunk artifacts
//! - [`color`] - CSS colours for overlay rendering

pub mod color;
pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod knowledge;
pub mod region;
