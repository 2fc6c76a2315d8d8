#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, and drawing primitives.

pub mod buffer;
pub mod cell;
pub mod drawing;
