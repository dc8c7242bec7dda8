//! UI rendering for filet.
//!
//! Everything that writes to the screen lives in [render]. Drawing is split
//! into full repaints and in-place updates of single lines.

pub mod render;
