//! Logical (per-character) and visual (per-glyph) models of a text.

pub mod logical;
pub mod visual;

pub use logical::LogicalModel;
pub use visual::VisualModel;
