pub mod engine;
pub mod geometry;
pub mod parameters;

pub use engine::LayoutEngine;
pub use geometry::{Point, Size};
pub use parameters::LayoutParameters;

use serde::{Deserialize, Serialize};

/// How text is fitted into its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One line; new paragraph characters do not break it.
    #[default]
    SingleLineBox,
    /// Lines wrap at word boundaries and at new paragraph characters.
    MultiLineBox,
}

/// Horizontal alignment of each line. Begin and end swap for right to
/// left paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlignment {
    #[default]
    Begin,
    Center,
    End,
}

/// Vertical alignment of the block of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}
