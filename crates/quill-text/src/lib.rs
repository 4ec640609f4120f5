//! quill-text: text layout pipeline.
//!
//! - script segmentation and multi-language font validation
//! - line and word break segmentation
//! - bidirectional analysis, reordering and mirroring
//! - shaping glue over a pluggable shaper
//! - line layout with ellipsis, right to left re-layout and alignment
//! - logical/visual models and a read-only view for renderers

pub mod bidi;
pub mod controller;
pub mod font;
pub mod layout;
pub mod model;
pub mod multilanguage;
pub mod segmentation;
pub mod shaping;
pub mod types;
pub mod unicode;
pub mod view;

pub use controller::TextController;
pub use font::{FontError, FontFace, FontMetrics, FontService, SystemFontClient};
pub use layout::{
    HorizontalAlignment, Layout, LayoutEngine, LayoutParameters, Point, Size, VerticalAlignment,
};
pub use model::{LogicalModel, VisualModel};
pub use multilanguage::MultilanguageSupport;
pub use segmentation::{BreakService, LineBreakInfo, UnicodeBreakService, WordBreakInfo};
pub use shaping::{ShapedGlyph, Shaper};
pub use types::*;
pub use unicode::Script;
pub use view::View;
