//! Bidirectional (BiDi) text support built on `unicode-bidi`.
//!
//! - Per-paragraph UAX-9 analysis kept in an index-addressed arena
//! - Line reordering into visual to logical maps (rule L1 applied per line)
//! - Mirroring of paired characters in right to left runs
//! - Per-character direction flags used by the layout engine

pub mod mirror;
pub mod paragraphs;
pub mod support;

pub use mirror::{mirrored_bracket, mirrored_char};
pub use paragraphs::{
    get_characters_direction, get_mirrored_text, reorder_lines, set_bidirectional_info,
};
pub use support::BidirectionalSupport;
