//! # Leiden display transform
//!
//! Converts parsed transcription markup into a display tree that follows
//! the Leiden conventions for editorial signs, and converts display trees
//! back into markup.
//!
//! ```text
//!   markup text ──parse──▶ Fragment ──to_display──▶ [DisplayNode]
//!        ▲                                              │
//!        └──────────────────from_display────────────────┘
//! ```
//!
//! Decorative glyphs (`[`, `⟦`, `(`, dots for gaps, ...) live in each
//! wrapper's [`Decoration`], never among its children. The backward
//! transform therefore rebuilds markup from the original element name,
//! attributes and children without having to strip anything.
//!
//! A document that fails to parse renders as a single
//! [`DisplayNode::Error`] so the display area can show an inline
//! diagnostic while the source text stays untouched.

pub mod display;
pub mod error;
pub mod from_display;
pub mod html;
pub mod to_display;

pub use display::{Decoration, DisplayNode, Wrapper, ATTR_PREFIX, TAG_ATTR};
pub use error::{DisplayError, DisplayResult};
pub use from_display::from_display;
pub use html::render_html;
pub use to_display::{render, to_display, try_render, MAX_GAP_QUANTITY};

/// Text a reader sees for a display tree
pub fn visible_text(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_visible_text(&mut out);
    }
    out
}
