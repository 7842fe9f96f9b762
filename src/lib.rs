//! Layout composition for two-sided "VS" comparison images.
//!
//! The core is pure geometry with no pixel operations, and is `no_std` + `alloc` compatible.
//! Two images, two names, and a list of labeled value pairs go in; a
//! [`Scene`] of positioned primitives in the unit square comes out.
//!
//! # Modules
//!
//! - [`geometry`] — Unit-square regions, profiles, and layout errors
//! - [`scene`] — Scene nodes, roles, alignment, and color tags
//! - [`compose`] — The layout composer
//! - [`profile`] — Named presets and query-string profile parsing
//! - [`palette`] — Color tags to concrete colors
//! - [`prepare`] — Square-padding geometry, plus image loading with the `image` feature
//! - `settings` — Persistent JSON settings record (`settings` feature)
//! - `svg` — Scene to SVG rendering (`svg` feature)
//!
//! # Example
//!
//! ```
//! use vslayout::{CompositionInput, GeometryProfile, ImageHandle, compose};
//!
//! let input = CompositionInput::new("A", "B")
//!     .images(ImageHandle::new("left.png"), ImageHandle::new("right.png"))
//!     .row("Age", "23", "7")
//!     .row("Worth", "460k", "1");
//!
//! let scene = compose(&input, &GeometryProfile::default().with_row_count(2)).unwrap();
//! assert_eq!(scene.image_slots().count(), 2);
//! assert_eq!(scene.bands().len(), 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compose;
pub mod geometry;
pub mod palette;
pub mod prepare;
pub mod profile;
pub mod scene;

#[cfg(feature = "settings")]
pub mod settings;
#[cfg(feature = "svg")]
pub mod svg;

pub use compose::{ComparisonRow, CompositionInput, compose};
pub use geometry::{
    FontSizes, GeometryIssue, GeometryProfile, ImagePlacementMode, LayoutError, Region,
};
pub use palette::{Palette, Rgba};
pub use profile::Preset;
pub use scene::{
    ColorTag, DividerLine, DividerRole, FontWeight, HAlign, ImageHandle, LayoutNode, RenderStyle,
    RowBand, Scene, Side, TextAnchor, TextRole, VAlign,
};
