//! Unit-square geometry, layout profiles, and layout errors.
//!
//! All coordinates are fractions of the output: `(0.0, 0.0)` is the
//! bottom-left corner, `(1.0, 1.0)` the top-right. `y` grows upward, so a
//! [`Region`]'s `y` is its bottom edge.
//!
//! # Example
//!
//! ```
//! use vslayout::{GeometryProfile, ImagePlacementMode};
//!
//! let profile = GeometryProfile::default()
//!     .with_row_count(4)
//!     .with_placement(ImagePlacementMode::EdgeToEdge { gap: 0.04 });
//! assert!(profile.validate().is_ok());
//! ```

use crate::scene::RenderStyle;

/// Axis-aligned rectangle in unit-square coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Region {
    /// The whole output.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a region from its bottom-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square region with its bottom-left corner at `(x, y)`.
    pub const fn square(x: f64, y: f64, side: f64) -> Self {
        Self::new(x, y, side, side)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Shrink by `amount` on every side.
    ///
    /// The result may have a negative size; callers validate it.
    pub fn inset(self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - 2.0 * amount,
            height: self.height - 2.0 * amount,
        }
    }

    /// The slice of this region of the given height that shares its top edge.
    pub fn top_slice(self, height: f64) -> Self {
        Self {
            x: self.x,
            y: self.top() - height,
            width: self.width,
            height,
        }
    }

    /// True when both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// How the two image slots are positioned across the content width.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ImagePlacementMode {
    /// Slot centers at 25 % and 75 % of the content width.
    #[default]
    Quartiles,
    /// Left slot flush with the left content edge, right slot flush with the
    /// right edge. The two slots plus `gap` must fit the content width.
    EdgeToEdge {
        /// Minimum horizontal space between the slots.
        gap: f64,
    },
}

/// Font sizes in points at the 504 pt reference output height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontSizes {
    /// Contender names under the images.
    pub name: f32,
    /// The "VS." marker.
    pub vs_marker: f32,
    /// Row labels in the middle column.
    pub row_label: f32,
    /// Row values in the outer columns.
    pub row_value: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            name: 18.0,
            vs_marker: 28.0,
            row_label: 16.0,
            row_value: 16.0,
        }
    }
}

/// Every constant that shapes a composed scene.
///
/// Presets are available as [`GeometryProfile::centered`] (the default),
/// [`classic`](Self::classic), [`wide`](Self::wide), and
/// [`table`](Self::table). Offsets are in unit-square fractions.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryProfile {
    /// Border between the output edge and the framed box.
    pub outer_margin: f64,
    /// Corner rounding of the framed box.
    pub corner_radius: f64,
    /// Inset from the framed box to the content rectangle.
    pub content_padding: f64,
    /// Fraction of the content height reserved for the image row.
    pub image_area_fraction: f64,
    /// Horizontal image slot policy.
    pub placement: ImagePlacementMode,
    /// Slot side limit as a fraction of the content width.
    pub slot_width_factor: f64,
    /// Slot side limit as a fraction of the image area height.
    pub slot_height_factor: f64,
    /// Space between the content top and the image slots.
    pub image_top_gap: f64,
    /// Space between the image slots and the name baseline.
    pub name_gap: f64,
    /// Space between the name baseline and the header divider.
    pub divider_gap: f64,
    /// Horizontal inset of every divider from the content edges.
    pub divider_inset: f64,
    /// Number of comparison rows the layout is built for.
    pub row_count: usize,
    /// Font sizes for each text role.
    pub font_sizes: FontSizes,
    /// Header divider thickness in points.
    pub header_thickness: f32,
    /// Row divider thickness in points.
    pub row_divider_thickness: f32,
    /// Rendering hint passed through to the scene.
    pub render_style: RenderStyle,
}

impl Default for GeometryProfile {
    fn default() -> Self {
        Self::centered()
    }
}

impl GeometryProfile {
    /// Centered images at the content quartiles with a roomy margin.
    pub fn centered() -> Self {
        Self {
            outer_margin: 0.08,
            corner_radius: 0.015,
            content_padding: 0.04,
            image_area_fraction: 0.3,
            placement: ImagePlacementMode::Quartiles,
            slot_width_factor: 0.35,
            slot_height_factor: 0.8,
            image_top_gap: 0.02,
            name_gap: 0.03,
            divider_gap: 0.05,
            divider_inset: 0.02,
            row_count: 3,
            font_sizes: FontSizes::default(),
            header_thickness: 2.0,
            row_divider_thickness: 1.0,
            render_style: RenderStyle::Freeform,
        }
    }

    /// Tighter margin and a taller image row.
    pub fn classic() -> Self {
        Self {
            outer_margin: 0.05,
            image_area_fraction: 0.35,
            ..Self::centered()
        }
    }

    /// Images pushed to the content edges.
    pub fn wide() -> Self {
        Self {
            outer_margin: 0.05,
            content_padding: 0.03,
            placement: ImagePlacementMode::EdgeToEdge { gap: 0.04 },
            slot_width_factor: 0.45,
            font_sizes: FontSizes {
                name: 20.0,
                vs_marker: 32.0,
                ..FontSizes::default()
            },
            ..Self::centered()
        }
    }

    /// Quartile images with rows drawn as table cells.
    pub fn table() -> Self {
        Self {
            outer_margin: 0.06,
            image_area_fraction: 0.32,
            font_sizes: FontSizes {
                row_label: 15.0,
                row_value: 15.0,
                ..FontSizes::default()
            },
            render_style: RenderStyle::Table,
            ..Self::centered()
        }
    }

    /// Set the number of comparison rows.
    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.row_count = rows;
        self
    }

    /// Set the outer margin.
    pub fn with_outer_margin(mut self, margin: f64) -> Self {
        self.outer_margin = margin;
        self
    }

    /// Set the content padding.
    pub fn with_content_padding(mut self, padding: f64) -> Self {
        self.content_padding = padding;
        self
    }

    /// Set the image area fraction.
    pub fn with_image_area_fraction(mut self, fraction: f64) -> Self {
        self.image_area_fraction = fraction;
        self
    }

    /// Set the image placement policy.
    pub fn with_placement(mut self, placement: ImagePlacementMode) -> Self {
        self.placement = placement;
        self
    }

    /// Set the slot size factors `(k_w, k_h)`.
    pub fn with_slot_factors(mut self, width: f64, height: f64) -> Self {
        self.slot_width_factor = width;
        self.slot_height_factor = height;
        self
    }

    /// Set the font sizes.
    pub fn with_font_sizes(mut self, sizes: FontSizes) -> Self {
        self.font_sizes = sizes;
        self
    }

    /// Set the rendering hint.
    pub fn with_render_style(mut self, style: RenderStyle) -> Self {
        self.render_style = style;
        self
    }

    /// Check every scalar against its allowed range.
    ///
    /// Derived geometry (slot overflow, collapsed rows) is checked by
    /// [`compose`](crate::compose()), which needs the computed regions.
    pub fn validate(&self) -> Result<(), GeometryIssue> {
        check_range("outer_margin", self.outer_margin, 0.0, 0.45)?;
        check_range("corner_radius", self.corner_radius, 0.0, 0.1)?;
        check_range("content_padding", self.content_padding, 0.0, 0.45)?;
        check_range("image_area_fraction", self.image_area_fraction, 0.05, 0.95)?;
        check_range("slot_width_factor", self.slot_width_factor, 0.05, 1.0)?;
        check_range("slot_height_factor", self.slot_height_factor, 0.05, 1.0)?;
        check_range("image_top_gap", self.image_top_gap, 0.0, 0.5)?;
        check_range("name_gap", self.name_gap, 0.0, 0.5)?;
        check_range("divider_gap", self.divider_gap, 0.0, 0.5)?;
        check_range("divider_inset", self.divider_inset, 0.0, 0.5)?;
        if let ImagePlacementMode::EdgeToEdge { gap } = self.placement {
            check_range("placement.gap", gap, 0.0, 0.9)?;
        }

        let fonts = &self.font_sizes;
        check_range("font_sizes.name", fonts.name.into(), 1.0, 400.0)?;
        check_range("font_sizes.vs_marker", fonts.vs_marker.into(), 1.0, 400.0)?;
        check_range("font_sizes.row_label", fonts.row_label.into(), 1.0, 400.0)?;
        check_range("font_sizes.row_value", fonts.row_value.into(), 1.0, 400.0)?;
        check_range("header_thickness", self.header_thickness.into(), 0.0, 20.0)?;
        check_range(
            "row_divider_thickness",
            self.row_divider_thickness.into(),
            0.0,
            20.0,
        )?;

        if self.row_count == 0 {
            return Err(GeometryIssue::NoRows);
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), GeometryIssue> {
    if !value.is_finite() {
        return Err(GeometryIssue::NotFinite { field });
    }
    if value < min || value > max {
        return Err(GeometryIssue::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Layout computation error.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The profile's row count disagrees with the number of input rows.
    #[error("profile is configured for {expected} rows but the input has {actual}")]
    ConfigurationMismatch {
        /// `GeometryProfile::row_count`.
        expected: usize,
        /// Number of rows in the input.
        actual: usize,
    },
    /// The profile produces an inconsistent or negative-size layout.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryIssue),
}

/// Why a profile was rejected.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeometryIssue {
    /// A value is NaN or infinite.
    #[error("`{field}` is not a finite number")]
    NotFinite {
        /// Profile field name.
        field: &'static str,
    },
    /// A value is outside its allowed range.
    #[error("`{field}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Profile field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
        /// Smallest allowed value.
        min: f64,
        /// Largest allowed value.
        max: f64,
    },
    /// `row_count` is zero.
    #[error("row count must be at least 1")]
    NoRows,
    /// A computed region collapsed to zero or negative size.
    #[error("{what} has non-positive size {size}")]
    NonPositive {
        /// Which region collapsed.
        what: &'static str,
        /// The offending width or height.
        size: f64,
    },
    /// The image slots need more width than the content provides.
    #[error("image slots need width {needed} but only {available} is available")]
    SlotOverflowsWidth {
        /// Width the slots require.
        needed: f64,
        /// Content width.
        available: f64,
    },
    /// An image slot does not fit the image area height.
    #[error("image slot needs height {needed} but the image area is {available}")]
    SlotOverflowsHeight {
        /// Gap plus slot side.
        needed: f64,
        /// Image area height.
        available: f64,
    },
    /// The header divider sits at or below the content bottom.
    #[error("header divider at y={divider_y} leaves no room for rows above y={bottom}")]
    RowsCollapsed {
        /// Computed divider position.
        divider_y: f64,
        /// Content bottom edge.
        bottom: f64,
    },
}
