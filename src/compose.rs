//! The layout composer.
//!
//! Turns a [`CompositionInput`] and a [`GeometryProfile`] into a [`Scene`].
//! Pure and deterministic: identical arguments always produce an identical
//! scene, and nothing outside the arguments is read.
//!
//! ```text
//!  ┌──────────────────────────────────────┐  ← framed box (outer_margin)
//!  │   ┌───────┐               ┌───────┐  │  ← image area (image_area_fraction)
//!  │   │ left  │               │ right │  │
//!  │   └───────┘               └───────┘  │
//!  │     Name         VS.        Name     │  ← name baseline (name_gap)
//!  │  ──────────────────────────────────  │  ← header divider (divider_gap)
//!  │     690k    INSTA followers  115     │  ← band 0
//!  │  ----------------------------------  │
//!  │   23 years        Age       7 days   │  ← band 1
//!  └──────────────────────────────────────┘
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::geometry::{GeometryIssue, GeometryProfile, ImagePlacementMode, LayoutError, Region};
use crate::scene::{
    ColorTag, DividerLine, DividerRole, FontWeight, FramedBox, HAlign, ImageHandle, ImageSlot,
    LayoutNode, RowBand, Scene, Side, TextAnchor, TextRole, VAlign,
};

/// Text of the marker between the two names.
pub const VS_MARKER: &str = "VS.";

/// One labeled pair of values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComparisonRow {
    /// Middle-column label.
    pub label: String,
    /// Value under the left contender.
    pub left_value: String,
    /// Value under the right contender.
    pub right_value: String,
}

impl ComparisonRow {
    /// Create a row.
    pub fn new(
        label: impl Into<String>,
        left_value: impl Into<String>,
        right_value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            left_value: left_value.into(),
            right_value: right_value.into(),
        }
    }
}

/// Everything the composer draws.
///
/// Values are assumed to be already loaded and defaulted upstream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositionInput {
    /// Left contender's name.
    pub left_name: String,
    /// Right contender's name.
    pub right_name: String,
    /// Left contender's prepared image.
    pub left_image: ImageHandle,
    /// Right contender's prepared image.
    pub right_image: ImageHandle,
    /// Rows, top to bottom.
    pub rows: Vec<ComparisonRow>,
}

impl CompositionInput {
    /// Start an input with two names, empty image handles, and no rows.
    pub fn new(left_name: impl Into<String>, right_name: impl Into<String>) -> Self {
        Self {
            left_name: left_name.into(),
            right_name: right_name.into(),
            ..Self::default()
        }
    }

    /// Set both image handles.
    pub fn images(mut self, left: ImageHandle, right: ImageHandle) -> Self {
        self.left_image = left;
        self.right_image = right;
        self
    }

    /// Append a row.
    pub fn row(
        mut self,
        label: impl Into<String>,
        left_value: impl Into<String>,
        right_value: impl Into<String>,
    ) -> Self {
        self.rows.push(ComparisonRow::new(label, left_value, right_value));
        self
    }

    /// Append several rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = ComparisonRow>) -> Self {
        self.rows.extend(rows);
        self
    }
}

/// Compose a scene.
///
/// # Errors
///
/// - [`LayoutError::InvalidGeometry`] when the profile is out of range or its
///   derived regions collapse or overflow.
/// - [`LayoutError::ConfigurationMismatch`] when `geometry.row_count` differs
///   from `input.rows.len()`.
pub fn compose(input: &CompositionInput, geometry: &GeometryProfile) -> Result<Scene, LayoutError> {
    let frame = Frame::compute(geometry).inspect_err(|issue| {
        tracing::debug!(%issue, "rejected geometry profile");
    })?;

    if input.rows.len() != geometry.row_count {
        tracing::debug!(
            expected = geometry.row_count,
            actual = input.rows.len(),
            "row count mismatch"
        );
        return Err(LayoutError::ConfigurationMismatch {
            expected: geometry.row_count,
            actual: input.rows.len(),
        });
    }

    let fonts = &geometry.font_sizes;
    let rows = input.rows.len();
    let bands = partition_bands(frame.divider_y, frame.content.y, rows);
    let mut nodes = Vec::with_capacity(7 + rows * 4);

    nodes.push(LayoutNode::FramedBox(FramedBox {
        region: frame.outer,
        corner_radius: geometry.corner_radius,
    }));
    nodes.push(LayoutNode::ImageSlot(ImageSlot {
        side: Side::Left,
        handle: input.left_image.clone(),
        region: frame.left_slot,
    }));
    nodes.push(LayoutNode::ImageSlot(ImageSlot {
        side: Side::Right,
        handle: input.right_image.clone(),
        region: frame.right_slot,
    }));

    let left_x = frame.left_slot.center_x();
    let right_x = frame.right_slot.center_x();
    let mid_x = frame.content.center_x();

    let header = [
        (
            TextRole::Name(Side::Left),
            input.left_name.as_str(),
            left_x,
            fonts.name,
            ColorTag::PrimaryText,
        ),
        (
            TextRole::VsMarker,
            VS_MARKER,
            mid_x,
            fonts.vs_marker,
            ColorTag::Accent,
        ),
        (
            TextRole::Name(Side::Right),
            input.right_name.as_str(),
            right_x,
            fonts.name,
            ColorTag::PrimaryText,
        ),
    ];
    for (role, content, x, font_size, color) in header {
        nodes.push(LayoutNode::Text(TextAnchor {
            role,
            content: String::from(content),
            x,
            y: frame.name_y,
            h_align: HAlign::Center,
            v_align: VAlign::Top,
            font_size,
            weight: FontWeight::Bold,
            color,
        }));
    }

    nodes.push(LayoutNode::Divider(DividerLine {
        role: DividerRole::Header,
        x1: frame.line_x1,
        x2: frame.line_x2,
        y: frame.divider_y,
        thickness: geometry.header_thickness,
        color: ColorTag::DividerStrong,
    }));

    for (i, (row, band)) in input.rows.iter().zip(&bands).enumerate() {
        let y = band.center();
        let cells = [
            (
                TextRole::RowValue(i, Side::Left),
                &row.left_value,
                left_x,
                fonts.row_value,
                FontWeight::Medium,
                ColorTag::SecondaryText,
            ),
            (
                TextRole::RowLabel(i),
                &row.label,
                mid_x,
                fonts.row_label,
                FontWeight::Bold,
                ColorTag::LabelText,
            ),
            (
                TextRole::RowValue(i, Side::Right),
                &row.right_value,
                right_x,
                fonts.row_value,
                FontWeight::Medium,
                ColorTag::SecondaryText,
            ),
        ];
        for (role, content, x, font_size, weight, color) in cells {
            nodes.push(LayoutNode::Text(TextAnchor {
                role,
                content: content.clone(),
                x,
                y,
                h_align: HAlign::Center,
                v_align: VAlign::Center,
                font_size,
                weight,
                color,
            }));
        }

        if i + 1 < rows {
            nodes.push(LayoutNode::Divider(DividerLine {
                role: DividerRole::BetweenRows(i),
                x1: frame.line_x1,
                x2: frame.line_x2,
                y: band.bottom,
                thickness: geometry.row_divider_thickness,
                color: ColorTag::DividerLight,
            }));
        }
    }

    tracing::trace!(nodes = nodes.len(), rows, "composed scene");
    Ok(Scene::new(nodes, bands, geometry.render_style))
}

/// Regions and positions derived from a profile, before any input is placed.
#[derive(Clone, Debug)]
struct Frame {
    outer: Region,
    content: Region,
    left_slot: Region,
    right_slot: Region,
    name_y: f64,
    divider_y: f64,
    line_x1: f64,
    line_x2: f64,
}

impl Frame {
    fn compute(p: &GeometryProfile) -> Result<Self, GeometryIssue> {
        p.validate()?;

        let outer = Region::UNIT.inset(p.outer_margin);
        let content = outer.inset(p.content_padding);
        require_area("content", content)?;

        let image_area = content.top_slice(content.height * p.image_area_fraction);
        let side =
            (content.width * p.slot_width_factor).min(image_area.height * p.slot_height_factor);
        if side <= 0.0 {
            return Err(GeometryIssue::NonPositive {
                what: "image slot",
                size: side,
            });
        }

        let needed_h = p.image_top_gap + side;
        if needed_h > image_area.height {
            return Err(GeometryIssue::SlotOverflowsHeight {
                needed: needed_h,
                available: image_area.height,
            });
        }
        let slot_y = content.top() - p.image_top_gap - side;

        let (left_x, right_x) = match p.placement {
            ImagePlacementMode::Quartiles => {
                // Each slot is centered in its half, so it may use at most half the width.
                if side > content.width / 2.0 {
                    return Err(GeometryIssue::SlotOverflowsWidth {
                        needed: 2.0 * side,
                        available: content.width,
                    });
                }
                (
                    content.x + content.width * 0.25 - side / 2.0,
                    content.x + content.width * 0.75 - side / 2.0,
                )
            }
            ImagePlacementMode::EdgeToEdge { gap } => {
                let needed = 2.0 * side + gap;
                if needed > content.width {
                    return Err(GeometryIssue::SlotOverflowsWidth {
                        needed,
                        available: content.width,
                    });
                }
                (content.x, content.right() - side)
            }
        };

        let name_y = slot_y - p.name_gap;
        let divider_y = name_y - p.divider_gap;
        if divider_y <= content.y {
            return Err(GeometryIssue::RowsCollapsed {
                divider_y,
                bottom: content.y,
            });
        }

        let line_x1 = content.x + p.divider_inset;
        let line_x2 = content.right() - p.divider_inset;
        if line_x2 <= line_x1 {
            return Err(GeometryIssue::NonPositive {
                what: "divider",
                size: line_x2 - line_x1,
            });
        }

        Ok(Self {
            outer,
            content,
            left_slot: Region::square(left_x, slot_y, side),
            right_slot: Region::square(right_x, slot_y, side),
            name_y,
            divider_y,
            line_x1,
            line_x2,
        })
    }
}

fn require_area(what: &'static str, region: Region) -> Result<(), GeometryIssue> {
    if region.has_area() {
        return Ok(());
    }
    let size = if region.width <= 0.0 {
        region.width
    } else {
        region.height
    };
    Err(GeometryIssue::NonPositive { what, size })
}

/// Split `[bottom, top]` into `n` equal bands, top first.
///
/// Adjacent bands share their boundary value exactly, and the last band ends
/// exactly at `bottom`.
fn partition_bands(top: f64, bottom: f64, n: usize) -> Vec<RowBand> {
    let height = (top - bottom) / n as f64;
    let edge = |k: usize| if k == n { bottom } else { top - k as f64 * height };
    (0..n)
        .map(|i| RowBand {
            top: edge(i),
            bottom: edge(i + 1),
        })
        .collect()
}
