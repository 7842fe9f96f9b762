//! Scene nodes: the composer's output primitives.
//!
//! A [`Scene`] is a flat list of [`LayoutNode`]s in drawing order plus the
//! row bands they were laid out in. It owns its strings and handles and
//! holds no references back into the input.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::geometry::Region;

/// Which contender a node belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left column.
    Left,
    /// Right column.
    Right,
}

/// Opaque reference to a prepared square image.
///
/// The composer never looks inside; it only copies the handle into an
/// [`ImageSlot`]. A placeholder square and a real photo are the same type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Wrap a key, typically a file name or URL.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The wrapped key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Anchor is the top of the text; text grows downward.
    Top,
    /// Anchor is the vertical middle of the text.
    Center,
    /// Anchor is the bottom of the text.
    Bottom,
}

/// Font weight hint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// 400.
    Regular,
    /// 500.
    Medium,
    /// 700.
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    pub const fn css_weight(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Medium => 500,
            Self::Bold => 700,
        }
    }
}

/// Symbolic color assigned to text and lines. Renderers resolve these
/// through a [`Palette`](crate::Palette).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorTag {
    /// The "VS." marker.
    Accent,
    /// Contender names.
    PrimaryText,
    /// Row labels.
    LabelText,
    /// Row values.
    SecondaryText,
    /// Lines between rows.
    DividerLight,
    /// Line under the header.
    DividerStrong,
    /// Framed box outline.
    Frame,
}

impl ColorTag {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Accent,
        Self::PrimaryText,
        Self::LabelText,
        Self::SecondaryText,
        Self::DividerLight,
        Self::DividerStrong,
        Self::Frame,
    ];

    /// Kebab-case name, e.g. `"primary-text"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accent => "accent",
            Self::PrimaryText => "primary-text",
            Self::LabelText => "label-text",
            Self::SecondaryText => "secondary-text",
            Self::DividerLight => "divider-light",
            Self::DividerStrong => "divider-strong",
            Self::Frame => "frame",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a renderer should present the comparison rows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderStyle {
    /// Floating text with thin separators.
    #[default]
    Freeform,
    /// Each row drawn as a row of bordered cells.
    Table,
}

/// What a text anchor shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Contender name under its image.
    Name(Side),
    /// The "VS." marker between the names.
    VsMarker,
    /// Label of row `i`.
    RowLabel(usize),
    /// Value of row `i` for one side.
    RowValue(usize, Side),
}

/// What a divider separates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DividerRole {
    /// Between the header (images, names) and the rows.
    Header,
    /// Between row `i` and row `i + 1`.
    BetweenRows(usize),
}

/// The rounded outer container.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramedBox {
    /// Box bounds.
    pub region: Region,
    /// Corner rounding, in unit-square fractions.
    pub corner_radius: f64,
}

/// A square region filled with a prepared image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSlot {
    /// Owning contender.
    pub side: Side,
    /// Image to draw.
    pub handle: ImageHandle,
    /// Square bounds.
    pub region: Region,
}

/// A positioned piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnchor {
    /// What the text is.
    pub role: TextRole,
    /// The text itself, passed through unchanged.
    pub content: String,
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Horizontal alignment around `x`.
    pub h_align: HAlign,
    /// Vertical alignment around `y`.
    pub v_align: VAlign,
    /// Size in points at the reference height.
    pub font_size: f32,
    /// Weight hint.
    pub weight: FontWeight,
    /// Symbolic color.
    pub color: ColorTag,
}

/// A horizontal line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DividerLine {
    /// What the line separates.
    pub role: DividerRole,
    /// Left end.
    pub x1: f64,
    /// Right end.
    pub x2: f64,
    /// Vertical position.
    pub y: f64,
    /// Thickness in points at the reference height.
    pub thickness: f32,
    /// Symbolic color.
    pub color: ColorTag,
}

/// One drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutNode {
    /// Outer container, z-order 0.
    FramedBox(FramedBox),
    /// Image region, z-order 1.
    ImageSlot(ImageSlot),
    /// Text, z-order 2.
    Text(TextAnchor),
    /// Line, z-order 2.
    Divider(DividerLine),
}

impl LayoutNode {
    /// Drawing layer; nodes with higher values paint over lower ones.
    pub const fn z_order(&self) -> u8 {
        match self {
            Self::FramedBox(_) => 0,
            Self::ImageSlot(_) => 1,
            Self::Text(_) | Self::Divider(_) => 2,
        }
    }

    /// Bounding region of the node's coordinates.
    ///
    /// Text anchors and lines are points and segments, so their extents have
    /// zero height (and zero width for text).
    pub fn extent(&self) -> Region {
        match self {
            Self::FramedBox(b) => b.region,
            Self::ImageSlot(s) => s.region,
            Self::Text(t) => Region::new(t.x, t.y, 0.0, 0.0),
            Self::Divider(d) => Region::new(d.x1, d.y, d.x2 - d.x1, 0.0),
        }
    }
}

/// Vertical interval occupied by one comparison row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowBand {
    /// Upper edge.
    pub top: f64,
    /// Lower edge.
    pub bottom: f64,
}

impl RowBand {
    /// Band height.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Vertical middle, where the row's text is anchored.
    pub fn center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// A composed layout, ready for a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    nodes: Vec<LayoutNode>,
    bands: Vec<RowBand>,
    style: RenderStyle,
}

impl Scene {
    pub(crate) fn new(nodes: Vec<LayoutNode>, bands: Vec<RowBand>, style: RenderStyle) -> Self {
        Self {
            nodes,
            bands,
            style,
        }
    }

    /// All nodes in drawing order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Row bands, first row (top) first.
    pub fn bands(&self) -> &[RowBand] {
        &self.bands
    }

    /// Rendering hint from the profile.
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene has no nodes. Never the case for composed scenes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over nodes in drawing order.
    pub fn iter(&self) -> core::slice::Iter<'_, LayoutNode> {
        self.nodes.iter()
    }

    /// The outer container.
    pub fn framed_box(&self) -> Option<&FramedBox> {
        self.nodes.iter().find_map(|n| match n {
            LayoutNode::FramedBox(b) => Some(b),
            _ => None,
        })
    }

    /// Image slots, left first.
    pub fn image_slots(&self) -> impl Iterator<Item = &ImageSlot> {
        self.nodes.iter().filter_map(|n| match n {
            LayoutNode::ImageSlot(s) => Some(s),
            _ => None,
        })
    }

    /// Text anchors in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextAnchor> {
        self.nodes.iter().filter_map(|n| match n {
            LayoutNode::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Divider lines, header first.
    pub fn dividers(&self) -> impl Iterator<Item = &DividerLine> {
        self.nodes.iter().filter_map(|n| match n {
            LayoutNode::Divider(d) => Some(d),
            _ => None,
        })
    }

    /// The text anchor with the given role.
    pub fn text(&self, role: TextRole) -> Option<&TextAnchor> {
        self.texts().find(|t| t.role == role)
    }

    /// The divider with the given role.
    pub fn divider(&self, role: DividerRole) -> Option<&DividerLine> {
        self.dividers().find(|d| d.role == role)
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a LayoutNode;
    type IntoIter = core::slice::Iter<'a, LayoutNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_tag_names_round_trip() {
        for tag in ColorTag::ALL {
            assert_eq!(ColorTag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(ColorTag::from_name("nope"), None);
    }

    #[test]
    fn z_order_layers() {
        let frame = LayoutNode::FramedBox(FramedBox {
            region: Region::UNIT,
            corner_radius: 0.0,
        });
        let slot = LayoutNode::ImageSlot(ImageSlot {
            side: Side::Left,
            handle: ImageHandle::new("x"),
            region: Region::square(0.1, 0.1, 0.2),
        });
        let line = LayoutNode::Divider(DividerLine {
            role: DividerRole::Header,
            x1: 0.1,
            x2: 0.9,
            y: 0.5,
            thickness: 1.0,
            color: ColorTag::DividerStrong,
        });
        assert_eq!(frame.z_order(), 0);
        assert_eq!(slot.z_order(), 1);
        assert_eq!(line.z_order(), 2);
    }

    #[test]
    fn divider_extent_spans_line() {
        let line = LayoutNode::Divider(DividerLine {
            role: DividerRole::BetweenRows(0),
            x1: 0.2,
            x2: 0.7,
            y: 0.4,
            thickness: 1.0,
            color: ColorTag::DividerLight,
        });
        let e = line.extent();
        assert_eq!(e.x, 0.2);
        assert!((e.width - 0.5).abs() < 1e-12);
        assert_eq!(e.height, 0.0);
    }

    #[test]
    fn band_center_and_height() {
        let band = RowBand {
            top: 0.6,
            bottom: 0.4,
        };
        assert!((band.center() - 0.5).abs() < 1e-12);
        assert!((band.height() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn handle_display_is_key() {
        let h = ImageHandle::new("left.png");
        assert_eq!(h.as_str(), "left.png");
        assert_eq!(alloc::format!("{h}"), "left.png");
    }
}
