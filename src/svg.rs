//! SVG rendering of composed scenes.
//!
//! Maps the unit square onto a `width × height` pixel canvas with y pointing
//! down, resolves color tags through a [`Palette`], and scales point sizes
//! from the 504 pt reference height.
//!
//! # Example
//!
//! ```
//! use vslayout::{CompositionInput, GeometryProfile, compose};
//! use vslayout::svg::{SvgOptions, render_scene_svg};
//!
//! let input = CompositionInput::new("A", "B").row("Age", "23", "7");
//! let scene = compose(&input, &GeometryProfile::default().with_row_count(1)).unwrap();
//!
//! let svg = render_scene_svg(&scene, &SvgOptions::default());
//! assert!(svg.starts_with("<svg"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::geometry::Region;
use crate::palette::{Palette, Rgba};
use crate::scene::{
    ColorTag, DividerLine, DividerRole, FramedBox, HAlign, ImageSlot, LayoutNode, RenderStyle,
    Scene, Side, TextAnchor, TextRole, VAlign,
};

/// Canvas height, in points, that scene font sizes and thicknesses refer to.
pub const REFERENCE_HEIGHT_PT: f64 = 504.0;

/// Output size and colors.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Colors for every tag.
    pub palette: Palette,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            palette: Palette::default(),
        }
    }
}

impl SvgOptions {
    /// Default palette at the given size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Unit-square to pixel mapping.
struct Canvas {
    w: f64,
    h: f64,
}

impl Canvas {
    fn x(&self, x: f64) -> f64 {
        x * self.w
    }

    fn y(&self, y: f64) -> f64 {
        (1.0 - y) * self.h
    }

    /// Points at the reference height to pixels.
    fn pt(&self, pt: f32) -> f64 {
        f64::from(pt) * self.h / REFERENCE_HEIGHT_PT
    }

    /// `(x, y, width, height)` with `y` at the top edge.
    fn rect(&self, r: &Region) -> (f64, f64, f64, f64) {
        (
            self.x(r.x),
            self.y(r.top()),
            r.width * self.w,
            r.height * self.h,
        )
    }
}

/// Render a complete SVG document for `scene`.
pub fn render_scene_svg(scene: &Scene, options: &SvgOptions) -> String {
    let width = options.width.max(1);
    let height = options.height.max(1);
    let canvas = Canvas {
        w: f64::from(width),
        h: f64::from(height),
    };
    let palette = &options.palette;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    svg.push('\n');
    push_style(&mut svg, palette);

    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{width}" height="{height}" class="background"/>"#
    ));
    svg.push('\n');

    for node in scene.iter().filter(|n| n.z_order() < 2) {
        push_node(&mut svg, &canvas, node);
    }
    if scene.style() == RenderStyle::Table {
        push_table_cells(&mut svg, &canvas, scene);
    }
    for node in scene.iter().filter(|n| n.z_order() >= 2) {
        push_node(&mut svg, &canvas, node);
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_style(svg: &mut String, palette: &Palette) {
    svg.push_str("<style>\n");
    svg.push_str(r#"  text { font-family: "DejaVu Sans", "Helvetica", "Arial", sans-serif; }"#);
    svg.push('\n');
    svg.push_str(&format!(
        "  .background {{ {} }}\n",
        paint("fill", palette.background)
    ));
    svg.push_str(&format!(
        "  .frame {{ {} {} stroke-width: 1.5; }}\n",
        paint("fill", palette.box_fill),
        paint("stroke", palette.get(ColorTag::Frame))
    ));
    svg.push_str(&format!(
        "  .cell {{ fill: none; {} stroke-width: 1; }}\n",
        paint("stroke", palette.get(ColorTag::DividerLight))
    ));
    for tag in ColorTag::ALL {
        let color = palette.get(tag);
        svg.push_str(&format!(
            "  text.{tag} {{ {} }}\n  line.{tag} {{ {} }}\n",
            paint("fill", color),
            paint("stroke", color)
        ));
    }
    svg.push_str("</style>\n");
}

/// CSS declarations for one paint property, with opacity only when needed.
fn paint(property: &str, color: Rgba) -> String {
    if color.a == 255 {
        format!("{property}: {};", color.to_hex())
    } else {
        format!(
            "{property}: {}; {property}-opacity: {:.3};",
            color.to_hex(),
            color.opacity()
        )
    }
}

fn push_node(svg: &mut String, canvas: &Canvas, node: &LayoutNode) {
    match node {
        LayoutNode::FramedBox(b) => push_frame(svg, canvas, b),
        LayoutNode::ImageSlot(s) => push_image(svg, canvas, s),
        LayoutNode::Text(t) => push_text(svg, canvas, t),
        LayoutNode::Divider(d) => push_divider(svg, canvas, d),
    }
}

fn push_frame(svg: &mut String, canvas: &Canvas, frame: &FramedBox) {
    let (x, y, w, h) = canvas.rect(&frame.region);
    let r = frame.corner_radius * canvas.w.min(canvas.h);
    svg.push_str(&format!(
        r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" rx="{r:.2}" class="frame"/>"#
    ));
    svg.push('\n');
}

fn push_image(svg: &mut String, canvas: &Canvas, slot: &ImageSlot) {
    let (x, y, w, h) = canvas.rect(&slot.region);
    let side = match slot.side {
        Side::Left => "left",
        Side::Right => "right",
    };
    svg.push_str(&format!(
        r#"<image x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" href="{}" preserveAspectRatio="xMidYMid meet" class="{side}"/>"#,
        escape_xml(slot.handle.as_str())
    ));
    svg.push('\n');
}

fn push_text(svg: &mut String, canvas: &Canvas, text: &TextAnchor) {
    let anchor = match text.h_align {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    };
    let baseline = match text.v_align {
        VAlign::Top => "hanging",
        VAlign::Center => "central",
        VAlign::Bottom => "text-after-edge",
    };
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" font-weight="{}" text-anchor="{anchor}" dominant-baseline="{baseline}" class="{}">{}</text>"#,
        canvas.x(text.x),
        canvas.y(text.y),
        canvas.pt(text.font_size),
        text.weight.css_weight(),
        text.color,
        escape_xml(&text.content)
    ));
    svg.push('\n');
}

fn push_divider(svg: &mut String, canvas: &Canvas, line: &DividerLine) {
    let y = canvas.y(line.y);
    svg.push_str(&format!(
        r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke-width="{:.2}" class="{}"/>"#,
        canvas.x(line.x1),
        canvas.x(line.x2),
        canvas.pt(line.thickness),
        line.color
    ));
    svg.push('\n');
}

/// Column edges for table cells: the header line's ends, plus the midpoints
/// between neighbouring anchor columns.
fn cell_edges(scene: &Scene, row: usize) -> Option<[f64; 4]> {
    let header = scene.divider(DividerRole::Header)?;
    let left = scene.text(TextRole::RowValue(row, Side::Left))?.x;
    let label = scene.text(TextRole::RowLabel(row))?.x;
    let right = scene.text(TextRole::RowValue(row, Side::Right))?.x;
    Some([
        header.x1,
        (left + label) / 2.0,
        (label + right) / 2.0,
        header.x2,
    ])
}

fn push_table_cells(svg: &mut String, canvas: &Canvas, scene: &Scene) {
    for (i, band) in scene.bands().iter().enumerate() {
        let Some(edges) = cell_edges(scene, i) else {
            continue;
        };
        let cells: Vec<Region> = edges
            .windows(2)
            .map(|e| Region::new(e[0], band.bottom, e[1] - e[0], band.height()))
            .collect();
        for cell in &cells {
            let (x, y, w, h) = canvas.rect(cell);
            svg.push_str(&format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" class="cell"/>"#
            ));
            svg.push('\n');
        }
    }
}

/// Escape special characters for XML text and attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
