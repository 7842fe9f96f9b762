//! Concrete colors for the symbolic [`ColorTag`]s a scene uses.
//!
//! Colors parse from hex (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, hash
//! optional) or a small set of CSS named colors.

use alloc::string::String;
use core::fmt::Write;

use crate::scene::ColorTag;

/// sRGB color with alpha, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 = opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// White, fully opaque.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        let mut s = String::with_capacity(7);
        // Writing to a String cannot fail.
        let _ = write!(s, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        s
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

/// Colors for every tag plus the page background and box fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Area outside the framed box.
    pub background: Rgba,
    /// Inside of the framed box.
    pub box_fill: Rgba,
    tags: [Rgba; ColorTag::ALL.len()],
}

impl Default for Palette {
    fn default() -> Self {
        let mut p = Self {
            background: Rgba::WHITE,
            box_fill: Rgba::WHITE,
            tags: [Rgba::rgb(0, 0, 0); ColorTag::ALL.len()],
        };
        p.set(ColorTag::Accent, Rgba::rgb(0xff, 0x44, 0x44));
        p.set(ColorTag::PrimaryText, Rgba::rgb(0x33, 0x33, 0x33));
        p.set(ColorTag::LabelText, Rgba::rgb(0x22, 0x22, 0x22));
        p.set(ColorTag::SecondaryText, Rgba::rgb(0x44, 0x44, 0x44));
        p.set(ColorTag::DividerLight, Rgba::rgb(0xe0, 0xe0, 0xe0));
        p.set(ColorTag::DividerStrong, Rgba::rgb(0xcc, 0xcc, 0xcc));
        p.set(ColorTag::Frame, Rgba::rgb(0x99, 0x99, 0x99));
        p
    }
}

impl Palette {
    /// Color assigned to `tag`.
    pub fn get(&self, tag: ColorTag) -> Rgba {
        self.tags[tag as usize]
    }

    /// Reassign `tag`.
    pub fn set(&mut self, tag: ColorTag, color: Rgba) {
        self.tags[tag as usize] = color;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, tag: ColorTag, color: Rgba) -> Self {
        self.set(tag, color);
        self
    }
}

/// Parse a color string (hex or named).
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    parse_hex(hex).or_else(|| lookup_named(s))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let b = hex.as_bytes();
    match b.len() {
        3 => Some(Rgba::rgb(
            expand_nibble(b[0])?,
            expand_nibble(b[1])?,
            expand_nibble(b[2])?,
        )),
        4 => Some(Rgba {
            r: expand_nibble(b[0])?,
            g: expand_nibble(b[1])?,
            b: expand_nibble(b[2])?,
            a: expand_nibble(b[3])?,
        }),
        6 => Some(Rgba::rgb(
            parse_byte(&b[0..2])?,
            parse_byte(&b[2..4])?,
            parse_byte(&b[4..6])?,
        )),
        8 => Some(Rgba {
            r: parse_byte(&b[0..2])?,
            g: parse_byte(&b[2..4])?,
            b: parse_byte(&b[4..6])?,
            a: parse_byte(&b[6..8])?,
        }),
        _ => None,
    }
}

/// 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn parse_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?)
}

fn lookup_named(name: &str) -> Option<Rgba> {
    let lower = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by_key(&lower.as_str(), |&(n, _)| n)
        .ok()
        .map(|idx| {
            let [r, g, b, a] = NAMED_COLORS[idx].1;
            Rgba { r, g, b, a }
        })
}

/// Sorted for binary search.
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("crimson", [220, 20, 60, 255]),
    ("darkgray", [169, 169, 169, 255]),
    ("darkgrey", [169, 169, 169, 255]),
    ("dimgray", [105, 105, 105, 255]),
    ("gainsboro", [220, 220, 220, 255]),
    ("gold", [255, 215, 0, 255]),
    ("gray", [128, 128, 128, 255]),
    ("green", [0, 128, 0, 255]),
    ("grey", [128, 128, 128, 255]),
    ("lightgray", [211, 211, 211, 255]),
    ("lightgrey", [211, 211, 211, 255]),
    ("navy", [0, 0, 128, 255]),
    ("orange", [255, 165, 0, 255]),
    ("orangered", [255, 69, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("red", [255, 0, 0, 255]),
    ("silver", [192, 192, 192, 255]),
    ("tomato", [255, 99, 71, 255]),
    ("transparent", [0, 0, 0, 0]),
    ("white", [255, 255, 255, 255]),
    ("whitesmoke", [245, 245, 245, 255]),
    ("yellow", [255, 255, 0, 255]),
];
