//! Named presets and query-string profile parsing.
//!
//! A profile query looks like `preset=wide&rows=4&margin=0.06&color.accent=%23f44`.
//! `preset` is applied first no matter where it appears; every other key
//! overrides one field of the preset. Parsing never fails: problems become
//! [`ParseWarning`]s and the offending key is skipped.
//!
//! # Example
//!
//! ```
//! use vslayout::{ColorTag, ImagePlacementMode, profile};
//!
//! let result = profile::parse("rows=4&preset=wide&color.accent=navy");
//! assert!(result.warnings.is_empty());
//! assert_eq!(result.profile.row_count, 4);
//! assert!(matches!(result.profile.placement, ImagePlacementMode::EdgeToEdge { .. }));
//! assert_eq!(result.palette.get(ColorTag::Accent).to_hex(), "#000080");
//! ```
//!
//! # Keys
//!
//! | Key | Value |
//! |---|---|
//! | `preset` | `centered`, `classic`, `wide`, `table` |
//! | `rows` | positive integer |
//! | `margin`, `padding`, `radius`, `image`, `kw`, `kh` | number |
//! | `placement` | `quartiles` or `edge` |
//! | `gap` | number, edge placement only |
//! | `style` | `freeform` or `table` |
//! | `font.name`, `font.vs`, `font.label`, `font.value` | positive number |
//! | `color.<tag>`, `color.background`, `color.box` | hex or named color |

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::geometry::{GeometryProfile, ImagePlacementMode};
use crate::palette::{Palette, parse_color};
use crate::scene::{ColorTag, RenderStyle};

/// Gap used when `placement=edge` is requested without `gap`.
const DEFAULT_EDGE_GAP: f64 = 0.04;

/// A named [`GeometryProfile`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Preset {
    /// [`GeometryProfile::centered`].
    #[default]
    Centered,
    /// [`GeometryProfile::classic`].
    Classic,
    /// [`GeometryProfile::wide`].
    Wide,
    /// [`GeometryProfile::table`].
    Table,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Self; 4] = [Self::Centered, Self::Classic, Self::Wide, Self::Table];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::Classic => "classic",
            Self::Wide => "wide",
            Self::Table => "table",
        }
    }

    /// The preset's profile.
    pub fn profile(self) -> GeometryProfile {
        match self {
            Self::Centered => GeometryProfile::centered(),
            Self::Classic => GeometryProfile::classic(),
            Self::Wide => GeometryProfile::wide(),
            Self::Table => GeometryProfile::table(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a preset name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}`, expected centered|classic|wide|table")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPreset(String::from(trimmed)))
    }
}

/// Result of parsing a profile query.
#[derive(Clone, Debug)]
pub struct ParseResult {
    /// Preset with overrides applied. Not yet validated.
    pub profile: GeometryProfile,
    /// Default palette with color overrides applied.
    pub palette: Palette,
    /// Non-fatal problems, in input order.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from profile parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key was not recognized.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be used.
    ValueInvalid {
        key: String,
        value: String,
        reason: &'static str,
    },
}

/// Parse a profile query (with or without a leading `?`).
pub fn parse(query: &str) -> ParseResult {
    let pairs: Vec<(String, String)> = split_query(query)
        .map(|pair| {
            let (k, v) = split_pair(pair);
            (percent_decode(k).to_ascii_lowercase(), percent_decode(v))
        })
        .collect();

    let mut warnings = Vec::new();
    let mut seen = BTreeSet::new();
    for (key, value) in &pairs {
        if !seen.insert(key.as_str()) {
            warnings.push(ParseWarning::DuplicateKey {
                key: key.clone(),
                value: value.clone(),
            });
        }
    }

    let mut preset = Preset::default();
    for (key, value) in pairs.iter().filter(|(k, _)| k == "preset") {
        match value.parse::<Preset>() {
            Ok(p) => preset = p,
            Err(_) => warnings.push(invalid(key, value, "expected centered|classic|wide|table")),
        }
    }

    let mut state = Overrides {
        profile: preset.profile(),
        palette: Palette::default(),
        gap: None,
    };
    for (key, value) in pairs.iter().filter(|(k, _)| k != "preset") {
        state.dispatch(key, value, &mut warnings);
    }
    let (profile, palette) = state.finish(&mut warnings);
    ParseResult {
        profile,
        palette,
        warnings,
    }
}

struct Overrides {
    profile: GeometryProfile,
    palette: Palette,
    gap: Option<(f64, String)>,
}

impl Overrides {
    fn dispatch(&mut self, key: &str, value: &str, warnings: &mut Vec<ParseWarning>) {
        let p = &mut self.profile;
        match key {
            "rows" => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => p.row_count = n,
                _ => warnings.push(invalid(key, value, "expected a positive integer")),
            },
            "margin" => set_f64(&mut p.outer_margin, key, value, warnings),
            "padding" => set_f64(&mut p.content_padding, key, value, warnings),
            "radius" => set_f64(&mut p.corner_radius, key, value, warnings),
            "image" => set_f64(&mut p.image_area_fraction, key, value, warnings),
            "kw" => set_f64(&mut p.slot_width_factor, key, value, warnings),
            "kh" => set_f64(&mut p.slot_height_factor, key, value, warnings),
            "gap" => match parse_f64(value) {
                Some(g) => self.gap = Some((g, String::from(value))),
                None => warnings.push(invalid(key, value, "expected a finite number")),
            },
            "placement" => match value.trim().to_ascii_lowercase().as_str() {
                "quartiles" | "centered" => p.placement = ImagePlacementMode::Quartiles,
                "edge" | "edges" | "wide" => {
                    if !matches!(p.placement, ImagePlacementMode::EdgeToEdge { .. }) {
                        p.placement = ImagePlacementMode::EdgeToEdge {
                            gap: DEFAULT_EDGE_GAP,
                        };
                    }
                }
                _ => warnings.push(invalid(key, value, "expected quartiles|edge")),
            },
            "style" => match value.trim().to_ascii_lowercase().as_str() {
                "freeform" => p.render_style = RenderStyle::Freeform,
                "table" => p.render_style = RenderStyle::Table,
                _ => warnings.push(invalid(key, value, "expected freeform|table")),
            },
            "font.name" => set_font(&mut p.font_sizes.name, key, value, warnings),
            "font.vs" => set_font(&mut p.font_sizes.vs_marker, key, value, warnings),
            "font.label" => set_font(&mut p.font_sizes.row_label, key, value, warnings),
            "font.value" => set_font(&mut p.font_sizes.row_value, key, value, warnings),
            _ => match key.strip_prefix("color.") {
                Some(tag) => self.set_color(key, tag, value, warnings),
                None => warnings.push(ParseWarning::KeyNotRecognized {
                    key: String::from(key),
                    value: String::from(value),
                }),
            },
        }
    }

    fn set_color(&mut self, key: &str, tag: &str, value: &str, warnings: &mut Vec<ParseWarning>) {
        let Some(color) = parse_color(value) else {
            warnings.push(invalid(key, value, "expected hex color or color name"));
            return;
        };
        match tag {
            "background" => self.palette.background = color,
            "box" => self.palette.box_fill = color,
            _ => match ColorTag::from_name(tag) {
                Some(t) => self.palette.set(t, color),
                None => warnings.push(ParseWarning::KeyNotRecognized {
                    key: String::from(key),
                    value: String::from(value),
                }),
            },
        }
    }

    fn finish(mut self, warnings: &mut Vec<ParseWarning>) -> (GeometryProfile, Palette) {
        if let Some((g, raw)) = self.gap {
            match &mut self.profile.placement {
                ImagePlacementMode::EdgeToEdge { gap } => *gap = g,
                ImagePlacementMode::Quartiles => {
                    warnings.push(invalid("gap", &raw, "gap only applies to edge placement"));
                }
            }
        }
        (self.profile, self.palette)
    }
}

fn invalid(key: &str, value: &str, reason: &'static str) -> ParseWarning {
    ParseWarning::ValueInvalid {
        key: String::from(key),
        value: String::from(value),
        reason,
    }
}

fn set_f64(field: &mut f64, key: &str, value: &str, warnings: &mut Vec<ParseWarning>) {
    match parse_f64(value) {
        Some(v) => *field = v,
        None => warnings.push(invalid(key, value, "expected a finite number")),
    }
}

fn set_font(field: &mut f32, key: &str, value: &str, warnings: &mut Vec<ParseWarning>) {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => *field = v,
        _ => warnings.push(invalid(key, value, "expected a positive size in points")),
    }
}

fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---- Query string tokenizer ----

/// Split on '&', dropping empty segments and a leading '?'.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|s| !s.is_empty())
}

/// Split `key=value` on the first '='.
fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Percent-decode a URL component, with '+' as space. Invalid UTF-8 is
/// replaced rather than rejected.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgba;

    #[test]
    fn empty_query_is_default_preset() {
        let r = parse("");
        assert!(r.warnings.is_empty());
        assert_eq!(r.profile, GeometryProfile::default());
        assert_eq!(r.palette, Palette::default());
    }

    #[test]
    fn leading_question_mark_ignored() {
        let r = parse("?rows=5");
        assert!(r.warnings.is_empty());
        assert_eq!(r.profile.row_count, 5);
    }

    #[test]
    fn preset_applies_before_overrides() {
        let r = parse("margin=0.07&preset=classic");
        assert!(r.warnings.is_empty());
        assert_eq!(r.profile.outer_margin, 0.07);
        assert_eq!(r.profile.image_area_fraction, 0.35);
    }

    #[test]
    fn preset_names_round_trip() {
        for p in Preset::ALL {
            assert_eq!(p.name().parse::<Preset>(), Ok(p));
            assert_eq!(alloc::format!("{p}"), p.name());
        }
        assert_eq!("  WIDE ".parse::<Preset>(), Ok(Preset::Wide));
        assert!("banana".parse::<Preset>().is_err());
    }

    #[test]
    fn unknown_preset_warns_and_keeps_default() {
        let r = parse("preset=banana");
        assert_eq!(r.profile, GeometryProfile::default());
        assert!(matches!(
            &r.warnings[..],
            [ParseWarning::ValueInvalid { key, .. }] if key == "preset"
        ));
    }

    #[test]
    fn numeric_overrides() {
        let r = parse("margin=0.06&padding=0.03&radius=0.02&image=0.25&kw=0.3&kh=0.7&rows=2");
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);
        let p = r.profile;
        assert_eq!(p.outer_margin, 0.06);
        assert_eq!(p.content_padding, 0.03);
        assert_eq!(p.corner_radius, 0.02);
        assert_eq!(p.image_area_fraction, 0.25);
        assert_eq!(p.slot_width_factor, 0.3);
        assert_eq!(p.slot_height_factor, 0.7);
        assert_eq!(p.row_count, 2);
    }

    #[test]
    fn fonts_and_style() {
        let r = parse("font.name=20&font.vs=34&font.label=14&font.value=13&style=TABLE");
        assert!(r.warnings.is_empty());
        let f = r.profile.font_sizes;
        assert_eq!((f.name, f.vs_marker, f.row_label, f.row_value), (20.0, 34.0, 14.0, 13.0));
        assert_eq!(r.profile.render_style, RenderStyle::Table);
    }

    #[test]
    fn edge_placement_takes_gap() {
        let r = parse("placement=edge&gap=0.1");
        assert!(r.warnings.is_empty());
        assert_eq!(
            r.profile.placement,
            ImagePlacementMode::EdgeToEdge { gap: 0.1 }
        );
    }

    #[test]
    fn edge_placement_without_gap_uses_default() {
        let r = parse("placement=edge");
        assert_eq!(
            r.profile.placement,
            ImagePlacementMode::EdgeToEdge {
                gap: DEFAULT_EDGE_GAP
            }
        );
    }

    #[test]
    fn wide_preset_gap_override() {
        let r = parse("gap=0.02&preset=wide");
        assert!(r.warnings.is_empty());
        assert_eq!(
            r.profile.placement,
            ImagePlacementMode::EdgeToEdge { gap: 0.02 }
        );
    }

    #[test]
    fn gap_with_quartiles_warns() {
        let r = parse("gap=0.1");
        assert_eq!(r.profile.placement, ImagePlacementMode::Quartiles);
        assert!(matches!(
            &r.warnings[..],
            [ParseWarning::ValueInvalid { key, .. }] if key == "gap"
        ));
    }

    #[test]
    fn percent_encoded_color() {
        let r = parse("color.accent=%23f44&color.background=black&color.box=%23eeeeee");
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);
        assert_eq!(r.palette.get(ColorTag::Accent), Rgba::rgb(0xff, 0x44, 0x44));
        assert_eq!(r.palette.background, Rgba::rgb(0, 0, 0));
        assert_eq!(r.palette.box_fill, Rgba::rgb(0xee, 0xee, 0xee));
    }

    #[test]
    fn unknown_color_tag_not_recognized() {
        let r = parse("color.sparkle=red");
        assert!(matches!(
            &r.warnings[..],
            [ParseWarning::KeyNotRecognized { key, .. }] if key == "color.sparkle"
        ));
    }

    #[test]
    fn invalid_values_warn_and_keep_preset() {
        let r = parse("rows=0&margin=wide&font.vs=-3&margin=NaN&style=fancy");
        assert_eq!(r.profile, GeometryProfile::default());
        let invalid = r
            .warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::ValueInvalid { .. }))
            .count();
        assert_eq!(invalid, 5);
        assert!(r.warnings.iter().any(
            |w| matches!(w, ParseWarning::DuplicateKey { key, .. } if key == "margin")
        ));
    }

    #[test]
    fn unknown_key_warns() {
        let r = parse("w=800");
        assert_eq!(
            r.warnings,
            [ParseWarning::KeyNotRecognized {
                key: String::from("w"),
                value: String::from("800"),
            }]
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let r = parse("ROWS=4&Preset=Table");
        assert!(r.warnings.is_empty());
        assert_eq!(r.profile.row_count, 4);
        assert_eq!(r.profile.render_style, RenderStyle::Table);
    }

    #[test]
    fn percent_decode_handles_utf8_and_plus() {
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("%E2%82%AC"), "€");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
