//! Inline style and color handling
//!
//! Small CSS helpers for the document model and the color-contrast check:
//! property extraction from `style` attributes, color parsing (hex, rgb(),
//! named), and the WCAG relative-luminance contrast ratio.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Extract a property value from an inline style string.
///
/// Matching is case-insensitive on the property name; the first declaration
/// wins. Returns the raw value, trimmed.
pub fn style_property(style: &str, property: &str) -> Option<String> {
    for declaration in style.split(';') {
        let mut parts = declaration.splitn(2, ':');
        let name = parts.next()?.trim();
        if name.eq_ignore_ascii_case(property) {
            let value = parts.next()?.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

static NAMED_COLORS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("black", Color { r: 0, g: 0, b: 0 });
    m.insert("white", Color { r: 255, g: 255, b: 255 });
    m.insert("red", Color { r: 255, g: 0, b: 0 });
    m.insert("green", Color { r: 0, g: 128, b: 0 });
    m.insert("blue", Color { r: 0, g: 0, b: 255 });
    m.insert("yellow", Color { r: 255, g: 255, b: 0 });
    m.insert("cyan", Color { r: 0, g: 255, b: 255 });
    m.insert("magenta", Color { r: 255, g: 0, b: 255 });
    m.insert("gray", Color { r: 128, g: 128, b: 128 });
    m.insert("grey", Color { r: 128, g: 128, b: 128 });
    m.insert("silver", Color { r: 192, g: 192, b: 192 });
    m.insert("maroon", Color { r: 128, g: 0, b: 0 });
    m.insert("olive", Color { r: 128, g: 128, b: 0 });
    m.insert("navy", Color { r: 0, g: 0, b: 128 });
    m.insert("purple", Color { r: 128, g: 0, b: 128 });
    m.insert("teal", Color { r: 0, g: 128, b: 128 });
    m.insert("lime", Color { r: 0, g: 255, b: 0 });
    m.insert("aqua", Color { r: 0, g: 255, b: 255 });
    m.insert("fuchsia", Color { r: 255, g: 0, b: 255 });
    m.insert("orange", Color { r: 255, g: 165, b: 0 });
    m
});

/// Parse a CSS color value: `#rgb`, `#rrggbb`, `rgb(...)`, `rgba(...)` or a
/// common color name. Unknown syntax yields `None`; callers skip the
/// instance rather than guessing.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if value.starts_with("rgb(") || value.starts_with("rgba(") {
        let inner = value.split_once('(')?.1.strip_suffix(')')?;
        let mut channels = inner.split(',').map(|c| c.trim().parse::<u32>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        if r > 255 || g > 255 || b > 255 {
            return None;
        }
        return Some(Color {
            r: r as u8,
            g: g as u8,
            b: b as u8,
        });
    }

    NAMED_COLORS.get(value.as_str()).copied()
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some(Color { r, g, b })
}

/// WCAG relative luminance of an sRGB color.
pub fn relative_luminance(color: Color) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * channel(color.r) + 0.7152 * channel(color.g) + 0.0722 * channel(color.b)
}

/// WCAG contrast ratio between two colors, in the range 1.0–21.0.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_property_extraction() {
        let style = "color: #333; background-color: white; font-size: 18px";
        assert_eq!(style_property(style, "color").as_deref(), Some("#333"));
        assert_eq!(
            style_property(style, "background-color").as_deref(),
            Some("white")
        );
        assert_eq!(style_property(style, "font-size").as_deref(), Some("18px"));
        assert_eq!(style_property(style, "border"), None);
    }

    #[test]
    fn test_style_property_case_insensitive() {
        assert_eq!(
            style_property("COLOR: Red", "color").as_deref(),
            Some("Red")
        );
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#000000"), Some(Color { r: 0, g: 0, b: 0 }));
        assert_eq!(parse_color("#fff"), Some(Color { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_color("#1a2b3c"), Some(Color { r: 26, g: 43, b: 60 }));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_parse_rgb_and_named() {
        assert_eq!(
            parse_color("rgb(255, 0, 0)"),
            Some(Color { r: 255, g: 0, b: 0 })
        );
        assert_eq!(
            parse_color("rgba(0, 128, 0, 0.5)"),
            Some(Color { r: 0, g: 128, b: 0 })
        );
        assert_eq!(parse_color("white"), Some(Color { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        let black = Color { r: 0, g: 0, b: 0 };
        let white = Color { r: 255, g: 255, b: 255 };
        let ratio = contrast_ratio(black, white);
        assert!((ratio - 21.0).abs() < 0.01);
        assert!((contrast_ratio(white, white) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_contrast_ratio_is_symmetric() {
        let a = Color { r: 51, g: 51, b: 51 };
        let b = Color { r: 204, g: 204, b: 204 };
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_failing_pair_is_below_aa() {
        // light gray on white is a classic AA failure
        let fg = Color { r: 204, g: 204, b: 204 };
        let bg = Color { r: 255, g: 255, b: 255 };
        assert!(contrast_ratio(fg, bg) < 4.5);
    }
}
